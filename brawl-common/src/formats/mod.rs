//! Brawl binary asset formats
//!
//! - `.fgt`: vertex-animated fighter meshes (morph targets + animation cues)
//! - `.lvl`: static level geometry with texture-atlas remapping
//!
//! Both are little-endian and decoded whole from a fully-buffered byte array.

pub mod fighter;
pub mod level;

pub use fighter::*;
pub use level::*;

/// File extension for fighter assets
pub const FGT_EXT: &str = "fgt";

/// File extension for level assets
pub const LVL_EXT: &str = "lvl";

/// Narrow an element count to the 16-bit on-disk field
pub(crate) fn checked_count(what: &'static str, count: usize) -> crate::error::Result<u16> {
    u16::try_from(count).map_err(|_| crate::error::FormatError::CountOverflow { what, count })
}
