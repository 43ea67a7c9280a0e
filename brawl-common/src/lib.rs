//! Shared asset formats and playback for Brawl
//!
//! This crate is used by both the game runtime and `brawl-export` (asset
//! pipeline):
//!
//! # Modules
//!
//! - [`cursor`] - Bounds-checked little-endian byte reader/writer
//! - [`packing`] - Position quantization and spherical normal packing
//! - [`formats`] - `.fgt` fighter and `.lvl` level binary formats
//! - [`animation`] - Cue playback with cross-fading
//! - [`error`] - Decode and playback errors

pub mod animation;
pub mod cursor;
pub mod error;
pub mod formats;
pub mod packing;

pub use animation::{ANIMATION_BASE_RATE, AnimationPlayer, FighterAnimation, PoseSample};
pub use cursor::{ByteCursor, ByteWriter};
pub use error::{AnimationError, FormatError};

// Re-export commonly used format items
pub use formats::{
    AnimationCue, DEFAULT_ZSTD_LEVEL, FGT_EXT, FighterModel, FrameBlockOptions, FrameEncoding,
    LVL_EXT, LevelModel, LevelVertex, decode_fighter, decode_level, encode_fighter, encode_level,
    write_fighter, write_level,
};

// Re-export commonly used packing items
pub use packing::{FrameRecord, pack_normal_spherical, unpack_normal_spherical};
