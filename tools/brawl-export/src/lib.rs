//! brawl-export library
//!
//! Converts authoring assets into the runtime `.fgt`/`.lvl` formats of
//! `brawl-common`. The binary is a thin CLI over these modules.

pub mod atlas;
pub mod authoring;
pub mod cues;
pub mod fighter;
pub mod info;
pub mod level;
pub mod manifest;
pub mod texture;

pub use atlas::{AtlasFrame, load_atlas};
pub use fighter::{build_fighter, convert_fighter, load_fighter};
pub use info::{AssetSummary, inspect};
pub use level::{build_level, convert_level, load_level};

// Re-export the format types the converters produce
pub use brawl_common::formats::{FGT_EXT, FighterModel, FrameEncoding, LVL_EXT, LevelModel};
