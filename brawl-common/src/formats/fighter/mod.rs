//! Fighter binary format (.fgt)
//!
//! Vertex-animated (morph target) character mesh with an animation cue table.
//!
//! # Layout
//! ```text
//! 0x00: magic [u8; 4]        - "FGTR" (raw frame block) or "FGTZ" (flagged)
//! 0x04: frame_count u16
//! 0x06: vertex_count u16
//!
//! Frame block, "FGTR":
//!   frame_count × vertex_count × 8 bytes
//! Frame block, "FGTZ":
//!   flags u8                 - bit0 DELTA, bit1 ZSTD
//!   length i32
//!   payload [u8; length]     - zstd(…) if ZSTD, delta-coded if DELTA
//!
//! uv:      vertex_count × [f32; 2]
//! index_count u16
//! indices: index_count × u16
//! anim_count u16
//! anims:   anim_count × { start u16, length u16, fps u16 }
//! ```
//!
//! Whatever the frame block encoding, decoding yields the same flat buffer of
//! 8-byte [`FrameRecord`](crate::packing::FrameRecord)s, frame-major.

mod codec;
mod frames;
mod header;
mod types;

#[cfg(test)]
mod tests;

pub use codec::{
    DEFAULT_ZSTD_LEVEL, FrameBlockOptions, decode_fighter, encode_fighter, write_fighter,
};
pub use frames::{
    decode_delta_frames, delta_payload_capacity, encode_delta_frames, plan_references,
};
pub use header::{FGT_MAGIC_FLAGGED, FGT_MAGIC_RAW, FighterHeader};
pub use types::{AnimationCue, FighterModel, FrameBlockFlags, FrameEncoding};
