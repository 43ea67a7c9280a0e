//! Fighter data types

use std::fmt;
use std::str::FromStr;

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

use crate::error::{FormatError, Result};
use crate::formats::checked_count;
use crate::packing::{FRAME_RECORD_SIZE, FrameRecord};

/// A named window of frames played back at a fixed rate.
///
/// The position of a cue in [`FighterModel::animations`] is its stable index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnimationCue {
    /// First frame of the window
    pub start: u16,
    /// Number of frames in the window
    pub length: u16,
    /// Authoring playback rate
    pub fps: u16,
}

impl AnimationCue {
    pub fn new(start: u16, length: u16, fps: u16) -> Self {
        Self { start, length, fps }
    }

    /// Last frame of the window (inclusive)
    pub fn end(&self) -> u32 {
        (self.start as u32 + self.length as u32).saturating_sub(1)
    }

    /// Whether the window lies inside `frame_count` frames.
    ///
    /// A zero-length cue holds its start frame, so that frame must exist.
    pub fn fits(&self, frame_count: u16) -> bool {
        self.start < frame_count && self.end() < frame_count as u32
    }
}

bitflags::bitflags! {
    /// Encoding flags of a flagged frame block
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FrameBlockFlags: u8 {
        /// Frames are delta-chain coded
        const DELTA = 0b0000_0001;
        /// Payload is zstd-compressed
        const ZSTD = 0b0000_0010;
    }
}

/// How the encoder writes the frame block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameEncoding {
    /// Legacy unflagged block (`FGTR`)
    #[default]
    Raw,
    Delta,
    Zstd,
    DeltaZstd,
}

impl FrameEncoding {
    /// Flags for the flagged block, or `None` for the legacy layout
    pub fn flags(self) -> Option<FrameBlockFlags> {
        match self {
            FrameEncoding::Raw => None,
            FrameEncoding::Delta => Some(FrameBlockFlags::DELTA),
            FrameEncoding::Zstd => Some(FrameBlockFlags::ZSTD),
            FrameEncoding::DeltaZstd => Some(FrameBlockFlags::DELTA | FrameBlockFlags::ZSTD),
        }
    }
}

impl fmt::Display for FrameEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FrameEncoding::Raw => "raw",
            FrameEncoding::Delta => "delta",
            FrameEncoding::Zstd => "zstd",
            FrameEncoding::DeltaZstd => "delta-zstd",
        })
    }
}

impl FromStr for FrameEncoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" | "none" => Ok(FrameEncoding::Raw),
            "delta" => Ok(FrameEncoding::Delta),
            "zstd" => Ok(FrameEncoding::Zstd),
            "delta-zstd" | "delta+zstd" => Ok(FrameEncoding::DeltaZstd),
            other => Err(format!(
                "unknown frame encoding {:?} (use raw, delta, zstd or delta-zstd)",
                other
            )),
        }
    }
}

/// Decoded fighter asset.
///
/// Buffers are kept in their on-disk little-endian layout so they can be
/// uploaded as-is; typed accessors decode on demand.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FighterModel {
    pub frame_count: u16,
    pub vertex_count: u16,
    /// `frame_count × vertex_count` frame records, frame-major
    pub frames: Vec<u8>,
    /// `vertex_count × [f32; 2]`
    pub uv: Vec<u8>,
    /// `u16` triangle indices
    pub indices: Vec<u8>,
    pub animations: Vec<AnimationCue>,
}

impl FighterModel {
    /// Build a model from per-frame records.
    ///
    /// Every frame must hold one record per UV entry.
    pub fn from_parts(
        frames: &[Vec<FrameRecord>],
        uvs: &[[f32; 2]],
        indices: &[u16],
        animations: Vec<AnimationCue>,
    ) -> Result<Self> {
        let frame_count = checked_count("frame", frames.len())?;
        let vertex_count = checked_count("vertex", uvs.len())?;
        checked_count("index", indices.len())?;
        checked_count("animation", animations.len())?;

        let mut frame_bytes = Vec::with_capacity(frames.len() * uvs.len() * FRAME_RECORD_SIZE);
        for frame in frames {
            if frame.len() != uvs.len() {
                return Err(FormatError::BufferSize {
                    what: "frame",
                    expected: uvs.len() * FRAME_RECORD_SIZE,
                    actual: frame.len() * FRAME_RECORD_SIZE,
                });
            }
            for record in frame {
                frame_bytes.extend_from_slice(&record.to_bytes());
            }
        }

        let mut uv = vec![0u8; uvs.len() * 8];
        LittleEndian::write_f32_into(uvs.as_flattened(), &mut uv);

        let mut index_bytes = vec![0u8; indices.len() * 2];
        LittleEndian::write_u16_into(indices, &mut index_bytes);

        let model = Self {
            frame_count,
            vertex_count,
            frames: frame_bytes,
            uv,
            indices: index_bytes,
            animations,
        };
        model.validate()?;
        Ok(model)
    }

    /// Bytes of one frame
    pub fn frame_size(&self) -> usize {
        self.vertex_count as usize * FRAME_RECORD_SIZE
    }

    pub fn index_count(&self) -> usize {
        self.indices.len() / 2
    }

    /// Raw records of frame `index`
    pub fn frame(&self, index: usize) -> Option<&[u8]> {
        let size = self.frame_size();
        let start = index.checked_mul(size)?;
        self.frames.get(start..start + size)
    }

    /// Decoded records of frame `index`
    pub fn frame_records(&self, index: usize) -> Option<Vec<FrameRecord>> {
        let frame = self.frame(index)?;
        Some(
            frame
                .chunks_exact(FRAME_RECORD_SIZE)
                .filter_map(FrameRecord::from_bytes)
                .collect(),
        )
    }

    pub fn uvs(&self) -> Vec<[f32; 2]> {
        let mut out = vec![[0f32; 2]; self.uv.len() / 8];
        LittleEndian::read_f32_into(&self.uv[..out.len() * 8], out.as_flattened_mut());
        out
    }

    pub fn indices_u16(&self) -> Vec<u16> {
        let mut out = vec![0u16; self.index_count()];
        LittleEndian::read_u16_into(&self.indices[..out.len() * 2], &mut out);
        out
    }

    /// Check buffer sizes and that every cue lies inside the frame range
    pub fn validate(&self) -> Result<()> {
        let expected = self.frame_size() * self.frame_count as usize;
        if self.frames.len() != expected {
            return Err(FormatError::BufferSize {
                what: "frame",
                expected,
                actual: self.frames.len(),
            });
        }
        let expected = self.vertex_count as usize * 8;
        if self.uv.len() != expected {
            return Err(FormatError::BufferSize {
                what: "uv",
                expected,
                actual: self.uv.len(),
            });
        }
        checked_count("index", self.index_count())?;
        checked_count("animation", self.animations.len())?;
        for (index, cue) in self.animations.iter().enumerate() {
            if !cue.fits(self.frame_count) {
                return Err(FormatError::CueOutOfRange {
                    index,
                    start: cue.start,
                    length: cue.length,
                    frame_count: self.frame_count,
                });
            }
        }
        Ok(())
    }
}
