//! Error types for asset decoding/encoding and animation playback

use thiserror::Error;

/// Error raised while reading or writing FGT/LVL data.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Truncated at {offset}: need {needed} bytes, have {available}")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Bad magic {found:?}, expected one of {expected:?}")]
    BadMagic {
        found: [u8; 4],
        expected: &'static [&'static [u8; 4]],
    },

    #[error("Frame {frame} references undecoded frame {reference}")]
    InvalidFrameReference { frame: usize, reference: usize },

    #[error("Frame {frame}, vertex {vertex}: delta {delta} overflows i8")]
    DeltaOutOfRange {
        frame: usize,
        vertex: usize,
        delta: i32,
    },

    #[error("Frame block payload is {actual} bytes, expected {expected}")]
    PayloadSize { expected: usize, actual: usize },

    #[error("Negative frame block length {0}")]
    NegativeLength(i32),

    #[error("Cue {index} ({start}+{length}) exceeds {frame_count} frames")]
    CueOutOfRange {
        index: usize,
        start: u16,
        length: u16,
        frame_count: u16,
    },

    #[error("{what} count {count} exceeds the 16-bit limit")]
    CountOverflow { what: &'static str, count: usize },

    #[error("{what} buffer is {actual} bytes, expected {expected}")]
    BufferSize {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("zstd: {0}")]
    Zstd(#[from] std::io::Error),
}

/// Error raised by [`AnimationPlayer`](crate::animation::AnimationPlayer).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnimationError {
    #[error("Animation cue {index} does not exist ({count} cues loaded)")]
    UnknownCue { index: usize, count: usize },
}

pub type Result<T, E = FormatError> = std::result::Result<T, E>;
