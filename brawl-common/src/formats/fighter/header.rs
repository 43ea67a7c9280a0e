//! Fighter header structure and operations

use crate::packing::FRAME_RECORD_SIZE;

/// Magic for files whose frame block is stored raw
pub const FGT_MAGIC_RAW: [u8; 4] = *b"FGTR";

/// Magic for files whose frame block carries a flags byte and length prefix
pub const FGT_MAGIC_FLAGGED: [u8; 4] = *b"FGTZ";

/// FGT header (8 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FighterHeader {
    pub magic: [u8; 4],
    pub frame_count: u16,
    pub vertex_count: u16,
}

impl FighterHeader {
    pub const SIZE: usize = 8;

    pub fn new(magic: [u8; 4], frame_count: u16, vertex_count: u16) -> Self {
        Self {
            magic,
            frame_count,
            vertex_count,
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..6].copy_from_slice(&self.frame_count.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.vertex_count.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            magic: [bytes[0], bytes[1], bytes[2], bytes[3]],
            frame_count: u16::from_le_bytes([bytes[4], bytes[5]]),
            vertex_count: u16::from_le_bytes([bytes[6], bytes[7]]),
        })
    }

    /// Whether the frame block is prefixed by flags + length
    pub fn is_flagged(&self) -> bool {
        self.magic == FGT_MAGIC_FLAGGED
    }

    /// Whether the magic is one of the two known variants
    pub fn is_known(&self) -> bool {
        self.magic == FGT_MAGIC_RAW || self.magic == FGT_MAGIC_FLAGGED
    }

    /// Bytes of one decoded frame
    pub fn frame_size(&self) -> usize {
        self.vertex_count as usize * FRAME_RECORD_SIZE
    }

    /// Bytes of the decoded frame buffer
    pub fn frames_size(&self) -> usize {
        self.frame_size() * self.frame_count as usize
    }
}
