//! Level binary format (.lvl)
//!
//! Static, indexed level geometry. No animation, no compression.
//!
//! # Layout
//! ```text
//! 0x00: magic [u8; 4]   - "LEVL"
//! 0x04: vertex_count u16
//! 0x06: vertices        - vertex_count × 48 bytes (12 × f32, see LevelVertex)
//! var:  index_count u16
//! var:  indices         - index_count × u16
//! ```

use bytemuck::{Pod, Zeroable};
use byteorder::{ByteOrder, LittleEndian};

use crate::cursor::{ByteCursor, ByteWriter};
use crate::error::{FormatError, Result};
use crate::formats::checked_count;

pub const LVL_MAGIC: [u8; 4] = *b"LEVL";

/// Size of one level vertex record
pub const LEVEL_VERTEX_SIZE: usize = 48;

/// LVL header (6 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelHeader {
    pub magic: [u8; 4],
    pub vertex_count: u16,
}

impl LevelHeader {
    pub const SIZE: usize = 6;

    pub fn new(vertex_count: u16) -> Self {
        Self {
            magic: LVL_MAGIC,
            vertex_count,
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..6].copy_from_slice(&self.vertex_count.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            magic: [bytes[0], bytes[1], bytes[2], bytes[3]],
            vertex_count: u16::from_le_bytes([bytes[4], bytes[5]]),
        })
    }
}

/// One level vertex: position, normal, UV and the texture-atlas rectangle the
/// UV is remapped into.
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct LevelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    /// Normalized atlas rectangle origin; zero when the material is unresolved
    pub atlas_offset: [f32; 2],
    /// Normalized atlas rectangle size; zero when the material is unresolved
    pub atlas_size: [f32; 2],
}

impl LevelVertex {
    pub fn to_bytes(&self) -> [u8; LEVEL_VERTEX_SIZE] {
        let floats: &[f32; 12] = bytemuck::cast_ref(self);
        let mut bytes = [0u8; LEVEL_VERTEX_SIZE];
        LittleEndian::write_f32_into(floats, &mut bytes);
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < LEVEL_VERTEX_SIZE {
            return None;
        }
        let mut floats = [0f32; 12];
        LittleEndian::read_f32_into(&bytes[..LEVEL_VERTEX_SIZE], &mut floats);
        Some(bytemuck::cast(floats))
    }
}

/// Decoded level asset, buffers in on-disk layout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LevelModel {
    pub vertex_count: u16,
    /// `vertex_count × 48` bytes
    pub geometry: Vec<u8>,
    pub index_count: u16,
    /// `index_count × u16`
    pub indices: Vec<u8>,
}

impl LevelModel {
    pub fn from_vertices(vertices: &[LevelVertex], indices: &[u16]) -> Result<Self> {
        let vertex_count = checked_count("vertex", vertices.len())?;
        let index_count = checked_count("index", indices.len())?;

        let mut geometry = Vec::with_capacity(vertices.len() * LEVEL_VERTEX_SIZE);
        for vertex in vertices {
            geometry.extend_from_slice(&vertex.to_bytes());
        }

        let mut index_bytes = vec![0u8; indices.len() * 2];
        LittleEndian::write_u16_into(indices, &mut index_bytes);

        Ok(Self {
            vertex_count,
            geometry,
            index_count,
            indices: index_bytes,
        })
    }

    pub fn vertices(&self) -> Vec<LevelVertex> {
        self.geometry
            .chunks_exact(LEVEL_VERTEX_SIZE)
            .filter_map(LevelVertex::from_bytes)
            .collect()
    }

    pub fn indices_u16(&self) -> Vec<u16> {
        let mut out = vec![0u16; self.index_count as usize];
        LittleEndian::read_u16_into(&self.indices, &mut out);
        out
    }

    pub fn validate(&self) -> Result<()> {
        let expected = self.vertex_count as usize * LEVEL_VERTEX_SIZE;
        if self.geometry.len() != expected {
            return Err(FormatError::BufferSize {
                what: "geometry",
                expected,
                actual: self.geometry.len(),
            });
        }
        let expected = self.index_count as usize * 2;
        if self.indices.len() != expected {
            return Err(FormatError::BufferSize {
                what: "index",
                expected,
                actual: self.indices.len(),
            });
        }
        Ok(())
    }
}

/// Decode a complete LVL asset.
pub fn decode_level(data: &[u8]) -> Result<LevelModel> {
    let mut c = ByteCursor::new(data);

    let header = LevelHeader::from_bytes(c.read_bytes(LevelHeader::SIZE)?).ok_or(
        FormatError::UnexpectedEof {
            offset: 0,
            needed: LevelHeader::SIZE,
            available: data.len(),
        },
    )?;
    if header.magic != LVL_MAGIC {
        return Err(FormatError::BadMagic {
            found: header.magic,
            expected: &[&LVL_MAGIC],
        });
    }

    let geometry = c
        .read_bytes(header.vertex_count as usize * LEVEL_VERTEX_SIZE)?
        .to_vec();
    let index_count = c.read_u16()?;
    let indices = c.read_bytes(index_count as usize * 2)?.to_vec();

    tracing::debug!(
        vertices = header.vertex_count,
        indices = index_count,
        "decoded level"
    );

    Ok(LevelModel {
        vertex_count: header.vertex_count,
        geometry,
        index_count,
        indices,
    })
}

/// Append an encoded level to `w`.
pub fn write_level(w: &mut ByteWriter, model: &LevelModel) -> Result<()> {
    model.validate()?;
    w.write_bytes(&LevelHeader::new(model.vertex_count).to_bytes());
    w.write_bytes(&model.geometry);
    w.write_u16(model.index_count);
    w.write_bytes(&model.indices);
    Ok(())
}

/// Encode a level into a fresh buffer.
pub fn encode_level(model: &LevelModel) -> Result<Vec<u8>> {
    let mut w = ByteWriter::with_capacity(
        LevelHeader::SIZE + model.geometry.len() + 2 + model.indices.len(),
    );
    write_level(&mut w, model)?;
    Ok(w.into_inner())
}
