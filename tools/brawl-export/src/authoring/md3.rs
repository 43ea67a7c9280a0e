//! MD3 vertex-animation reader
//!
//! Only the parts the fighter pipeline needs are read: per-surface vertex
//! frames, UVs and triangles. Tags, shaders and frame bounds are skipped.
//!
//! Authoring space is Z-up; everything returned here is already converted to
//! the engine's Y-up space with `(x, y, z) -> (x, z, -y)`.

use std::f32::consts::TAU;

use anyhow::{Context, Result, bail};
use brawl_common::ByteCursor;
use brawl_common::packing::dequantize_position;
use glam::Vec3;

/// Offset of the surface count in the file header
const SURFACE_COUNT_OFFSET: usize = 84;

/// Bytes from the start of a surface header to its frame count
const SURFACE_FRAME_COUNT_OFFSET: usize = 4 + 64 + 4;

/// One animation frame of a surface, in engine space
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Md3Frame {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Md3Surface {
    pub frames: Vec<Md3Frame>,
    pub uvs: Vec<[f32; 2]>,
    /// Triangle list, winding already flipped for engine space
    pub indices: Vec<u16>,
}

impl Md3Surface {
    pub fn vertex_count(&self) -> usize {
        self.uvs.len()
    }
}

/// Decode an authoring normal: high byte latitude, low byte longitude.
///
/// Returns the authoring-space (Z-up) vector.
pub fn decode_authoring_normal(packed: u16) -> Vec3 {
    let lat = (packed >> 8) as f32 * TAU / 255.0;
    let lon = (packed & 0xFF) as f32 * TAU / 255.0;
    Vec3::new(lat.cos() * lon.sin(), lat.sin() * lon.sin(), lon.cos())
}

#[inline]
fn to_engine_space(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.z, -v.y)
}

/// Read every surface of an MD3 file.
pub fn read_md3(data: &[u8]) -> Result<Vec<Md3Surface>> {
    let mut c = ByteCursor::new(data);

    c.seek(SURFACE_COUNT_OFFSET);
    let surface_count = c.read_u32().context("MD3 header")?;
    // skins, frame table, tag table
    c.skip(12).context("MD3 header")?;
    let surfaces_offset = c.read_u32().context("MD3 header")?;
    c.seek(surfaces_offset as usize);

    let mut surfaces = Vec::new();
    for index in 0..surface_count {
        let surface = read_surface(&mut c).with_context(|| format!("MD3 surface {}", index))?;
        surfaces.push(surface);
    }
    Ok(surfaces)
}

fn read_surface(c: &mut ByteCursor<'_>) -> Result<Md3Surface> {
    let base = c.offset();
    c.skip(SURFACE_FRAME_COUNT_OFFSET)?;
    let frame_count = c.read_u32()? as usize;
    // shader count
    c.skip(4)?;
    let vertex_count = c.read_u32()? as usize;
    let triangle_count = c.read_u32()? as usize;
    let triangles_offset = base + c.read_u32()? as usize;
    // shader table
    c.skip(4)?;
    let uv_offset = base + c.read_u32()? as usize;
    let vertex_offset = base + c.read_u32()? as usize;
    let end_offset = base + c.read_u32()? as usize;

    if vertex_count > u16::MAX as usize + 1 {
        bail!("{} vertices exceed 16-bit indices", vertex_count);
    }

    c.seek(vertex_offset);
    let mut frames = Vec::new();
    for _ in 0..frame_count {
        frames.push(read_frame(c, vertex_count)?);
    }

    c.seek(uv_offset);
    let mut uvs = Vec::with_capacity(vertex_count);
    for _ in 0..vertex_count {
        uvs.push([c.read_f32()?, c.read_f32()?]);
    }

    c.seek(triangles_offset);
    let mut indices = Vec::new();
    for triangle in 0..triangle_count {
        let mut corners = [0u16; 3];
        for corner in &mut corners {
            let index = c.read_i32()?;
            *corner = match u16::try_from(index) {
                Ok(i) if (i as usize) < vertex_count => i,
                _ => bail!(
                    "triangle {} references vertex {} of {}",
                    triangle, index, vertex_count
                ),
            };
        }
        indices.extend_from_slice(&[corners[0], corners[2], corners[1]]);
    }

    c.seek(end_offset);

    tracing::debug!(
        frames = frame_count,
        vertices = vertex_count,
        triangles = triangle_count,
        "read MD3 surface"
    );

    Ok(Md3Surface {
        frames,
        uvs,
        indices,
    })
}

fn read_frame(c: &mut ByteCursor<'_>, vertex_count: usize) -> Result<Md3Frame> {
    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    for _ in 0..vertex_count {
        let x = dequantize_position(c.read_i16()?);
        let y = dequantize_position(c.read_i16()?);
        let z = dequantize_position(c.read_i16()?);
        let normal = decode_authoring_normal(c.read_u16()?);

        positions.push(to_engine_space(Vec3::new(x, y, z)));
        normals.push(to_engine_space(normal));
    }
    Ok(Md3Frame { positions, normals })
}
