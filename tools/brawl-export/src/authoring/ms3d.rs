//! MS3D polygon mesh reader
//!
//! Positions live in a shared table, but normals and UVs are stored per
//! triangle corner. Each corner is resolved to a unique output vertex keyed
//! on its full `(position, normal, uv)` tuple; the first corner with a given
//! tuple defines the vertex and later identical corners reuse it.
//!
//! Triangles reach the output only through a group, and groups are emitted
//! in file order.

use anyhow::{Context, Result, bail};
use brawl_common::ByteCursor;
use glam::Vec3;
use hashbrown::HashMap;

use crate::atlas::{AtlasFrame, find_frame};

/// `"MS3D000000"` + version
const HEADER_SIZE: usize = 14;

/// Group flags + name
const GROUP_PREFIX_SIZE: usize = 1 + 32;

/// Material name, colors, shininess, transparency and mode
const MATERIAL_PREFIX_SIZE: usize = 32 + 4 * 16 + 4 + 4 + 1;

const MATERIAL_PATH_SIZE: usize = 128;

/// One group of triangles sharing a material
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ms3dSurface {
    /// Output vertex indices, three per triangle
    pub triangles: Vec<u16>,
    /// Texture path of the group's material, as written by the authoring tool
    pub texture: Option<String>,
}

/// Deduplicated, indexed mesh.
///
/// All per-vertex vectors have the same length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ms3dMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<[f32; 2]>,
    /// Atlas rectangle origin, zero until [`stamp_atlas`](Self::stamp_atlas)
    pub atlas_offsets: Vec<[f32; 2]>,
    /// Atlas rectangle size, zero until [`stamp_atlas`](Self::stamp_atlas)
    pub atlas_sizes: Vec<[f32; 2]>,
    /// Surfaces' triangles concatenated in group order
    pub indices: Vec<u16>,
    pub surfaces: Vec<Ms3dSurface>,
}

impl Ms3dMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Stamp every surface's vertices with the atlas rectangle of its texture.
    ///
    /// Surfaces whose texture is not in the atlas keep zero offset/size and
    /// sample the whole texture. Returns the number of such surfaces.
    pub fn stamp_atlas(&mut self, atlas: &[AtlasFrame]) -> usize {
        let mut unresolved = 0;
        for surface in &self.surfaces {
            let Some(texture) = surface.texture.as_deref() else {
                continue;
            };
            let Some(frame) = find_frame(atlas, texture) else {
                tracing::warn!(texture, "Texture not in atlas, using full texture");
                unresolved += 1;
                continue;
            };
            for &index in &surface.triangles {
                let index = index as usize;
                self.atlas_offsets[index] = [frame.x, frame.y];
                self.atlas_sizes[index] = [frame.width, frame.height];
            }
        }
        unresolved
    }
}

/// Exact-match key over a corner's attributes.
///
/// Floats are compared by bit pattern with `-0.0` folded into `0.0`, so the
/// key agrees with `==` on every finite value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct VertexKey([u32; 8]);

impl VertexKey {
    fn new(position: Vec3, normal: Vec3, uv: [f32; 2]) -> Self {
        let bits = |v: f32| if v == 0.0 { 0 } else { v.to_bits() };
        Self([
            bits(position.x),
            bits(position.y),
            bits(position.z),
            bits(normal.x),
            bits(normal.y),
            bits(normal.z),
            bits(uv[0]),
            bits(uv[1]),
        ])
    }
}

/// Insertion-ordered vertex table, alive for one read
#[derive(Default)]
struct DedupTable {
    lookup: HashMap<VertexKey, u16>,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<[f32; 2]>,
}

impl DedupTable {
    fn resolve(&mut self, position: Vec3, normal: Vec3, uv: [f32; 2]) -> Result<u16> {
        let key = VertexKey::new(position, normal, uv);
        if let Some(&index) = self.lookup.get(&key) {
            return Ok(index);
        }
        let index = u16::try_from(self.positions.len())
            .context("too many unique vertices for 16-bit indices")?;
        self.lookup.insert(key, index);
        self.positions.push(position);
        self.normals.push(normal);
        self.uvs.push(uv);
        Ok(index)
    }
}

/// Read an MS3D file into a deduplicated mesh.
pub fn read_ms3d(data: &[u8]) -> Result<Ms3dMesh> {
    let mut c = ByteCursor::new(data);
    c.seek(HEADER_SIZE);

    let vertex_count = c.read_u16().context("MS3D vertex table")?;
    let mut shared_positions = Vec::with_capacity(vertex_count as usize);
    for _ in 0..vertex_count {
        // flags
        c.skip(1)?;
        let x = c.read_f32()?;
        let y = c.read_f32()?;
        let z = c.read_f32()?;
        // bone id, reference count
        c.skip(2)?;
        shared_positions.push(Vec3::new(x, y, z));
    }

    let triangle_count = c.read_u16().context("MS3D triangle table")?;
    let mut table = DedupTable::default();
    let mut triangles = Vec::with_capacity(triangle_count as usize * 3);
    for triangle in 0..triangle_count {
        // flags
        c.skip(2)?;
        let mut corners = [0u16; 3];
        for corner in &mut corners {
            *corner = c.read_u16()?;
        }
        let mut normals = [Vec3::ZERO; 3];
        for normal in &mut normals {
            *normal = Vec3::new(c.read_f32()?, c.read_f32()?, c.read_f32()?);
        }
        let mut s = [0f32; 3];
        for u in &mut s {
            *u = c.read_f32()?;
        }
        let mut t = [0f32; 3];
        for v in &mut t {
            *v = c.read_f32()?;
        }
        // smoothing group, group index
        c.skip(2)?;

        for corner in 0..3 {
            let Some(&position) = shared_positions.get(corners[corner] as usize) else {
                bail!(
                    "triangle {} references vertex {} of {}",
                    triangle, corners[corner], vertex_count
                );
            };
            let uv = [s[corner], t[corner]];
            triangles.push(table.resolve(position, normals[corner], uv)?);
        }
    }

    let group_count = c.read_u16().context("MS3D group table")?;
    let mut groups = Vec::with_capacity(group_count as usize);
    for group in 0..group_count {
        c.skip(GROUP_PREFIX_SIZE)?;
        let count = c.read_u16()?;
        let mut group_triangles = Vec::with_capacity(count as usize * 3);
        for _ in 0..count {
            let triangle = c.read_u16()? as usize;
            let Some(corners) = triangles.get(triangle * 3..triangle * 3 + 3) else {
                bail!(
                    "group {} references triangle {} of {}",
                    group, triangle, triangle_count
                );
            };
            group_triangles.extend_from_slice(corners);
        }
        let material = c.read_u8()?;
        groups.push((group_triangles, material));
    }

    let material_count = c.read_u16().context("MS3D material table")?;
    let mut textures = Vec::with_capacity(material_count as usize);
    for _ in 0..material_count {
        c.skip(MATERIAL_PREFIX_SIZE)?;
        textures.push(c.read_fixed_string(MATERIAL_PATH_SIZE)?);
        // alpha map
        c.skip(MATERIAL_PATH_SIZE)?;
    }

    let surfaces: Vec<Ms3dSurface> = groups
        .into_iter()
        .map(|(triangles, material)| Ms3dSurface {
            triangles,
            texture: textures
                .get(material as usize)
                .filter(|path| !path.is_empty())
                .cloned(),
        })
        .collect();

    let indices: Vec<u16> = surfaces
        .iter()
        .flat_map(|s| s.triangles.iter().copied())
        .collect();

    let unique = table.positions.len();
    tracing::debug!(
        shared_vertices = vertex_count,
        unique_vertices = unique,
        triangles = triangle_count,
        surfaces = surfaces.len(),
        "read MS3D mesh"
    );

    Ok(Ms3dMesh {
        positions: table.positions,
        normals: table.normals,
        uvs: table.uvs,
        atlas_offsets: vec![[0.0; 2]; unique],
        atlas_sizes: vec![[0.0; 2]; unique],
        indices,
        surfaces,
    })
}
