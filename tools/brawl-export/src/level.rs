//! Level export (MS3D + atlas -> .lvl)

use std::path::Path;

use anyhow::{Context, Result};
use brawl_common::formats::{LevelModel, LevelVertex, write_level};
use brawl_common::ByteWriter;

use crate::atlas::load_atlas;
use crate::authoring::{Ms3dMesh, read_ms3d};

/// Flatten a deduplicated mesh into level vertices.
pub fn build_level(mesh: &Ms3dMesh) -> Result<LevelModel> {
    let vertices: Vec<LevelVertex> = (0..mesh.vertex_count())
        .map(|i| LevelVertex {
            position: mesh.positions[i].to_array(),
            normal: mesh.normals[i].to_array(),
            uv: mesh.uvs[i],
            atlas_offset: mesh.atlas_offsets[i],
            atlas_size: mesh.atlas_sizes[i],
        })
        .collect();

    Ok(LevelModel::from_vertices(&vertices, &mesh.indices)?)
}

/// Read an authoring level and remap its materials into the atlas.
pub fn load_level(mesh: &Path, atlas: &Path, atlas_image: &Path) -> Result<LevelModel> {
    let frames = load_atlas(atlas, atlas_image)?;
    let data = std::fs::read(mesh).with_context(|| format!("Failed to read mesh: {:?}", mesh))?;
    let mut parsed = read_ms3d(&data).with_context(|| format!("Failed to parse MS3D: {:?}", mesh))?;

    // Each miss is already reported by texture name.
    let unresolved = parsed.stamp_atlas(&frames);
    tracing::debug!(
        unresolved,
        surfaces = parsed.surfaces.len(),
        "atlas remapping done"
    );

    build_level(&parsed).with_context(|| format!("Invalid level: {:?}", mesh))
}

/// Encode a level through `scratch` and write it to `output`.
pub fn write_level_file(scratch: &mut ByteWriter, model: &LevelModel, output: &Path) -> Result<()> {
    scratch.clear();
    write_level(scratch, model)?;
    std::fs::write(output, scratch.as_bytes())
        .with_context(|| format!("Failed to write output: {:?}", output))?;

    tracing::info!(
        "Wrote level: {} vertices, {} indices, {} bytes",
        model.vertex_count,
        model.index_count,
        scratch.offset()
    );
    Ok(())
}

/// Convert one level to a .lvl file
pub fn convert_level(mesh: &Path, atlas: &Path, atlas_image: &Path, output: &Path) -> Result<()> {
    let model = load_level(mesh, atlas, atlas_image)?;
    let mut scratch = ByteWriter::new();
    write_level_file(&mut scratch, &model, output)
}
