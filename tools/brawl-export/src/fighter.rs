//! Fighter export (MD3 + cue table -> .fgt)

use std::path::Path;

use anyhow::{Context, Result, bail};
use brawl_common::formats::{
    AnimationCue, FighterModel, FrameBlockOptions, FrameEncoding, write_fighter,
};
use brawl_common::{ByteWriter, FrameRecord};

use crate::authoring::{Md3Surface, read_md3};
use crate::cues::load_cues;

/// Quantize an authoring surface into a fighter model.
///
/// Positions are stored at 1/64 unit and normals as two spherical bytes.
pub fn build_fighter(surface: &Md3Surface, animations: Vec<AnimationCue>) -> Result<FighterModel> {
    let frames: Vec<Vec<FrameRecord>> = surface
        .frames
        .iter()
        .map(|frame| {
            frame
                .positions
                .iter()
                .zip(&frame.normals)
                .map(|(&position, &normal)| FrameRecord::pack(position, normal))
                .collect()
        })
        .collect();

    Ok(FighterModel::from_parts(&frames, &surface.uvs, &surface.indices, animations)?)
}

/// Read the authoring mesh and cue table of one fighter.
///
/// Only the first surface of the mesh is exported.
pub fn load_fighter(mesh: &Path, animations: &Path) -> Result<FighterModel> {
    let data = std::fs::read(mesh).with_context(|| format!("Failed to read mesh: {:?}", mesh))?;
    let surfaces = read_md3(&data).with_context(|| format!("Failed to parse MD3: {:?}", mesh))?;
    let Some(surface) = surfaces.first() else {
        bail!("MD3 has no surfaces: {:?}", mesh);
    };
    if surfaces.len() > 1 {
        tracing::warn!(
            "{:?} has {} surfaces, only the first is exported",
            mesh,
            surfaces.len()
        );
    }

    let cues = load_cues(animations)?;
    build_fighter(surface, cues).with_context(|| format!("Invalid fighter: {:?}", mesh))
}

/// Encode a fighter through `scratch` and write it to `output`.
///
/// `scratch` is cleared first, so one writer can serve a whole batch.
pub fn write_fighter_file(
    scratch: &mut ByteWriter,
    model: &FighterModel,
    options: &FrameBlockOptions,
    output: &Path,
) -> Result<()> {
    scratch.clear();
    write_fighter(scratch, model, options)?;
    std::fs::write(output, scratch.as_bytes())
        .with_context(|| format!("Failed to write output: {:?}", output))?;

    tracing::info!(
        "Wrote fighter: {} frames, {} vertices, {} animations, {} bytes ({})",
        model.frame_count,
        model.vertex_count,
        model.animations.len(),
        scratch.offset(),
        options.encoding
    );
    Ok(())
}

/// Convert one fighter to a .fgt file
pub fn convert_fighter(
    mesh: &Path,
    animations: &Path,
    output: &Path,
    encoding: FrameEncoding,
) -> Result<()> {
    let model = load_fighter(mesh, animations)?;
    let mut scratch = ByteWriter::new();
    write_fighter_file(&mut scratch, &model, &encoding.into(), output)
}
