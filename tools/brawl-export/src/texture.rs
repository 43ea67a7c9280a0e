//! Fighter texture converter (BMP/PNG -> JPEG)

use anyhow::{Context, Result};
use image::GenericImageView;
use image::codecs::jpeg::JpegEncoder;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// JPEG quality for fighter skins
pub const JPEG_QUALITY: u8 = 90;

/// Recompress an authoring texture to JPEG.
///
/// Alpha is dropped; fighter skins are opaque.
pub fn convert_texture(input: &Path, output: &Path) -> Result<()> {
    let img = image::open(input).with_context(|| format!("Failed to load image: {:?}", input))?;
    let (width, height) = img.dimensions();
    let rgb = img.to_rgb8();

    let file =
        File::create(output).with_context(|| format!("Failed to create output: {:?}", output))?;
    let mut writer = BufWriter::new(file);
    JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY)
        .encode_image(&rgb)
        .with_context(|| format!("Failed to encode JPEG: {:?}", output))?;
    writer.flush()?;

    tracing::info!("Converted texture: {}x{} -> {:?}", width, height, output);
    Ok(())
}
