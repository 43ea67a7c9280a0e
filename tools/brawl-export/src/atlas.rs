//! Texture atlas frames
//!
//! The atlas description is a JSON array of pixel rectangles:
//!
//! ```json
//! [{ "name": "stone.bmp", "x": 0, "y": 128, "width": 64, "height": 64 }]
//! ```
//!
//! Rectangles are normalized against the atlas image size on load.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Atlas sub-rectangle in normalized `[0, 1]` texture space
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasFrame {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Deserialize)]
struct PixelFrame {
    name: String,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

/// Parse an atlas description and normalize it by the image size.
pub fn parse_atlas(json: &str, image_width: u32, image_height: u32) -> Result<Vec<AtlasFrame>> {
    if image_width == 0 || image_height == 0 {
        bail!("Atlas image is empty ({}x{})", image_width, image_height);
    }
    let frames: Vec<PixelFrame> = serde_json::from_str(json).context("Invalid atlas JSON")?;

    let (w, h) = (image_width as f32, image_height as f32);
    Ok(frames
        .into_iter()
        .map(|f| AtlasFrame {
            name: f.name,
            x: f.x / w,
            y: f.y / h,
            width: f.width / w,
            height: f.height / h,
        })
        .collect())
}

/// Load an atlas description, reading the image header for its size.
pub fn load_atlas(json: &Path, image_path: &Path) -> Result<Vec<AtlasFrame>> {
    let (width, height) = image::image_dimensions(image_path)
        .with_context(|| format!("Failed to read atlas image: {:?}", image_path))?;
    let text = std::fs::read_to_string(json)
        .with_context(|| format!("Failed to read atlas: {:?}", json))?;
    let frames = parse_atlas(&text, width, height)
        .with_context(|| format!("Failed to parse atlas: {:?}", json))?;

    tracing::debug!(frames = frames.len(), width, height, "loaded atlas");
    Ok(frames)
}

/// File name part of an authoring texture path, which may use either
/// separator.
pub fn texture_basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Find the frame for a material texture path, ignoring directories and case.
pub fn find_frame<'a>(atlas: &'a [AtlasFrame], texture: &str) -> Option<&'a AtlasFrame> {
    let name = texture_basename(texture).to_lowercase();
    atlas.iter().find(|frame| frame.name.to_lowercase() == name)
}
