//! Manifest parsing and build orchestration
//!
//! Parses assets.toml and converts every listed fighter and level, one at a
//! time, through a single reusable scratch buffer.

use anyhow::{Context, Result, bail};
use brawl_common::formats::{DEFAULT_ZSTD_LEVEL, FGT_EXT, FrameBlockOptions, FrameEncoding, LVL_EXT};
use brawl_common::ByteWriter;
use hashbrown::HashSet;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Initial scratch size; the writer grows past it if an asset needs more
pub const SCRATCH_CAPACITY: usize = 20 * 1024 * 1024;

/// Root manifest structure
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default, rename = "fighter")]
    pub fighters: Vec<FighterEntry>,
    #[serde(default, rename = "level")]
    pub levels: Vec<LevelEntry>,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("assets/")
}

fn default_zstd_level() -> i32 {
    DEFAULT_ZSTD_LEVEL
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FighterEntry {
    pub id: String,
    /// MD3 vertex-animation mesh
    pub mesh: PathBuf,
    /// Tab-separated cue table
    pub animations: PathBuf,
    /// Skin recompressed to `<id>.jpg` next to the .fgt
    #[serde(default)]
    pub texture: Option<PathBuf>,
    #[serde(default)]
    pub encoding: FrameEncoding,
    #[serde(default = "default_zstd_level")]
    pub zstd_level: i32,
}

impl FighterEntry {
    pub fn frame_options(&self) -> FrameBlockOptions {
        FrameBlockOptions {
            encoding: self.encoding,
            zstd_level: self.zstd_level,
            references: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelEntry {
    pub id: String,
    /// MS3D polygon mesh
    pub mesh: PathBuf,
    /// Atlas frame list (JSON, pixel rectangles)
    pub atlas: PathBuf,
    /// Atlas image, read for its dimensions
    pub atlas_image: PathBuf,
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    parse_manifest(&content).with_context(|| format!("Failed to parse manifest: {:?}", path))
}

pub fn parse_manifest(content: &str) -> Result<Manifest> {
    Ok(toml::from_str(content)?)
}

/// Validate a manifest without building
pub fn validate(manifest: &Manifest) -> Result<()> {
    let mut ids = HashSet::new();
    for entry in &manifest.fighters {
        if !ids.insert(("fighter", entry.id.as_str())) {
            bail!("Duplicate fighter id '{}'", entry.id);
        }
        require_file("Fighter", &entry.id, "mesh", &entry.mesh)?;
        require_file("Fighter", &entry.id, "animations", &entry.animations)?;
        if let Some(texture) = &entry.texture {
            require_file("Fighter", &entry.id, "texture", texture)?;
        }
    }
    for entry in &manifest.levels {
        if !ids.insert(("level", entry.id.as_str())) {
            bail!("Duplicate level id '{}'", entry.id);
        }
        require_file("Level", &entry.id, "mesh", &entry.mesh)?;
        require_file("Level", &entry.id, "atlas", &entry.atlas)?;
        require_file("Level", &entry.id, "atlas image", &entry.atlas_image)?;
    }
    Ok(())
}

fn require_file(kind: &str, id: &str, what: &str, path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("{} '{}' {} not found: {:?}", kind, id, what, path);
    }
    Ok(())
}

/// Build all assets from a manifest
pub fn build_all(manifest: &Manifest, output_override: Option<&Path>) -> Result<()> {
    validate(manifest)?;

    let output_dir = output_override.unwrap_or(&manifest.output.dir);
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let mut scratch = ByteWriter::with_capacity(SCRATCH_CAPACITY);

    for entry in &manifest.fighters {
        let output = output_dir.join(format!("{}.{}", entry.id, FGT_EXT));
        tracing::info!("Converting fighter: {} -> {:?}", entry.id, output);

        let model = crate::fighter::load_fighter(&entry.mesh, &entry.animations)?;
        crate::fighter::write_fighter_file(&mut scratch, &model, &entry.frame_options(), &output)?;

        if let Some(texture) = &entry.texture {
            let skin = output_dir.join(format!("{}.jpg", entry.id));
            crate::texture::convert_texture(texture, &skin)?;
        }
    }

    for entry in &manifest.levels {
        let output = output_dir.join(format!("{}.{}", entry.id, LVL_EXT));
        tracing::info!("Converting level: {} -> {:?}", entry.id, output);

        let model = crate::level::load_level(&entry.mesh, &entry.atlas, &entry.atlas_image)?;
        crate::level::write_level_file(&mut scratch, &model, &output)?;
    }

    tracing::info!(
        "Built {} fighters and {} levels into {:?}",
        manifest.fighters.len(),
        manifest.levels.len(),
        output_dir
    );
    Ok(())
}
