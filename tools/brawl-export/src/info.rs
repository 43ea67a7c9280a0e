//! Asset inspection for the `info` command

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result, bail};
use brawl_common::formats::{FGT_MAGIC_FLAGGED, FGT_MAGIC_RAW, FighterModel, LVL_MAGIC, LevelModel};
use brawl_common::{decode_fighter, decode_level};

/// Decoded asset of either kind
#[derive(Debug)]
pub enum AssetSummary {
    Fighter {
        /// Stored frame block was flagged (delta and/or zstd)
        compressed: bool,
        file_size: usize,
        model: FighterModel,
    },
    Level {
        file_size: usize,
        model: LevelModel,
    },
}

/// Decode the runtime asset at `path`, picking the format by magic.
pub fn inspect(path: &Path) -> Result<AssetSummary> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read asset: {:?}", path))?;
    inspect_bytes(&data).with_context(|| format!("Failed to decode asset: {:?}", path))
}

pub fn inspect_bytes(data: &[u8]) -> Result<AssetSummary> {
    let Some(magic) = data.get(0..4) else {
        bail!("File too short for a magic ({} bytes)", data.len());
    };

    if magic == FGT_MAGIC_RAW || magic == FGT_MAGIC_FLAGGED {
        Ok(AssetSummary::Fighter {
            compressed: magic == FGT_MAGIC_FLAGGED,
            file_size: data.len(),
            model: decode_fighter(data)?,
        })
    } else if magic == LVL_MAGIC {
        Ok(AssetSummary::Level {
            file_size: data.len(),
            model: decode_level(data)?,
        })
    } else {
        bail!("Unknown asset magic {:?}", String::from_utf8_lossy(magic))
    }
}

impl fmt::Display for AssetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetSummary::Fighter {
                compressed,
                file_size,
                model,
            } => {
                let note = if *compressed {
                    " (compressed frames)"
                } else {
                    ""
                };
                writeln!(
                    f,
                    "fighter: {} frames, {} vertices, {} indices, {} bytes{}",
                    model.frame_count,
                    model.vertex_count,
                    model.index_count(),
                    file_size,
                    note
                )?;
                for (index, cue) in model.animations.iter().enumerate() {
                    writeln!(
                        f,
                        "  cue {:2}: frames {}..={} @ {} fps",
                        index,
                        cue.start,
                        cue.end(),
                        cue.fps
                    )?;
                }
                Ok(())
            }
            AssetSummary::Level { file_size, model } => writeln!(
                f,
                "level: {} vertices, {} indices, {} bytes",
                model.vertex_count, model.index_count, file_size
            ),
        }
    }
}
