//! brawl-export - Brawl asset export tool
//!
//! Converts authoring assets (MD3 fighters, MS3D levels, BMP skins) to the
//! runtime formats (.fgt, .lvl, .jpg)

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use brawl_export::{FGT_EXT, FrameEncoding, LVL_EXT, fighter, info, level, manifest, texture};

#[derive(Parser)]
#[command(name = "brawl-export")]
#[command(about = "Brawl asset export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build assets from a manifest file
    Build {
        /// Path to assets.toml manifest
        #[arg(default_value = "assets.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate manifest without building
    Check {
        /// Path to assets.toml manifest
        #[arg(default_value = "assets.toml")]
        manifest: PathBuf,
    },

    /// Export a single fighter
    Fighter {
        /// Input MD3 mesh
        input: PathBuf,

        /// Tab-separated animation cue table
        #[arg(short, long)]
        animations: PathBuf,

        /// Output .fgt file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Frame block encoding (raw, delta, zstd, delta-zstd)
        #[arg(short, long, default_value = "raw")]
        encoding: FrameEncoding,

        /// Skin texture to recompress next to the output
        #[arg(short, long)]
        texture: Option<PathBuf>,
    },

    /// Export a single level
    Level {
        /// Input MS3D mesh
        input: PathBuf,

        /// Atlas frame list (JSON)
        #[arg(long)]
        atlas: PathBuf,

        /// Atlas image
        #[arg(long)]
        atlas_image: PathBuf,

        /// Output .lvl file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a summary of a .fgt or .lvl file
    Info {
        /// Asset file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            manifest,
            output,
            verbose,
        } => {
            if verbose {
                tracing::info!("Building assets from {:?}", manifest);
            }
            let config = manifest::load_manifest(&manifest)?;
            manifest::build_all(&config, output.as_deref())?;
            tracing::info!("Build complete!");
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }

        Commands::Fighter {
            input,
            animations,
            output,
            encoding,
            texture: skin,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension(FGT_EXT));
            tracing::info!("Converting {:?} -> {:?}", input, output);
            fighter::convert_fighter(&input, &animations, &output, encoding)?;
            if let Some(skin) = skin {
                texture::convert_texture(&skin, &output.with_extension("jpg"))?;
            }
            tracing::info!("Done!");
        }

        Commands::Level {
            input,
            atlas,
            atlas_image,
            output,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension(LVL_EXT));
            tracing::info!("Converting {:?} -> {:?}", input, output);
            level::convert_level(&input, &atlas, &atlas_image, &output)?;
            tracing::info!("Done!");
        }

        Commands::Info { input } => {
            let summary = info::inspect(&input)?;
            print!("{}", summary);
        }
    }

    Ok(())
}
