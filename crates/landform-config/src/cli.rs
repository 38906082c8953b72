//! Command-line argument parsing for the landform pipeline.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Landform pipeline command-line arguments.
///
/// CLI values override settings loaded from the config file.
#[derive(Parser, Debug, Default)]
#[command(name = "landform", about = "Height-field landmass meshing")]
pub struct CliArgs {
    /// Capture resolution in pixels per side.
    #[arg(long)]
    pub resolution: Option<u32>,

    /// Number of stacked contour levels per landmass.
    #[arg(long)]
    pub levels: Option<usize>,

    /// World seed for deterministic mesh output.
    #[arg(long)]
    pub seed: Option<u64>,

    /// World-space height of a full-value landmass.
    #[arg(long)]
    pub world_height: Option<f32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Output directory for debug images and exported meshes.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Write height/cluster debug PNGs.
    #[arg(long)]
    pub dump_images: Option<bool>,

    /// Path to a RON config file.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(resolution) = args.resolution {
            self.capture.resolution = resolution;
        }
        if let Some(levels) = args.levels {
            self.meshing.level_count = levels;
        }
        if let Some(seed) = args.seed {
            self.meshing.world_seed = seed;
        }
        if let Some(height) = args.world_height {
            self.meshing.world_height = height;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(ref dir) = args.out_dir {
            self.debug.out_dir = dir.clone();
        }
        if let Some(dump) = args.dump_images {
            self.debug.dump_images = dump;
        }
    }
}
