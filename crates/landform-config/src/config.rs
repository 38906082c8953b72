//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Height-field capture settings.
    pub capture: CaptureConfig,
    /// Cluster segmentation settings.
    pub segmentation: SegmentationConfig,
    /// Loop-stack meshing settings.
    pub meshing: MeshingConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Height-field capture settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptureConfig {
    /// Capture resolution in pixels per side.
    pub resolution: u32,
    /// World-space width the capture covers.
    pub world_width: f32,
    /// World-space depth the capture covers.
    pub world_depth: f32,
    /// Height threshold below which a pixel is masked out as water.
    pub sea_level: u8,
}

/// Cluster segmentation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Maximum height difference between adjacent pixels of one cluster.
    pub difference_threshold: u8,
    /// Bounding-box extent (pixels) at or below which a cluster is a
    /// merge fragment.
    pub merge_extent: i32,
}

/// Loop-stack meshing settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeshingConfig {
    /// Number of stacked contour levels per landmass.
    pub level_count: usize,
    /// World-space height of a full-value landmass.
    pub world_height: f32,
    /// Baseline fraction of base-loop points kept per level.
    pub base_density: f32,
    /// World seed for the per-cluster RNG derivation.
    pub world_seed: u64,
}

/// Debug/development settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Write height/cluster debug PNGs during a pipeline run.
    pub dump_images: bool,
    /// Output directory for debug images and exported meshes.
    pub out_dir: PathBuf,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            resolution: 80,
            world_width: 200.0,
            world_depth: 200.0,
            sea_level: 90,
        }
    }
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            difference_threshold: 5,
            merge_extent: 3,
        }
    }
}

impl Default for MeshingConfig {
    fn default() -> Self {
        Self {
            level_count: 6,
            world_height: 10.0,
            base_density: 0.15,
            world_seed: 0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: String::new(),
            dump_images: true,
            out_dir: PathBuf::from("out"),
        }
    }
}

impl Config {
    /// Loads configuration from a RON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        ron::from_str(&text).map_err(ConfigError::Parse)
    }

    /// Saves configuration as pretty-printed RON.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(ConfigError::Serialize)?;
        std::fs::write(path, text).map_err(ConfigError::Write)
    }
}
