//! Configuration for the landform pipeline.
//!
//! Settings persist to disk as RON files and can be overridden per run via
//! clap CLI flags.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CaptureConfig, Config, DebugConfig, MeshingConfig, SegmentationConfig};
pub use error::ConfigError;
