//! Configuration error types.

/// Errors that can occur when loading, saving, or parsing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read from disk.
    #[error("failed to read config: {0}")]
    Read(#[source] std::io::Error),

    /// The config file could not be written to disk.
    #[error("failed to write config: {0}")]
    Write(#[source] std::io::Error),

    /// The RON content did not parse.
    #[error("failed to parse config: {0}")]
    Parse(#[source] ron::error::SpannedError),

    /// The config could not be serialized to RON.
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] ron::Error),
}
