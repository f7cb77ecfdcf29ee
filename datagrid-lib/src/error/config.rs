//! Configuration error types

use std::path::PathBuf;

/// Errors that can occur while loading a [`TableConfig`](crate::config::TableConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for this schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The config parsed but holds unusable values.
    #[error("Invalid config: {0}")]
    Invalid(String),
}
