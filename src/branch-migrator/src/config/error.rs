//! Batch configuration errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a batch file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Batch file not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("Failed to read batch file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse batch file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The file parsed but describes no usable migration.
    #[error("Invalid batch file '{}': {message}", path.display())]
    Invalid { path: PathBuf, message: String },
}
