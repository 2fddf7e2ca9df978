//! Runner error types.

use crate::config::ConfigError;
use crate::github::GitHubError;
use thiserror::Error;

/// Errors that abort a batch run before or instead of processing repositories.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The GitHub client could not be built from the token.
    #[error("Failed to create GitHub client: {0}")]
    Client(#[from] GitHubError),
}
