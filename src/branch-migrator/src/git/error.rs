//! Git command error types.

use thiserror::Error;

/// Errors that can occur while running git.
#[derive(Debug, Error)]
pub enum GitError {
    /// The git process could not be started or awaited.
    #[error("Failed to execute git {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Git ran but exited with a non-zero status.
    #[error("git {command} exited with code {exit_code}: {stderr}")]
    NonZeroExit {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// The command was aborted because cancellation was requested.
    #[error("git {command} was cancelled")]
    Cancelled { command: String },
}
