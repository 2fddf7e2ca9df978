//! Workflow rewrite error types.

use thiserror::Error;

/// Errors that can occur while rewriting workflow files.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Failed to read a workflow file or list the directory.
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a rewritten workflow file.
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The workflow could not be rewritten; the file was left untouched.
    #[error("Failed to rewrite '{path}': {source}")]
    Rewrite {
        path: String,
        #[source]
        source: RewriteError,
    },
}

/// Errors from rewriting the text of a single workflow.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("invalid workflow YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The in-place edit did not produce exactly the planned filter changes.
    #[error("branch filters use a layout that cannot be rewritten in place")]
    UnsupportedLayout,
}
