//! Workflow file rewriting.
//!
//! Scans a GitHub Actions workflows directory and moves branch filters from
//! the old branch to the new one, writing back only files that changed.

mod error;
mod rewriter;

pub use error::{RewriteError, WorkflowError};
pub use rewriter::rewrite_content;

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Files changed by a workflow rewrite, in scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkflowOutcome {
    /// Paths of files whose content was rewritten.
    pub updated_files: Vec<PathBuf>,
}

impl WorkflowOutcome {
    /// Returns true if no file changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updated_files.is_empty()
    }
}

/// Rewrites branch filters in every workflow file under `directory`.
///
/// Only `*.yml` and `*.yaml` files directly inside the directory are
/// considered, in file name order. A missing directory yields an empty
/// outcome.
///
/// # Errors
///
/// Returns [`WorkflowError`] if the directory or a file cannot be read or
/// written, or if a workflow cannot be rewritten. Files processed before the
/// failing one keep their changes.
pub fn rewrite_workflows(
    directory: &Path,
    source: &str,
    target: &str,
) -> Result<WorkflowOutcome, WorkflowError> {
    let mut outcome = WorkflowOutcome::default();

    if !directory.is_dir() {
        debug!(path = %directory.display(), "Workflows directory not found, skipping");
        return Ok(outcome);
    }

    for path in workflow_files(directory)? {
        let content = std::fs::read_to_string(&path).map_err(|e| WorkflowError::Read {
            path: path.display().to_string(),
            source: e,
        })?;

        let rewritten =
            rewrite_content(&content, source, target).map_err(|e| WorkflowError::Rewrite {
                path: path.display().to_string(),
                source: e,
            })?;
        if rewritten == content {
            continue;
        }

        std::fs::write(&path, rewritten).map_err(|e| WorkflowError::Write {
            path: path.display().to_string(),
            source: e,
        })?;
        info!(path = %path.display(), "Rewrote workflow branch filters");
        outcome.updated_files.push(path);
    }

    Ok(outcome)
}

/// Lists workflow files directly inside `directory`, sorted by name.
fn workflow_files(directory: &Path) -> Result<Vec<PathBuf>, WorkflowError> {
    let read_error = |e| WorkflowError::Read {
        path: directory.display().to_string(),
        source: e,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(directory).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        let is_workflow = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == "yml" || ext == "yaml");
        if is_workflow && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
