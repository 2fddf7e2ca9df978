//! Repository entries of a batch configuration.

use serde::Deserialize;
use std::path::PathBuf;

/// One `[[repositories]]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RepositoryEntry {
    /// Local working tree.
    pub path: PathBuf,

    /// "owner/name" on GitHub; resolved from the remote when omitted.
    pub identifier: Option<String>,

    /// Remote overriding the batch default.
    pub remote: Option<String>,
}

impl RepositoryEntry {
    /// Returns a label for logs: the identifier if known, else the path.
    #[must_use]
    pub fn label(&self) -> String {
        self.identifier
            .clone()
            .unwrap_or_else(|| self.path.display().to_string())
    }
}
