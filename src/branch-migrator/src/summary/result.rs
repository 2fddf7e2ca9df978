//! Processing result types.

use crate::migration::MigrationResult;
use crate::safety::SafetyStatus;

/// Result of processing a single repository.
#[derive(Debug, Clone)]
pub enum ProcessingResult {
    /// The migration ran to completion.
    Migrated {
        /// Repository label.
        repository: String,
        /// Migration result.
        result: Box<MigrationResult>,
    },

    /// Only the safety evaluation ran.
    Checked {
        /// Repository label.
        repository: String,
        /// Safety verdict for the source branch.
        status: SafetyStatus,
    },

    /// Processing failed.
    Failed {
        /// Repository label.
        repository: String,
        /// Error message.
        error: String,
        /// Work completed before the failure, if the migration started.
        partial: Option<Box<MigrationResult>>,
    },
}

impl ProcessingResult {
    /// Returns the repository label.
    #[must_use]
    pub fn repository(&self) -> &str {
        match self {
            Self::Migrated { repository, .. }
            | Self::Checked { repository, .. }
            | Self::Failed { repository, .. } => repository,
        }
    }
}
