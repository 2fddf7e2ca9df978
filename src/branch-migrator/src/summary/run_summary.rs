//! Run summary types.

use super::result::ProcessingResult;
use crate::migration::MigrationResult;

/// Summary of a complete run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of repositories processed.
    pub repositories_processed: usize,

    /// Number of repositories migrated without errors.
    pub repositories_migrated: usize,

    /// Number of repositories that failed.
    pub repositories_failed: usize,

    /// Number of workflow files rewritten.
    pub workflow_files_updated: usize,

    /// Number of pull requests retargeted.
    pub pull_requests_retargeted: usize,

    /// Number of repositories whose source branch can be deleted.
    pub branches_safe_to_delete: usize,

    /// Whether only safety checks were run.
    pub check_only: bool,

    /// Per-repository results, in processing order.
    pub results: Vec<ProcessingResult>,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(check_only: bool) -> Self {
        Self {
            check_only,
            ..Default::default()
        }
    }

    /// Updates the summary with a processing result.
    pub fn record_result(&mut self, result: &ProcessingResult) {
        self.repositories_processed += 1;
        match result {
            ProcessingResult::Migrated { result, .. } => {
                self.repositories_migrated += 1;
                self.record_changes(result);
                if result.safety_status.safe_to_delete {
                    self.branches_safe_to_delete += 1;
                }
            }
            ProcessingResult::Checked { status, .. } => {
                if status.safe_to_delete {
                    self.branches_safe_to_delete += 1;
                }
            }
            ProcessingResult::Failed { partial, .. } => {
                self.repositories_failed += 1;
                if let Some(partial) = partial {
                    self.record_changes(partial);
                }
            }
        }
        self.results.push(result.clone());
    }

    fn record_changes(&mut self, result: &MigrationResult) {
        self.workflow_files_updated += result.workflow_outcome.updated_files.len();
        self.pull_requests_retargeted += result.retargeted_pull_requests.len();
    }

    /// Returns true if any failures occurred.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.repositories_failed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safety::SafetyStatus;
    use std::path::PathBuf;

    #[test]
    fn can_record_results() {
        let mut summary = RunSummary::new(false);

        let mut migrated = MigrationResult::default();
        migrated.workflow_outcome.updated_files = vec![PathBuf::from("ci.yml")];
        migrated.retargeted_pull_requests = vec![1, 2];
        migrated.safety_status = SafetyStatus::safe();
        summary.record_result(&ProcessingResult::Migrated {
            repository: "octo/app".to_string(),
            result: Box::new(migrated),
        });

        let mut partial = MigrationResult::default();
        partial.retargeted_pull_requests = vec![3];
        summary.record_result(&ProcessingResult::Failed {
            repository: "octo/site".to_string(),
            error: "boom".to_string(),
            partial: Some(Box::new(partial)),
        });

        assert_eq!(summary.repositories_processed, 2);
        assert_eq!(summary.repositories_migrated, 1);
        assert_eq!(summary.repositories_failed, 1);
        assert_eq!(summary.workflow_files_updated, 1);
        assert_eq!(summary.pull_requests_retargeted, 3);
        assert_eq!(summary.branches_safe_to_delete, 1);
        assert_eq!(summary.results.len(), 2);
        assert_eq!(summary.results[1].repository(), "octo/site");
        assert!(summary.has_failures());
    }

    #[test]
    fn counts_safe_checks() {
        let mut summary = RunSummary::new(true);
        summary.record_result(&ProcessingResult::Checked {
            repository: "octo/app".to_string(),
            status: SafetyStatus::safe(),
        });
        assert_eq!(summary.branches_safe_to_delete, 1);
        assert!(!summary.has_failures());
    }
}
