//! Migration result types.

use crate::repository::RepositoryId;
use crate::safety::SafetyStatus;
use crate::workflows::WorkflowOutcome;
use serde::Serialize;

/// Everything a single migration changed, plus the deletion verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationResult {
    /// Repository the GitHub steps ran against, once resolved.
    pub repository: Option<RepositoryId>,

    /// Workflow files that were rewritten.
    pub workflow_outcome: WorkflowOutcome,

    /// Whether the rewritten workflows were committed.
    pub committed: bool,

    /// Whether the commit was pushed.
    pub pushed: bool,

    /// Whether the Pages source branch was switched.
    pub pages_configuration_updated: bool,

    /// Whether the default branch was switched.
    pub default_branch_updated: bool,

    /// Pull requests whose base was switched, in the order they were listed.
    pub retargeted_pull_requests: Vec<u64>,

    /// Whether the source branch can now be deleted.
    pub safety_status: SafetyStatus,
}

impl Default for MigrationResult {
    fn default() -> Self {
        Self {
            repository: None,
            workflow_outcome: WorkflowOutcome::default(),
            committed: false,
            pushed: false,
            pages_configuration_updated: false,
            default_branch_updated: false,
            retargeted_pull_requests: Vec::new(),
            safety_status: SafetyStatus::not_evaluated(),
        }
    }
}

impl MigrationResult {
    /// Returns true if the migration changed anything locally or on GitHub.
    #[must_use]
    pub fn changed_anything(&self) -> bool {
        !self.workflow_outcome.is_empty()
            || self.pages_configuration_updated
            || self.default_branch_updated
            || !self.retargeted_pull_requests.is_empty()
    }
}
