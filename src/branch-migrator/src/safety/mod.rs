//! Safety evaluation for deleting a superseded branch.

mod status;

pub use status::{
    SafetyStatus, DEFAULT_BRANCH_REASON, OPEN_PULL_REQUESTS_REASON, PROTECTED_BRANCH_REASON,
};

use crate::github::{GitHubError, GitHubOperations, PullRequestQuery};
use crate::repository::RepositoryId;
use std::sync::Arc;
use tracing::{debug, info, info_span, Instrument};

/// Computes whether a branch can be deleted without breaking anything.
///
/// Only reads from GitHub, so it can be called any number of times.
#[derive(Clone)]
pub struct SafetyEvaluator {
    github: Arc<dyn GitHubOperations>,
}

impl SafetyEvaluator {
    /// Creates an evaluator using the given GitHub client.
    pub fn new(github: Arc<dyn GitHubOperations>) -> Self {
        Self { github }
    }

    /// Evaluates whether `branch` can be deleted from `repository`.
    ///
    /// Checks run in this order, each adding at most one reason:
    /// 1. open pull requests based on the branch
    /// 2. branch protection
    /// 3. the branch still being the default branch
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError`] if any lookup fails.
    pub async fn evaluate(
        &self,
        repository: &RepositoryId,
        branch: &str,
    ) -> Result<SafetyStatus, GitHubError> {
        let span = info_span!("evaluate_safety", repo = %repository, branch);

        async {
            let mut status = SafetyStatus::safe();

            let open = self
                .github
                .list_pull_requests(repository, &PullRequestQuery::open_targeting(branch))
                .await?;
            status.open_pull_requests = open
                .iter()
                .filter(|pr| pr.base == branch)
                .map(|pr| pr.number)
                .collect();
            if !status.open_pull_requests.is_empty() {
                debug!(prs = ?status.open_pull_requests, "Open pull requests target branch");
                status.block(OPEN_PULL_REQUESTS_REASON);
            }

            if self.github.check_branch_protection(repository, branch).await? {
                status.block(PROTECTED_BRANCH_REASON);
            }

            if self.github.get_default_branch(repository).await? == branch {
                status.block(DEFAULT_BRANCH_REASON);
            }

            info!(
                safe_to_delete = status.safe_to_delete,
                reasons = ?status.blocking_reasons,
                "Safety evaluation complete"
            );
            Ok(status)
        }
        .instrument(span)
        .await
    }
}
