//! GitHub operations used by a branch migration.
//!
//! [`GitHubOperations`] is the seam between the orchestration and the API;
//! [`OctocrabClient`] is the production implementation.

mod client;
mod error;
mod types;

pub use client::OctocrabClient;
pub use error::GitHubError;
pub use types::{
    PagesBuildType, PagesConfiguration, PagesStatus, PullRequest, PullRequestQuery,
    PullRequestState,
};

use crate::repository::RepositoryId;
use async_trait::async_trait;

/// GitHub capabilities a migration needs, scoped per call by repository.
#[async_trait]
pub trait GitHubOperations: Send + Sync {
    /// Returns the Pages status; a repository without Pages is reported as
    /// [`PagesStatus::disabled`], not as an error.
    async fn get_pages_config(&self, repository: &RepositoryId)
        -> Result<PagesStatus, GitHubError>;

    /// Replaces the Pages source configuration.
    async fn update_pages_config(
        &self,
        repository: &RepositoryId,
        configuration: &PagesConfiguration,
    ) -> Result<(), GitHubError>;

    /// Lists pull requests matching the query.
    async fn list_pull_requests(
        &self,
        repository: &RepositoryId,
        query: &PullRequestQuery,
    ) -> Result<Vec<PullRequest>, GitHubError>;

    /// Changes the base branch of a pull request.
    async fn update_pull_request_base(
        &self,
        repository: &RepositoryId,
        number: u64,
        base: &str,
    ) -> Result<(), GitHubError>;

    /// Returns the repository's current default branch.
    async fn get_default_branch(&self, repository: &RepositoryId) -> Result<String, GitHubError>;

    /// Sets the repository's default branch.
    async fn set_default_branch(
        &self,
        repository: &RepositoryId,
        branch: &str,
    ) -> Result<(), GitHubError>;

    /// Returns true if the branch is protected. A missing branch is not protected.
    async fn check_branch_protection(
        &self,
        repository: &RepositoryId,
        branch: &str,
    ) -> Result<bool, GitHubError>;
}
