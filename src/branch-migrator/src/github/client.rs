//! Octocrab-backed implementation of [`GitHubOperations`].

use super::error::is_not_found;
use super::{
    GitHubError, GitHubOperations, PagesBuildType, PagesConfiguration, PagesStatus, PullRequest,
    PullRequestQuery, PullRequestState,
};
use crate::rate_limit::ensure_core_rate_limit;
use crate::repository::RepositoryId;
use async_trait::async_trait;
use octocrab::params::State;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// GitHub client using the REST API through octocrab.
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    octocrab: Octocrab,
}

/// Subset of `GET /repos/{owner}/{repo}/pages`.
#[derive(Debug, Deserialize)]
struct PagesResponse {
    build_type: Option<String>,
    source: Option<PagesSourceResponse>,
}

#[derive(Debug, Deserialize)]
struct PagesSourceResponse {
    branch: String,
    path: Option<String>,
}

/// Body of `PUT /repos/{owner}/{repo}/pages`.
#[derive(Debug, Serialize)]
struct PagesUpdateRequest<'a> {
    build_type: &'a str,
    source: PagesSourceRequest<'a>,
}

#[derive(Debug, Serialize)]
struct PagesSourceRequest<'a> {
    branch: &'a str,
    path: &'a str,
}

/// Subset of `GET /repos/{owner}/{repo}/branches/{branch}`.
#[derive(Debug, Deserialize)]
struct BranchResponse {
    protected: bool,
}

impl OctocrabClient {
    /// Wraps an authenticated octocrab instance.
    pub fn new(octocrab: Octocrab) -> Self {
        Self { octocrab }
    }

    /// Builds a client authenticated with a personal access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_token(token: impl Into<String>) -> Result<Self, GitHubError> {
        let octocrab = Octocrab::builder().personal_token(token.into()).build()?;
        Ok(Self::new(octocrab))
    }
}

fn repo_route(repository: &RepositoryId, suffix: &str) -> String {
    format!("/repos/{}/{}{}", repository.owner, repository.name, suffix)
}

fn to_octocrab_state(state: PullRequestState) -> State {
    match state {
        PullRequestState::Open => State::Open,
        PullRequestState::Closed => State::Closed,
        PullRequestState::All => State::All,
    }
}

#[async_trait]
impl GitHubOperations for OctocrabClient {
    async fn get_pages_config(
        &self,
        repository: &RepositoryId,
    ) -> Result<PagesStatus, GitHubError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        let route = repo_route(repository, "/pages");

        let response: PagesResponse = match self.octocrab.get(&route, None::<&()>).await {
            Ok(response) => response,
            Err(e) if is_not_found(&e) => {
                debug!(repo = %repository, "Pages not enabled");
                return Ok(PagesStatus::disabled());
            }
            Err(e) => return Err(e.into()),
        };

        let (source_branch, source_path) = match response.source {
            Some(source) => (Some(source.branch), source.path),
            None => (None, None),
        };

        Ok(PagesStatus {
            enabled: true,
            build_type: PagesBuildType::from_api(response.build_type.as_deref()),
            source_branch,
            source_path,
        })
    }

    async fn update_pages_config(
        &self,
        repository: &RepositoryId,
        configuration: &PagesConfiguration,
    ) -> Result<(), GitHubError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        let body = PagesUpdateRequest {
            build_type: configuration.build_type.as_api_str(),
            source: PagesSourceRequest {
                branch: &configuration.source_branch,
                path: &configuration.source_path,
            },
        };

        // The endpoint answers 204 No Content, so skip response deserialization.
        let response = self
            .octocrab
            ._put(repo_route(repository, "/pages"), Some(&body))
            .await?;
        octocrab::map_github_error(response).await?;
        Ok(())
    }

    async fn list_pull_requests(
        &self,
        repository: &RepositoryId,
        query: &PullRequestQuery,
    ) -> Result<Vec<PullRequest>, GitHubError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        let limit = query.limit.unwrap_or(usize::MAX);
        let per_page = u8::try_from(limit).map_or(PullRequestQuery::PAGE_SIZE, |limit| {
            limit.min(PullRequestQuery::PAGE_SIZE)
        });

        let pulls = self.octocrab.pulls(&repository.owner, &repository.name);
        let mut request = pulls
            .list()
            .state(to_octocrab_state(query.state))
            .per_page(per_page);
        if let Some(base) = &query.base {
            request = request.base(base.clone());
        }

        let mut page = request.send().await?;
        let mut pull_requests = Vec::new();
        loop {
            pull_requests.extend(page.items.drain(..).map(|pr| PullRequest {
                number: pr.number,
                base: pr.base.ref_field,
                head: pr.head.ref_field,
            }));
            if pull_requests.len() >= limit || page.next.is_none() {
                break;
            }

            ensure_core_rate_limit(&self.octocrab).await?;
            match self
                .octocrab
                .get_page::<octocrab::models::pulls::PullRequest>(&page.next)
                .await?
            {
                Some(next) => page = next,
                None => break,
            }
        }

        pull_requests.truncate(limit);
        debug!(repo = %repository, count = pull_requests.len(), "Listed pull requests");
        Ok(pull_requests)
    }

    async fn update_pull_request_base(
        &self,
        repository: &RepositoryId,
        number: u64,
        base: &str,
    ) -> Result<(), GitHubError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        let route = repo_route(repository, &format!("/pulls/{number}"));
        let _: serde_json::Value = self
            .octocrab
            .patch(route, Some(&serde_json::json!({ "base": base })))
            .await
            .map_err(|e| GitHubError::from_api(e, format!("{repository}/pulls/{number}")))?;
        Ok(())
    }

    async fn get_default_branch(&self, repository: &RepositoryId) -> Result<String, GitHubError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        let repo = self
            .octocrab
            .repos(&repository.owner, &repository.name)
            .get()
            .await
            .map_err(|e| GitHubError::from_api(e, repository.full_name()))?;
        repo.default_branch
            .ok_or_else(|| GitHubError::UnexpectedResponse {
                resource: repository.full_name(),
                message: "repository has no default branch".to_string(),
            })
    }

    async fn set_default_branch(
        &self,
        repository: &RepositoryId,
        branch: &str,
    ) -> Result<(), GitHubError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        let _: serde_json::Value = self
            .octocrab
            .patch(
                repo_route(repository, ""),
                Some(&serde_json::json!({ "default_branch": branch })),
            )
            .await
            .map_err(|e| GitHubError::from_api(e, repository.full_name()))?;
        Ok(())
    }

    async fn check_branch_protection(
        &self,
        repository: &RepositoryId,
        branch: &str,
    ) -> Result<bool, GitHubError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        let route = repo_route(repository, &format!("/branches/{branch}"));

        match self.octocrab.get::<BranchResponse, _, _>(&route, None::<&()>).await {
            Ok(response) => Ok(response.protected),
            Err(e) if is_not_found(&e) => {
                debug!(repo = %repository, branch, "Branch not found, treating as unprotected");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}
