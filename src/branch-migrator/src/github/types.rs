//! GitHub data exchanged with the orchestrator.

use serde::Serialize;

/// An open or closed pull request, reduced to the fields the migration uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequest {
    /// Pull request number.
    pub number: u64,

    /// Branch the pull request merges into.
    pub base: String,

    /// Branch the pull request merges from.
    pub head: String,
}

/// Pull request state filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PullRequestState {
    #[default]
    Open,
    Closed,
    All,
}

/// Filter for listing pull requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestQuery {
    /// State filter.
    pub state: PullRequestState,

    /// Only return pull requests with this base branch.
    pub base: Option<String>,

    /// Maximum number of pull requests to return; `None` reads every page.
    pub limit: Option<usize>,
}

impl PullRequestQuery {
    /// Largest page size accepted by the GitHub API.
    pub const PAGE_SIZE: u8 = 100;

    /// Every open pull request targeting `base`.
    pub fn open_targeting(base: impl Into<String>) -> Self {
        Self {
            state: PullRequestState::Open,
            base: Some(base.into()),
            limit: None,
        }
    }
}

/// How GitHub Pages builds the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PagesBuildType {
    /// Built from a branch and path ("Deploy from a branch").
    Legacy,

    /// Built by a GitHub Actions workflow.
    Workflow,

    /// A build type this crate does not know about.
    Other(String),
}

impl PagesBuildType {
    /// Maps GitHub's `build_type` value.
    #[must_use]
    pub fn from_api(value: Option<&str>) -> Self {
        match value {
            // Sites created before `build_type` existed are branch-based.
            None | Some("legacy") => Self::Legacy,
            Some("workflow") => Self::Workflow,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    /// Returns GitHub's `build_type` value.
    #[must_use]
    pub fn as_api_str(&self) -> &str {
        match self {
            Self::Legacy => "legacy",
            Self::Workflow => "workflow",
            Self::Other(value) => value,
        }
    }
}

/// Current GitHub Pages state of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagesStatus {
    /// Whether Pages is enabled at all.
    pub enabled: bool,

    /// Build type, meaningful only when enabled.
    pub build_type: PagesBuildType,

    /// Branch the site is published from (legacy builds).
    pub source_branch: Option<String>,

    /// Directory within the branch (legacy builds), e.g. `/` or `/docs`.
    pub source_path: Option<String>,
}

impl PagesStatus {
    /// Status of a repository without a Pages site.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            build_type: PagesBuildType::Legacy,
            source_branch: None,
            source_path: None,
        }
    }

    /// Returns true when the site is published from `branch` by a legacy build.
    #[must_use]
    pub fn publishes_from_branch(&self, branch: &str) -> bool {
        self.enabled
            && self.build_type == PagesBuildType::Legacy
            && self.source_branch.as_deref() == Some(branch)
    }
}

/// Desired GitHub Pages configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagesConfiguration {
    pub build_type: PagesBuildType,
    pub source_branch: String,
    pub source_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_build_types() {
        assert_eq!(PagesBuildType::from_api(None), PagesBuildType::Legacy);
        assert_eq!(PagesBuildType::from_api(Some("legacy")), PagesBuildType::Legacy);
        assert_eq!(
            PagesBuildType::from_api(Some("workflow")),
            PagesBuildType::Workflow
        );
        assert_eq!(
            PagesBuildType::from_api(Some("custom")).as_api_str(),
            "custom"
        );
    }

    #[test]
    fn publishes_from_branch_requires_legacy_build() {
        let mut status = PagesStatus {
            enabled: true,
            build_type: PagesBuildType::Legacy,
            source_branch: Some("main".to_string()),
            source_path: Some("/".to_string()),
        };
        assert!(status.publishes_from_branch("main"));
        assert!(!status.publishes_from_branch("master"));

        status.build_type = PagesBuildType::Workflow;
        assert!(!status.publishes_from_branch("main"));

        assert!(!PagesStatus::disabled().publishes_from_branch("main"));
    }
}
