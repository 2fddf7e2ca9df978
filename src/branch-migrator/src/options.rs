//! Per-repository migration options.

use crate::branch::{BranchName, BranchNameError};
use crate::repository::{RepositoryId, RepositoryIdError};
use std::path::PathBuf;
use thiserror::Error;

/// Default remote used for identifier resolution and pushes.
pub const DEFAULT_REMOTE: &str = "origin";

/// Default location of GitHub Actions workflows.
pub const DEFAULT_WORKFLOWS_DIRECTORY: &str = ".github/workflows";

/// Invalid migration options, detected before anything is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Repository path was empty.
    #[error("repository path is empty")]
    EmptyRepositoryPath,

    /// Remote name was empty.
    #[error("remote name is empty")]
    EmptyRemote,

    /// Source branch was empty or invalid.
    #[error("invalid source branch: {0}")]
    SourceBranch(#[source] BranchNameError),

    /// Target branch was empty or invalid.
    #[error("invalid target branch: {0}")]
    TargetBranch(#[source] BranchNameError),

    /// Source and target are the same branch.
    #[error("source and target branch are both '{0}'")]
    SameBranch(String),

    /// Repository identifier is not "owner/name".
    #[error(transparent)]
    RepositoryId(#[from] RepositoryIdError),

    /// The remote URL does not name a GitHub repository.
    #[error("cannot derive owner/name from remote '{remote}' ({url})")]
    UnrecognizedRemote { remote: String, url: String },
}

/// Options for migrating a single repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOptions {
    /// Local working tree of the repository.
    pub repository_path: PathBuf,

    /// Git remote to resolve the identifier from and push to.
    pub remote_name: String,

    /// "owner/name" on GitHub; resolved from the remote URL when `None`.
    pub repository_identifier: Option<String>,

    /// Workflows directory, relative to the repository unless absolute.
    pub workflows_directory: PathBuf,

    /// Branch being migrated away from.
    pub source_branch: String,

    /// Branch being migrated to.
    pub target_branch: String,

    /// Push the workflow commit to the remote.
    pub push_updates: bool,

    /// Log every git command and its output at info level.
    pub enable_debug_logging: bool,
}

impl MigrationOptions {
    /// Creates options with the default remote and workflows directory.
    pub fn new(
        repository_path: impl Into<PathBuf>,
        source_branch: impl Into<String>,
        target_branch: impl Into<String>,
    ) -> Self {
        Self {
            repository_path: repository_path.into(),
            remote_name: DEFAULT_REMOTE.to_string(),
            repository_identifier: None,
            workflows_directory: PathBuf::from(DEFAULT_WORKFLOWS_DIRECTORY),
            source_branch: source_branch.into(),
            target_branch: target_branch.into(),
            push_updates: false,
            enable_debug_logging: false,
        }
    }

    /// Sets the repository identifier.
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.repository_identifier = Some(identifier.into());
        self
    }

    /// Sets the remote name.
    #[must_use]
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote_name = remote.into();
        self
    }

    /// Sets the workflows directory.
    #[must_use]
    pub fn with_workflows_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.workflows_directory = directory.into();
        self
    }

    /// Enables or disables pushing the workflow commit.
    #[must_use]
    pub fn with_push(mut self, push_updates: bool) -> Self {
        self.push_updates = push_updates;
        self
    }

    /// Enables or disables verbose command logging.
    #[must_use]
    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.enable_debug_logging = enabled;
        self
    }

    /// Checks the options and returns their validated form.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] describing the first problem found.
    pub fn validate(&self) -> Result<ValidatedOptions, ValidationError> {
        if self.repository_path.as_os_str().is_empty() {
            return Err(ValidationError::EmptyRepositoryPath);
        }
        let remote_name = self.remote_name.trim();
        if remote_name.is_empty() {
            return Err(ValidationError::EmptyRemote);
        }

        let source = BranchName::parse(&self.source_branch).map_err(ValidationError::SourceBranch)?;
        let target = BranchName::parse(&self.target_branch).map_err(ValidationError::TargetBranch)?;
        if source == target {
            return Err(ValidationError::SameBranch(source.to_string()));
        }

        let identifier = self
            .repository_identifier
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::parse::<RepositoryId>)
            .transpose()?;

        Ok(ValidatedOptions {
            repository_path: self.repository_path.clone(),
            remote_name: remote_name.to_string(),
            identifier,
            workflows_directory: self.repository_path.join(&self.workflows_directory),
            source,
            target,
            push_updates: self.push_updates,
            debug_logging: self.enable_debug_logging,
        })
    }
}

/// Options that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOptions {
    pub repository_path: PathBuf,
    pub remote_name: String,
    pub identifier: Option<RepositoryId>,
    /// Absolute or repository-joined workflows directory.
    pub workflows_directory: PathBuf,
    pub source: BranchName,
    pub target: BranchName,
    pub push_updates: bool,
    pub debug_logging: bool,
}
