//! Batch configuration loading.
//!
//! A batch file names the branches to migrate and the repositories to
//! migrate them in:
//!
//! ```toml
//! source-branch = "main"
//! target-branch = "master"
//! push = true
//!
//! [[repositories]]
//! path = "../website"
//! identifier = "octo/website"
//!
//! [[repositories]]
//! path = "../tooling"
//! remote = "upstream"
//! ```

mod error;
mod repository;

pub use error::ConfigError;
pub use repository::RepositoryEntry;

use crate::options::{MigrationOptions, DEFAULT_REMOTE, DEFAULT_WORKFLOWS_DIRECTORY};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Parsed batch configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BatchConfig {
    /// Branch being migrated away from.
    pub source_branch: String,

    /// Branch being migrated to.
    pub target_branch: String,

    /// Remote used unless a repository overrides it.
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Workflows directory, relative to each repository.
    #[serde(default = "default_workflows_directory")]
    pub workflows_directory: PathBuf,

    /// Push workflow commits to the remote.
    #[serde(default)]
    pub push: bool,

    /// Repositories to migrate, in order.
    #[serde(default)]
    pub repositories: Vec<RepositoryEntry>,
}

fn default_remote() -> String {
    DEFAULT_REMOTE.to_string()
}

fn default_workflows_directory() -> PathBuf {
    PathBuf::from(DEFAULT_WORKFLOWS_DIRECTORY)
}

impl BatchConfig {
    /// Loads and validates a batch file.
    ///
    /// Relative repository paths are resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing, unreadable, not valid
    /// TOML or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        info!(path = %path.display(), "Loading batch configuration");

        if !path.exists() {
            return Err(ConfigError::Missing {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut config = Self::parse(&content, path)?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for entry in &mut config.repositories {
            if entry.path.is_relative() {
                entry.path = base.join(&entry.path);
            }
        }

        debug!(repositories = config.repositories.len(), "Loaded batch configuration");
        Ok(config)
    }

    /// Parses and validates batch TOML; `origin` is only used in errors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the TOML is invalid or fails validation.
    pub fn parse(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_path_buf(),
            source: e,
        })?;
        config.validate(origin)?;
        Ok(config)
    }

    fn validate(&self, origin: &Path) -> Result<(), ConfigError> {
        let invalid = |message: &str| ConfigError::Invalid {
            path: origin.to_path_buf(),
            message: message.to_string(),
        };

        if self.source_branch.trim().is_empty() {
            return Err(invalid("source-branch is empty"));
        }
        if self.target_branch.trim().is_empty() {
            return Err(invalid("target-branch is empty"));
        }
        if self.source_branch.trim() == self.target_branch.trim() {
            return Err(invalid("source-branch and target-branch are the same"));
        }
        if self.repositories.is_empty() {
            return Err(invalid("no [[repositories]] listed"));
        }
        if self
            .repositories
            .iter()
            .any(|entry| entry.path.as_os_str().is_empty())
        {
            return Err(invalid("repository path is empty"));
        }

        Ok(())
    }

    /// Builds migration options for one repository entry.
    #[must_use]
    pub fn options_for(&self, entry: &RepositoryEntry) -> MigrationOptions {
        let mut options = MigrationOptions::new(
            &entry.path,
            self.source_branch.clone(),
            self.target_branch.clone(),
        )
        .with_remote(entry.remote.clone().unwrap_or_else(|| self.remote.clone()))
        .with_workflows_directory(&self.workflows_directory)
        .with_push(self.push);

        if let Some(identifier) = &entry.identifier {
            options = options.with_identifier(identifier.clone());
        }
        options
    }
}
