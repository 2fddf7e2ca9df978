//! Batch runner: migrates every repository listed in a batch file.
//!
//! Repositories are processed one after another. A failure is logged and
//! recorded in the summary, then the run continues with the next repository.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::cancel::Cancellation;
use crate::config::{BatchConfig, RepositoryEntry};
use crate::git::{GitExecutor, ProcessGitExecutor};
use crate::github::{GitHubOperations, OctocrabClient};
use crate::migration::Migrator;
use crate::summary::{ProcessingResult, RunSummary};
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};

/// Orchestrates a full batch run.
pub struct Runner {
    config: RunnerConfig,
    migrator: Migrator,
}

impl Runner {
    /// Builds a runner using `git` and an authenticated GitHub client.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the GitHub client cannot be built.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let github = OctocrabClient::with_token(config.token())?;
        Ok(Self::with_clients(
            config,
            Arc::new(ProcessGitExecutor::new()),
            Arc::new(github),
        ))
    }

    /// Builds a runner with the given collaborators.
    pub fn with_clients(
        config: RunnerConfig,
        git: Arc<dyn GitExecutor>,
        github: Arc<dyn GitHubOperations>,
    ) -> Self {
        Self {
            config,
            migrator: Migrator::new(git, github),
        }
    }

    /// Processes every repository in the batch file.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] only if the batch file cannot be loaded;
    /// per-repository failures are part of the summary.
    pub async fn run(&self, cancellation: &Cancellation) -> Result<RunSummary, RunnerError> {
        let mut batch = BatchConfig::load(self.config.config_path())?;
        if let Some(push) = self.config.push_override() {
            batch.push = push;
        }

        let mut summary = RunSummary::new(self.config.check_only());
        info!(
            count = batch.repositories.len(),
            source = %batch.source_branch,
            target = %batch.target_branch,
            "Processing repositories"
        );

        for (index, entry) in batch.repositories.iter().enumerate() {
            if cancellation.is_cancelled() {
                warn!(
                    remaining = batch.repositories.len() - index,
                    "Cancelled, skipping remaining repositories"
                );
                break;
            }

            let span = info_span!("repository", repo = %entry.label());
            let result = self
                .process_repository(&batch, entry, cancellation)
                .instrument(span)
                .await;
            summary.record_result(&result);
        }

        Ok(summary)
    }

    async fn process_repository(
        &self,
        batch: &BatchConfig,
        entry: &RepositoryEntry,
        cancellation: &Cancellation,
    ) -> ProcessingResult {
        let repository = entry.label();
        let options = batch
            .options_for(entry)
            .with_debug_logging(self.config.debug_logging());

        if self.config.check_only() {
            return match self.migrator.check(cancellation, &options).await {
                Ok(status) => ProcessingResult::Checked { repository, status },
                Err(e) => {
                    error!(error = %e, "Safety check failed");
                    ProcessingResult::Failed {
                        repository,
                        error: e.to_string(),
                        partial: None,
                    }
                }
            };
        }

        match self.migrator.execute(cancellation, &options).await {
            Ok(result) => ProcessingResult::Migrated {
                repository,
                result: Box::new(result),
            },
            Err(failure) => {
                error!(error = %failure.error, "Migration failed");
                ProcessingResult::Failed {
                    repository,
                    error: failure.error.to_string(),
                    partial: Some(failure.result),
                }
            }
        }
    }
}
