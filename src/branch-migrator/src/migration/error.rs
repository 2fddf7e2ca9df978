//! Migration error types.

use super::result::MigrationResult;
use crate::git::GitError;
use crate::github::GitHubError;
use crate::options::ValidationError;
use crate::workflows::WorkflowError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The step a migration was in when something went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationStep {
    ResolveIdentifier,
    WorkflowRewrite,
    Commit,
    Push,
    PagesReconciliation,
    PullRequestRetargeting,
    DefaultBranchUpdate,
    SafetyEvaluation,
}

impl fmt::Display for MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ResolveIdentifier => "resolve identifier",
            Self::WorkflowRewrite => "workflow rewrite",
            Self::Commit => "commit",
            Self::Push => "push",
            Self::PagesReconciliation => "pages reconciliation",
            Self::PullRequestRetargeting => "pull request retargeting",
            Self::DefaultBranchUpdate => "default branch update",
            Self::SafetyEvaluation => "safety evaluation",
        })
    }
}

/// Local failure cause: either file access or a git command.
#[derive(Debug, Error)]
pub enum LocalFailure {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Git(#[from] GitError),
}

/// A single pull request that could not be retargeted.
#[derive(Debug, Error)]
#[error("#{number}: {source}")]
pub struct RetargetFailure {
    pub number: u64,
    #[source]
    pub source: GitHubError,
}

/// All pull request retarget failures of one migration.
#[derive(Debug, Default)]
pub struct RetargetFailures(pub Vec<RetargetFailure>);

impl RetargetFailures {
    /// Pull request numbers that failed, in encounter order.
    #[must_use]
    pub fn numbers(&self) -> Vec<u64> {
        self.0.iter().map(|failure| failure.number).collect()
    }
}

impl fmt::Display for RetargetFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join("; "))
    }
}

/// Errors that can end or taint a migration.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// The options were rejected before anything ran.
    #[error("Invalid migration options: {0}")]
    Validation(#[from] ValidationError),

    /// Reading/writing workflow files or running git failed.
    #[error("{step} failed in '{}': {source}", repository.display())]
    LocalGit {
        repository: PathBuf,
        identifier: Option<String>,
        step: MigrationStep,
        #[source]
        source: LocalFailure,
    },

    /// A GitHub call needed by the migration failed.
    #[error("{step} failed for {identifier} ('{}'): {source}", repository.display())]
    Platform {
        repository: PathBuf,
        identifier: String,
        step: MigrationStep,
        #[source]
        source: GitHubError,
    },

    /// Some pull requests could not be retargeted; the others were.
    #[error(
        "Failed to retarget {} pull request(s) for {identifier} ('{}'): {failures}",
        failures.0.len(),
        repository.display()
    )]
    PullRequestRetarget {
        repository: PathBuf,
        identifier: String,
        failures: RetargetFailures,
    },

    /// Cancellation was requested before the step started.
    #[error("Migration of '{}' cancelled before {step}", repository.display())]
    Cancelled {
        repository: PathBuf,
        step: MigrationStep,
    },
}

impl MigrationError {
    /// Returns the step that failed, if the error happened during one.
    #[must_use]
    pub fn step(&self) -> Option<MigrationStep> {
        match self {
            Self::Validation(_) => None,
            Self::LocalGit { step, .. }
            | Self::Platform { step, .. }
            | Self::Cancelled { step, .. } => Some(*step),
            Self::PullRequestRetarget { .. } => Some(MigrationStep::PullRequestRetargeting),
        }
    }
}

/// A migration error together with everything that was done before it.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct MigrationFailure {
    /// Partial result; steps that did not run report `false`/empty.
    pub result: Box<MigrationResult>,

    #[source]
    pub error: MigrationError,
}

impl MigrationFailure {
    pub(crate) fn new(result: MigrationResult, error: MigrationError) -> Self {
        Self {
            result: Box::new(result),
            error,
        }
    }
}
