#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod branch;
pub mod cancel;
pub mod config;
pub mod git;
pub mod github;
pub mod migration;
pub mod options;
pub mod rate_limit;
pub mod repository;
pub mod runner;
pub mod safety;
pub mod summary;
pub mod workflows;

pub use branch::{BranchName, BranchNameError};
pub use cancel::Cancellation;
pub use config::{BatchConfig, ConfigError, RepositoryEntry};
pub use git::{
    parse_remote_url, CommandDetails, CommandOutput, GitError, GitExecutor, ProcessGitExecutor,
};
pub use github::{
    GitHubError, GitHubOperations, OctocrabClient, PagesBuildType, PagesConfiguration,
    PagesStatus, PullRequest, PullRequestQuery, PullRequestState,
};
pub use migration::{
    MigrationError, MigrationFailure, MigrationResult, MigrationStep, Migrator, COMMIT_MESSAGE,
};
pub use options::{MigrationOptions, ValidationError};
pub use rate_limit::{check_core_rate_limit, ensure_core_rate_limit, RateLimitInfo};
pub use repository::RepositoryId;
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use safety::{SafetyEvaluator, SafetyStatus, OPEN_PULL_REQUESTS_REASON};
pub use summary::{ProcessingResult, RunSummary};
pub use workflows::{
    rewrite_content, rewrite_workflows, RewriteError, WorkflowError, WorkflowOutcome,
};
