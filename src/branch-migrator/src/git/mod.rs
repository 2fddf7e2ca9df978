//! Git command execution.
//!
//! The orchestrator never spawns processes itself; it goes through the
//! [`GitExecutor`] trait so tests can substitute a recording double.

mod command;
mod error;
mod process;
mod remote;

pub use command::{CommandDetails, CommandOutput};
pub use error::GitError;
pub use process::ProcessGitExecutor;
pub use remote::parse_remote_url;

use crate::cancel::Cancellation;
use async_trait::async_trait;

/// Runs git commands.
///
/// A non-zero exit status is returned as a successful [`CommandOutput`];
/// only failures to run the process at all (or cancellation) are errors.
#[async_trait]
pub trait GitExecutor: Send + Sync {
    async fn execute_git(
        &self,
        cancellation: &Cancellation,
        details: &CommandDetails,
    ) -> Result<CommandOutput, GitError>;
}
