//! Git executor backed by the `git` binary.

use super::{CommandDetails, CommandOutput, GitError, GitExecutor};
use crate::cancel::Cancellation;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Runs git commands as child processes.
#[derive(Debug, Clone)]
pub struct ProcessGitExecutor {
    program: String,
}

impl Default for ProcessGitExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessGitExecutor {
    /// Creates an executor that runs `git` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: "git".to_string(),
        }
    }

    /// Creates an executor that runs the given git binary.
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(&self, details: &CommandDetails) -> Result<CommandOutput, GitError> {
        let spawn_error = |source| GitError::Spawn {
            command: details.display_command(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&details.arguments)
            .current_dir(&details.working_directory)
            .envs(details.environment.iter().map(|(k, v)| (k, v)))
            // Never block on a credential prompt.
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(if details.input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_error)?;

        // Feed stdin while stdout and stderr drain.
        let stdin = child.stdin.take();
        let write_input = async {
            if let (Some(input), Some(mut stdin)) = (&details.input, stdin) {
                stdin.write_all(input).await?;
                // Dropping stdin closes the pipe so git sees EOF.
            }
            Ok::<(), std::io::Error>(())
        };
        let (written, output) = tokio::join!(write_input, child.wait_with_output());
        let output = output.map_err(spawn_error)?;
        match written {
            // Git may exit before reading all input; the exit code reports that.
            Err(e) if e.kind() != ErrorKind::BrokenPipe => return Err(spawn_error(e)),
            _ => {}
        }

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            // Killed by a signal.
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}

#[async_trait]
impl GitExecutor for ProcessGitExecutor {
    async fn execute_git(
        &self,
        cancellation: &Cancellation,
        details: &CommandDetails,
    ) -> Result<CommandOutput, GitError> {
        let cancelled = || GitError::Cancelled {
            command: details.display_command(),
        };

        if cancellation.is_cancelled() {
            return Err(cancelled());
        }

        debug!(
            command = %details.display_command(),
            cwd = %details.working_directory.display(),
            "Running git"
        );

        tokio::select! {
            output = self.run(details) => output,
            () = cancellation.cancelled() => Err(cancelled()),
        }
    }
}
