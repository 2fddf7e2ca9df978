//! Git command inputs and outputs.

use super::GitError;
use std::path::{Path, PathBuf};

/// Everything needed to run a single git command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDetails {
    /// Arguments passed after `git`.
    pub arguments: Vec<String>,

    /// Directory the command runs in.
    pub working_directory: PathBuf,

    /// Extra environment variables for the process.
    pub environment: Vec<(String, String)>,

    /// Bytes written to the process's stdin, if any.
    pub input: Option<Vec<u8>>,
}

impl CommandDetails {
    /// Creates details for `git <arguments>` run in `working_directory`.
    pub fn new<I, S>(working_directory: &Path, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            arguments: arguments.into_iter().map(Into::into).collect(),
            working_directory: working_directory.to_path_buf(),
            environment: Vec::new(),
            input: None,
        }
    }

    /// Adds an environment override.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.push((key.into(), value.into()));
        self
    }

    /// Sets the bytes written to stdin.
    #[must_use]
    pub fn with_input(mut self, input: impl Into<Vec<u8>>) -> Self {
        self.input = Some(input.into());
        self
    }

    /// Returns the arguments joined by spaces, for logs and errors.
    #[must_use]
    pub fn display_command(&self) -> String {
        self.arguments.join(" ")
    }
}

/// Captured result of a git process that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    /// Returns true if the process exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Converts a non-zero exit into [`GitError::NonZeroExit`].
    ///
    /// # Errors
    ///
    /// Returns [`GitError::NonZeroExit`] if the exit code is not zero.
    pub fn into_success(self, details: &CommandDetails) -> Result<Self, GitError> {
        if self.success() {
            Ok(self)
        } else {
            Err(GitError::NonZeroExit {
                command: details.display_command(),
                exit_code: self.exit_code,
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_details() {
        let details = CommandDetails::new(Path::new("/repo"), ["commit", "-m", "msg"])
            .with_env("GIT_TERMINAL_PROMPT", "0")
            .with_input("data");

        assert_eq!(details.display_command(), "commit -m msg");
        assert_eq!(details.working_directory, PathBuf::from("/repo"));
        assert_eq!(
            details.environment,
            vec![("GIT_TERMINAL_PROMPT".to_string(), "0".to_string())]
        );
        assert_eq!(details.input.as_deref(), Some(b"data".as_slice()));
    }

    #[test]
    fn non_zero_exit_becomes_error() {
        let details = CommandDetails::new(Path::new("/repo"), ["push", "origin", "master"]);
        let output = CommandOutput {
            stdout: String::new(),
            stderr: "rejected\n".to_string(),
            exit_code: 1,
        };

        match output.into_success(&details) {
            Err(GitError::NonZeroExit {
                command,
                exit_code,
                stderr,
            }) => {
                assert_eq!(command, "push origin master");
                assert_eq!(exit_code, 1);
                assert_eq!(stderr, "rejected");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
