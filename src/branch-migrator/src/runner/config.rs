//! Runner configuration.

use std::path::{Path, PathBuf};

/// Configuration for a batch run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Path to the batch TOML file.
    config_path: PathBuf,
    /// GitHub token used for API calls.
    token: String,
    /// Overrides the batch file's `push` setting when set.
    push_override: Option<bool>,
    /// Whether to only evaluate branch deletion safety.
    check_only: bool,
    /// Whether to log git commands and their output.
    debug_logging: bool,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(config_path: PathBuf, token: String) -> Self {
        Self {
            config_path,
            token,
            push_override: None,
            check_only: false,
            debug_logging: false,
        }
    }

    /// Forces pushing on or off regardless of the batch file.
    #[must_use]
    pub fn with_push_override(mut self, push: Option<bool>) -> Self {
        self.push_override = push;
        self
    }

    /// Only evaluates safety instead of migrating.
    #[must_use]
    pub fn with_check_only(mut self, check_only: bool) -> Self {
        self.check_only = check_only;
        self
    }

    /// Enables logging of git commands and their output.
    #[must_use]
    pub fn with_debug_logging(mut self, debug_logging: bool) -> Self {
        self.debug_logging = debug_logging;
        self
    }

    /// Returns the batch file path.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the push override, if any.
    pub fn push_override(&self) -> Option<bool> {
        self.push_override
    }

    /// Returns whether only safety checks run.
    pub fn check_only(&self) -> bool {
        self.check_only
    }

    /// Returns whether git commands are logged.
    pub fn debug_logging(&self) -> bool {
        self.debug_logging
    }
}
