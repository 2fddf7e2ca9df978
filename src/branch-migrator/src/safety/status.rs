//! Branch deletion safety verdict.

use serde::Serialize;

/// Reason reported while open pull requests still target the source branch.
pub const OPEN_PULL_REQUESTS_REASON: &str = "open pull requests still target source branch";

/// Reason reported while the source branch has branch protection.
pub const PROTECTED_BRANCH_REASON: &str = "source branch is protected";

/// Reason reported while the source branch is still the repository default.
pub const DEFAULT_BRANCH_REASON: &str = "source branch is still the default branch";

/// Whether the superseded branch can be deleted, and if not, why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafetyStatus {
    /// True only if no blocking reason was found.
    pub safe_to_delete: bool,

    /// Deduplicated reasons, in the order the checks ran.
    pub blocking_reasons: Vec<String>,

    /// Open pull requests still based on the branch.
    pub open_pull_requests: Vec<u64>,
}

impl Default for SafetyStatus {
    fn default() -> Self {
        Self::safe()
    }
}

impl SafetyStatus {
    /// A status without blocking reasons.
    #[must_use]
    pub fn safe() -> Self {
        Self {
            safe_to_delete: true,
            blocking_reasons: Vec::new(),
            open_pull_requests: Vec::new(),
        }
    }

    /// The status of a migration that stopped before evaluating safety.
    #[must_use]
    pub fn not_evaluated() -> Self {
        let mut status = Self::safe();
        status.block("safety evaluation did not run");
        status
    }

    /// Adds a blocking reason unless it is already present.
    pub fn block(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        if !self.blocking_reasons.contains(&reason) {
            self.blocking_reasons.push(reason);
        }
        self.safe_to_delete = false;
    }
}
