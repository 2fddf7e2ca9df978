//! Validated branch names.

use bstr::BStr;
use std::fmt;
use thiserror::Error;

/// Errors produced when a string is not a usable branch name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BranchNameError {
    /// The name was empty after trimming.
    #[error("branch name is empty")]
    Empty,

    /// The name is not a valid git reference name.
    #[error("'{name}' is not a valid branch name: {reason}")]
    Invalid { name: String, reason: String },
}

/// A non-empty, trimmed branch name that git would accept as a reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    /// Parses and validates a branch name.
    ///
    /// Surrounding whitespace is removed before validation.
    ///
    /// # Errors
    ///
    /// Returns [`BranchNameError`] if the name is empty or is rejected by
    /// git's reference name rules.
    pub fn parse(raw: &str) -> Result<Self, BranchNameError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(BranchNameError::Empty);
        }

        gix_validate::reference::name_partial(BStr::new(name)).map_err(|e| {
            BranchNameError::Invalid {
                name: name.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self(name.to_string()))
    }

    /// Returns the branch name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for BranchName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for BranchName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let branch = BranchName::parse("  main \n").unwrap();
        assert_eq!(branch.as_str(), "main");
    }

    #[test]
    fn accepts_nested_names() {
        let branch = BranchName::parse("release/1.x").unwrap();
        assert_eq!(branch, "release/1.x");
    }

    #[test]
    fn rejects_empty_name() {
        assert_eq!(BranchName::parse("   "), Err(BranchNameError::Empty));
    }

    #[test]
    fn rejects_invalid_reference_names() {
        for name in ["has space", "double..dot", "ends.lock", "tilde~1"] {
            assert!(
                matches!(BranchName::parse(name), Err(BranchNameError::Invalid { .. })),
                "expected '{name}' to be rejected"
            );
        }
    }
}
