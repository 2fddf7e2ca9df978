//! Hosted repository identifiers.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when an "owner/name" string cannot be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("'{0}' is not an owner/name repository identifier")]
pub struct RepositoryIdError(pub String);

/// A GitHub repository in "owner/name" form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepositoryId {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub name: String,
}

impl RepositoryId {
    /// Creates an identifier from its parts.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Returns the "owner/name" form.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepositoryId {
    type Err = RepositoryIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (owner, name) = trimmed
            .split_once('/')
            .ok_or_else(|| RepositoryIdError(s.to_string()))?;

        let valid = |part: &str| !part.is_empty() && !part.contains(['/', ' ']);
        if !valid(owner) || !valid(name) {
            return Err(RepositoryIdError(s.to_string()));
        }

        Ok(Self::new(owner, name))
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
