//! GitHub client error types.

use thiserror::Error;

/// Errors that can occur during GitHub operations.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    Api(#[from] octocrab::Error),

    /// The requested resource does not exist or is not visible to the token.
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// A response was missing data the operation depends on.
    #[error("Unexpected response from {resource}: {message}")]
    UnexpectedResponse { resource: String, message: String },
}

impl GitHubError {
    /// Wraps an API error, reporting a 404 as [`GitHubError::NotFound`] for `resource`.
    pub(crate) fn from_api(error: octocrab::Error, resource: impl Into<String>) -> Self {
        if is_not_found(&error) {
            Self::NotFound {
                resource: resource.into(),
            }
        } else {
            Self::Api(error)
        }
    }
}

/// Returns true if the octocrab error is an HTTP 404 from the API.
pub(crate) fn is_not_found(error: &octocrab::Error) -> bool {
    matches!(error, octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404)
}
