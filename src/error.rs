//! Error types for pr-automerge

use thiserror::Error;

/// Errors surfaced by the merge engine and its collaborators
///
/// Blocked and pending merge decisions are not errors; they are returned as
/// values. Anything here aborts the current evaluation cycle.
#[derive(Debug, Error)]
pub enum Error {
    /// GitHub API call failed
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Generic platform failure (used by alternative `PlatformService` impls)
    #[error("platform error: {0}")]
    Platform(String),

    /// No usable credentials
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Configuration could not be read or is invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// Webhook payload could not be interpreted
    #[error("invalid event: {0}")]
    Event(String),

    /// Unexpected internal failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        Self::GitHubApi(err.to_string())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
