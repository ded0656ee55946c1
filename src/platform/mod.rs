//! Platform services
//!
//! Provides the read and merge operations the engine needs from the
//! code-hosting platform.

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::types::{CheckRun, MergeMethod, MergeResult, PlatformConfig, PullRequest, Review};
use async_trait::async_trait;

/// Platform service trait for PR operations
///
/// One instance is bound to a single repository (see [`PlatformConfig`]).
/// Implementations propagate transport failures as errors and never retry.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Fetch the current state of a PR
    async fn get_pull_request(&self, pr_number: u64) -> Result<PullRequest>;

    /// List every review ever submitted on a PR
    async fn list_reviews(&self, pr_number: u64) -> Result<Vec<Review>>;

    /// List check runs for a commit, latest run per check name
    async fn list_check_runs(&self, git_ref: &str) -> Result<Vec<CheckRun>>;

    /// Merge a PR with the specified method
    ///
    /// A refusal by the platform (not mergeable, already merged, head moved)
    /// is returned as `MergeResult { merged: false, .. }`, not as an error.
    async fn merge_pr(&self, pr_number: u64, method: MergeMethod) -> Result<MergeResult>;

    /// Read a file from the default branch, `None` if it doesn't exist
    async fn get_file_content(&self, path: &str) -> Result<Option<String>>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}

/// Create the platform service for a repository
pub fn create_platform_service(
    config: &PlatformConfig,
    token: &str,
) -> Result<Box<dyn PlatformService>> {
    let service = GitHubService::new(
        token,
        config.owner.clone(),
        config.repo.clone(),
        config.host.clone(),
    )?;
    Ok(Box::new(service))
}
