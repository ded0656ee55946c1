//! Shared command context for CLI commands
//!
//! Extracts common setup code shared by evaluate and event.

use crate::cli::print_outcome;
use pr_automerge::auth::get_github_auth;
use pr_automerge::config::{AppConfig, load_repo_policy};
use pr_automerge::error::{Error, Result};
use pr_automerge::merge::{MergeEngine, RecheckSummary, recheck_queue};
use pr_automerge::platform::{PlatformService, create_platform_service};
use pr_automerge::report::TracingReporter;
use pr_automerge::types::{PlatformConfig, RepoRef};
use std::sync::Arc;
use tracing::{debug, error};

/// Shared context for CLI commands that interact with the platform
///
/// Holds the application config and the GitHub token. Engines are built per
/// repository because the merge policy is read from each repository.
pub struct CommandContext {
    /// Application configuration
    pub config: AppConfig,
    /// GitHub API token
    token: String,
}

impl CommandContext {
    /// Create a new command context, resolving credentials
    pub async fn new(config: AppConfig) -> Result<Self> {
        let auth = get_github_auth(config.host.as_deref()).await?;
        debug!(
            source = %auth.source,
            host = auth.host.as_deref().unwrap_or("github.com"),
            "resolved GitHub token"
        );
        Ok(Self {
            config,
            token: auth.token,
        })
    }

    /// Build a platform service for a repository
    pub fn platform(&self, repo: &RepoRef) -> Result<Arc<dyn PlatformService>> {
        let platform_config = PlatformConfig {
            owner: repo.owner.clone(),
            repo: repo.repo.clone(),
            host: self.config.host.clone(),
        };
        Ok(Arc::from(create_platform_service(&platform_config, &self.token)?))
    }

    /// Evaluate PRs of one repository, then drive their rechecks to the end
    ///
    /// The merge policy is loaded once for this batch. Every PR is evaluated
    /// even if an earlier one fails; the first error is returned afterwards.
    pub async fn evaluate_all(&self, repo: &RepoRef, numbers: &[u64]) -> Result<RecheckSummary> {
        let platform = self.platform(repo)?;
        let policy = load_repo_policy(platform.as_ref(), &self.config.policy_path).await?;

        let (queue, worker) = recheck_queue();
        let engine = Arc::new(MergeEngine::new(
            platform,
            policy,
            self.config.recheck,
            Arc::new(TracingReporter),
            Arc::new(queue),
        ));
        debug!(
            owner = %repo.owner,
            repo = %repo.repo,
            policy = ?engine.policy(),
            "merge policy for batch"
        );

        let mut first_error: Option<Error> = None;
        for &number in numbers {
            let pr = engine.pr_ref(number);
            match engine.evaluate(number).await {
                Ok(outcome) => print_outcome(&pr, &outcome),
                Err(e) => {
                    error!(%pr, error = %e, "evaluation failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        let summary = worker.run_until_idle(engine).await;

        match first_error {
            Some(e) => Err(e),
            None => Ok(summary),
        }
    }
}
