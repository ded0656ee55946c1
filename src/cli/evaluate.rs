//! Evaluate command - run the merge engine for one pull request

use crate::cli::context::CommandContext;
use crate::cli::print_recheck_summary;
use pr_automerge::config::AppConfig;
use pr_automerge::error::{Error, Result};
use pr_automerge::types::RepoRef;

/// Parse an `owner/repo` argument
pub fn parse_repo_arg(value: &str) -> Result<RepoRef> {
    match value.split_once('/') {
        Some((owner, repo))
            if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
        {
            Ok(RepoRef {
                owner: owner.to_string(),
                repo: repo.to_string(),
            })
        }
        _ => Err(Error::Config(format!(
            "expected repository as owner/repo, got '{value}'"
        ))),
    }
}

/// Run the evaluate command
pub async fn run_evaluate(config: AppConfig, repo: &str, number: u64) -> Result<()> {
    let repo = parse_repo_arg(repo)?;
    let ctx = CommandContext::new(config).await?;

    let summary = ctx.evaluate_all(&repo, &[number]).await?;
    print_recheck_summary(&summary);
    Ok(())
}
