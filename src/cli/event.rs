//! Event command - route a webhook delivery to the merge engine

use crate::cli::context::CommandContext;
use crate::cli::print_recheck_summary;
use crate::cli::style::Stylize;
use anstream::println;
use pr_automerge::config::AppConfig;
use pr_automerge::error::{Error, Result};
use pr_automerge::events::WebhookEvent;
use pr_automerge::types::RepoRef;
use std::io::Read;
use std::path::Path;

/// Read the payload from a file, or stdin when no path is given
fn read_payload(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| Error::Event(format!("failed to read {}: {e}", path.display()))),
        None => {
            let mut payload = String::new();
            std::io::stdin()
                .read_to_string(&mut payload)
                .map_err(|e| Error::Event(format!("failed to read stdin: {e}")))?;
            Ok(payload)
        }
    }
}

/// Run the event command
pub async fn run_event(config: AppConfig, name: &str, payload: Option<&Path>) -> Result<()> {
    let payload = read_payload(payload)?;
    let event = WebhookEvent::parse(name, &payload)?;
    let targets = event.target_pull_requests();

    let Some(repo) = event.repository().filter(|_| !targets.is_empty()) else {
        println!("{}", format!("Nothing to evaluate for '{name}' event.").muted());
        return Ok(());
    };
    let repo: RepoRef = repo.clone();

    let ctx = CommandContext::new(config).await?;
    let numbers: Vec<u64> = targets.iter().map(|pr| pr.number).collect();
    let summary = ctx.evaluate_all(&repo, &numbers).await?;
    print_recheck_summary(&summary);
    Ok(())
}
