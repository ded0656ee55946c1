//! CLI commands

pub mod context;
pub mod evaluate;
pub mod event;
pub mod style;

pub use evaluate::run_evaluate;
pub use event::run_event;

use anstream::println;
use pr_automerge::merge::{EvaluationOutcome, RecheckSummary};
use pr_automerge::types::PrRef;
use style::Stylize;

/// Print the outcome of an event-triggered evaluation
pub fn print_outcome(pr: &PrRef, outcome: &EvaluationOutcome) {
    let line = outcome.to_string();
    let styled = match outcome {
        EvaluationOutcome::Merged(_) => line.success(),
        EvaluationOutcome::RecheckScheduled { .. } => line.muted(),
        EvaluationOutcome::Blocked(_)
        | EvaluationOutcome::MergeRejected(_)
        | EvaluationOutcome::RecheckLimitReached { .. } => line.warn(),
    };
    println!("{} {styled}", pr.accent());
}

/// Print what the recheck worker did, if anything
pub fn print_recheck_summary(summary: &RecheckSummary) {
    if summary.completed == 0 && summary.failed == 0 {
        return;
    }
    let line = format!(
        "Rechecks: {} completed, {} failed",
        summary.completed, summary.failed
    );
    if summary.failed > 0 {
        println!("{}", line.warn());
    } else {
        println!("{}", line.muted());
    }
}
