//! Check run aggregation

use crate::types::{CheckConclusion, CheckRun, CheckStatus};
use std::collections::BTreeSet;

/// Aggregated state of a commit's check runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSummary {
    /// Every run has finished (vacuously true with no runs)
    pub all_completed: bool,
    /// Distinct conclusions among completed runs
    pub conclusions: BTreeSet<CheckConclusion>,
}

impl CheckSummary {
    /// Conclusions that prevent a merge, in stable order
    pub fn blocking(&self) -> Vec<CheckConclusion> {
        self.conclusions
            .iter()
            .copied()
            .filter(|c| c.is_blocking())
            .collect()
    }
}

/// Reduce check runs to completion state and conclusions
///
/// The platform already filters to the latest run per check name.
/// No runs means nothing is configured, so nothing blocks.
pub fn aggregate_checks(runs: &[CheckRun]) -> CheckSummary {
    let all_completed = runs.iter().all(|r| r.status == CheckStatus::Completed);
    let conclusions = runs
        .iter()
        .filter(|r| r.status == CheckStatus::Completed)
        .filter_map(|r| r.conclusion)
        .collect();

    CheckSummary {
        all_completed,
        conclusions,
    }
}

/// One line per check, e.g. `ci: completed (success)`
pub fn describe_check(run: &CheckRun) -> String {
    match run.conclusion {
        Some(conclusion) if run.status == CheckStatus::Completed => {
            format!("{}: {} ({conclusion})", run.name, run.status)
        }
        _ => format!("{}: {}", run.name, run.status),
    }
}
