//! Merge engine - one fetch, decide, act cycle per PR
//!
//! Every cycle re-reads the PR, its reviews, and its check runs from the
//! platform. Nothing is cached between cycles.

use crate::checks::{aggregate_checks, describe_check};
use crate::config::{MergePolicy, RecheckConfig};
use crate::error::{Error, Result};
use crate::merge::policy::{BlockReason, MergeDecision, evaluate_policy};
use crate::merge::recheck::{RecheckScheduler, RecheckTask};
use crate::platform::PlatformService;
use crate::report::EvaluationReporter;
use crate::review::aggregate_reviews;
use crate::types::{MergeMethod, MergeResult, PrRef};
use std::sync::Arc;
use std::time::Duration;

/// What an evaluation cycle did
#[derive(Debug, Clone)]
pub enum EvaluationOutcome {
    /// The PR was merged
    Merged(MergeResult),
    /// The platform refused the merge (e.g. merged concurrently)
    MergeRejected(Option<String>),
    /// Policy blocks the merge
    Blocked(BlockReason),
    /// Checks are running; a recheck was queued
    RecheckScheduled {
        /// Attempt number of the queued recheck
        attempt: u32,
        /// Delay before it runs
        delay: Duration,
    },
    /// Checks are still running but no rechecks are left
    RecheckLimitReached {
        /// Rechecks already performed
        attempts: u32,
    },
}

impl EvaluationOutcome {
    /// Whether this cycle merged the PR
    pub const fn is_merged(&self) -> bool {
        matches!(self, Self::Merged(_))
    }
}

impl std::fmt::Display for EvaluationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Merged(result) => {
                let sha = result.sha.as_deref().unwrap_or("(no sha)");
                write!(f, "merged: {sha}")
            }
            Self::MergeRejected(message) => {
                write!(f, "merge refused")?;
                if let Some(message) = message {
                    write!(f, ": {message}")?;
                }
                Ok(())
            }
            Self::Blocked(reason) => write!(f, "blocked: {reason}"),
            Self::RecheckScheduled { attempt, delay } => write!(
                f,
                "checks pending, recheck #{attempt} in {}s",
                delay.as_secs()
            ),
            Self::RecheckLimitReached { attempts } => {
                write!(f, "checks still pending after {attempts} rechecks, giving up")
            }
        }
    }
}

/// Orchestrates evaluation cycles for the PRs of one repository
pub struct MergeEngine {
    platform: Arc<dyn PlatformService>,
    policy: MergePolicy,
    recheck: RecheckConfig,
    reporter: Arc<dyn EvaluationReporter>,
    scheduler: Arc<dyn RecheckScheduler>,
}

impl MergeEngine {
    /// Create an engine
    ///
    /// `platform` decides the repository; `policy` is that repository's
    /// merge policy as loaded for the current event.
    pub fn new(
        platform: Arc<dyn PlatformService>,
        policy: MergePolicy,
        recheck: RecheckConfig,
        reporter: Arc<dyn EvaluationReporter>,
        scheduler: Arc<dyn RecheckScheduler>,
    ) -> Self {
        Self {
            platform,
            policy,
            recheck,
            reporter,
            scheduler,
        }
    }

    async fn report(&self, pr_ref: &PrRef, message: &str) {
        self.reporter.on_message(pr_ref, message).await;
    }

    /// The policy this engine applies
    pub const fn policy(&self) -> &MergePolicy {
        &self.policy
    }

    /// Identity of PR `number` in this engine's repository
    pub fn pr_ref(&self, number: u64) -> PrRef {
        let config = self.platform.config();
        PrRef::new(config.owner.clone(), config.repo.clone(), number)
    }

    /// Run an event-triggered evaluation cycle
    pub async fn evaluate(&self, number: u64) -> Result<EvaluationOutcome> {
        self.evaluate_pr(&self.pr_ref(number), 0).await
    }

    /// Run one evaluation cycle
    ///
    /// `attempt` is 0 for event-triggered cycles and counts up for rechecks.
    /// Platform errors propagate; blocked and pending are normal outcomes.
    pub async fn evaluate_pr(&self, pr_ref: &PrRef, attempt: u32) -> Result<EvaluationOutcome> {
        let config = self.platform.config();
        if pr_ref.owner != config.owner || pr_ref.repo != config.repo {
            return Err(Error::Internal(format!(
                "{pr_ref} does not belong to {}/{}",
                config.owner, config.repo
            )));
        }

        if attempt > 0 {
            self.report(pr_ref, &format!("recheck #{attempt} of {pr_ref}")).await;
        }

        // Gather
        let (pr, reviews) = tokio::try_join!(
            self.platform.get_pull_request(pr_ref.number),
            self.platform.list_reviews(pr_ref.number),
        )?;
        let check_runs = self.platform.list_check_runs(&pr.head_sha).await?;

        let mergeable = pr
            .mergeable
            .map_or_else(|| "unknown".to_string(), |m| m.to_string());
        let line = format!(
            "{pr_ref}: state={} merged={} mergeable={mergeable} head={}",
            pr.state, pr.merged, pr.head_sha
        );
        self.report(pr_ref, &line).await;

        // Decide
        let latest = aggregate_reviews(&reviews);
        self.report(pr_ref, &format!("reviews: {}", latest.summary())).await;

        let checks = aggregate_checks(&check_runs);
        if check_runs.is_empty() {
            self.report(pr_ref, "checks: none").await;
        }
        for run in &check_runs {
            self.report(pr_ref, &format!("check {}", describe_check(run))).await;
        }

        let decision = evaluate_policy(&pr, &latest, &self.policy, &checks, self.recheck.delay());

        // Act
        let outcome = match decision {
            MergeDecision::Merge => {
                self.report(pr_ref, "all conditions met, merging").await;
                let result = self
                    .platform
                    .merge_pr(pr_ref.number, MergeMethod::Merge)
                    .await?;
                if result.merged {
                    EvaluationOutcome::Merged(result)
                } else {
                    EvaluationOutcome::MergeRejected(result.message)
                }
            }
            MergeDecision::Blocked(reason) => EvaluationOutcome::Blocked(reason),
            MergeDecision::Pending(delay) => {
                if attempt < self.recheck.max_attempts {
                    let next = attempt + 1;
                    self.scheduler.schedule(RecheckTask {
                        pr: pr_ref.clone(),
                        attempt: next,
                        delay,
                    })?;
                    EvaluationOutcome::RecheckScheduled {
                        attempt: next,
                        delay,
                    }
                } else {
                    EvaluationOutcome::RecheckLimitReached { attempts: attempt }
                }
            }
        };

        self.report(pr_ref, &outcome.to_string()).await;
        Ok(outcome)
    }
}
