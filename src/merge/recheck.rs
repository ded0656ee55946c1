//! Delayed re-evaluation of PRs whose checks are still running
//!
//! The engine submits a [`RecheckTask`] carrying only the PR identity; the
//! worker waits out the delay and runs a complete cycle again, so the
//! recheck always sees fresh platform state.

use crate::error::{Error, Result};
use crate::merge::engine::MergeEngine;
use crate::types::PrRef;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

/// A queued re-evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecheckTask {
    /// PR to evaluate again
    pub pr: PrRef,
    /// 1 for the first recheck, counting up
    pub attempt: u32,
    /// How long to wait before evaluating
    pub delay: Duration,
}

/// Accepts recheck tasks for later execution
///
/// Submitting is fire-and-forget: the caller's cycle finishes immediately.
pub trait RecheckScheduler: Send + Sync {
    /// Queue a recheck
    fn schedule(&self, task: RecheckTask) -> Result<()>;
}

/// Sending half of the recheck queue
#[derive(Debug, Clone)]
pub struct RecheckQueue {
    tx: mpsc::UnboundedSender<RecheckTask>,
}

impl RecheckScheduler for RecheckQueue {
    fn schedule(&self, task: RecheckTask) -> Result<()> {
        debug!(pr = %task.pr, attempt = task.attempt, delay = ?task.delay, "queueing recheck");
        self.tx
            .send(task)
            .map_err(|e| Error::Internal(format!("recheck queue closed, dropped {}", e.0.pr)))
    }
}

/// Receiving half of the recheck queue
#[derive(Debug)]
pub struct RecheckWorker {
    rx: mpsc::UnboundedReceiver<RecheckTask>,
}

/// Counts from a drained recheck queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecheckSummary {
    /// Rechecks that ran to an outcome
    pub completed: usize,
    /// Rechecks that ended in an error
    pub failed: usize,
}

/// Create a connected queue and worker
pub fn recheck_queue() -> (RecheckQueue, RecheckWorker) {
    let (tx, rx) = mpsc::unbounded_channel();
    (RecheckQueue { tx }, RecheckWorker { rx })
}

impl RecheckWorker {
    /// Run queued rechecks until none are queued or in flight
    ///
    /// Each task sleeps for its delay in its own tokio task, so rechecks for
    /// different PRs overlap. A recheck may queue the next one; the worker
    /// keeps going until that chain ends. Errors are logged and counted but
    /// don't stop other rechecks.
    pub async fn run_until_idle(mut self, engine: Arc<MergeEngine>) -> RecheckSummary {
        let mut summary = RecheckSummary::default();
        let mut in_flight = JoinSet::new();

        loop {
            while let Ok(task) = self.rx.try_recv() {
                let engine = Arc::clone(&engine);
                in_flight.spawn(async move {
                    tokio::time::sleep(task.delay).await;
                    let result = engine.evaluate_pr(&task.pr, task.attempt).await;
                    (task, result)
                });
            }

            let Some(joined) = in_flight.join_next().await else {
                break;
            };

            match joined {
                Ok((task, Ok(outcome))) => {
                    info!(pr = %task.pr, attempt = task.attempt, %outcome, "recheck finished");
                    summary.completed += 1;
                }
                Ok((task, Err(e))) => {
                    error!(pr = %task.pr, attempt = task.attempt, error = %e, "recheck failed");
                    summary.failed += 1;
                }
                Err(e) => {
                    error!(error = %e, "recheck task panicked");
                    summary.failed += 1;
                }
            }
        }

        debug!(
            completed = summary.completed,
            failed = summary.failed,
            "recheck queue idle"
        );
        summary
    }
}
