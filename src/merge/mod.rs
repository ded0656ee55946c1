//! Merge decision engine
//!
//! Three-phase pattern:
//! 1. Gather - fetch PR, reviews, and check runs (effectful)
//! 2. Decide - aggregate and apply the merge policy (pure, testable)
//! 3. Act - merge, stop, or schedule a recheck (effectful)

mod engine;
mod policy;
mod recheck;

pub use engine::{EvaluationOutcome, MergeEngine};
pub use policy::{BlockReason, MergeDecision, evaluate_policy};
pub use recheck::{
    RecheckQueue, RecheckScheduler, RecheckSummary, RecheckTask, RecheckWorker, recheck_queue,
};
