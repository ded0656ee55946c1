//! Diagnostic output for evaluations
//!
//! The engine writes its per-PR lines (reviewer summary, check summary,
//! decision) through an injected [`EvaluationReporter`] instead of a global
//! logger.

use crate::types::PrRef;
use async_trait::async_trait;
use tracing::info;

/// Sink for line-oriented evaluation diagnostics
#[async_trait]
pub trait EvaluationReporter: Send + Sync {
    /// Report one line about a PR
    async fn on_message(&self, pr: &PrRef, message: &str);
}

/// Reporter that emits each line as a `tracing` event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

#[async_trait]
impl EvaluationReporter for TracingReporter {
    async fn on_message(&self, pr: &PrRef, message: &str) {
        info!(
            owner = %pr.owner,
            repo = %pr.repo,
            number = pr.number,
            "{message}"
        );
    }
}

/// Reporter that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

#[async_trait]
impl EvaluationReporter for NoopReporter {
    async fn on_message(&self, _pr: &PrRef, _message: &str) {}
}
