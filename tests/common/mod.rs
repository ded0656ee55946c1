//! Shared test fixtures

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::{MergePrCall, MockPlatformService};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use pr_automerge::config::{MergePolicy, RecheckConfig};
use pr_automerge::error::Result;
use pr_automerge::merge::{MergeEngine, RecheckScheduler, RecheckTask};
use pr_automerge::report::EvaluationReporter;
use pr_automerge::types::{
    CheckConclusion, CheckRun, CheckStatus, PlatformConfig, PrRef, PrState, PullRequest, RepoRef,
    Review, ReviewState,
};
use std::sync::{Arc, Mutex};

/// Head SHA used by `make_pr`
pub const HEAD_SHA: &str = "abc123";

/// Platform config for `test/repo` on github.com
pub fn github_config() -> PlatformConfig {
    PlatformConfig {
        owner: "test".to_string(),
        repo: "repo".to_string(),
        host: None,
    }
}

/// Open, unmerged, mergeable PR in `test/repo`
pub fn make_pr(number: u64) -> PullRequest {
    PullRequest {
        id: PrRef::new("test", "repo", number),
        head_sha: HEAD_SHA.to_string(),
        base: RepoRef {
            owner: "test".to_string(),
            repo: "repo".to_string(),
        },
        base_ref: "main".to_string(),
        state: PrState::Open,
        merged: false,
        mergeable: Some(true),
    }
}

/// Timestamp `minutes` after a fixed epoch
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + chrono::Duration::minutes(minutes)
}

/// Submitted review
pub fn review(author: &str, state: ReviewState, minutes: i64) -> Review {
    Review {
        author: author.to_string(),
        state,
        submitted_at: Some(at(minutes)),
    }
}

/// Completed check run
pub fn completed(name: &str, conclusion: CheckConclusion) -> CheckRun {
    CheckRun {
        name: name.to_string(),
        status: CheckStatus::Completed,
        conclusion: Some(conclusion),
    }
}

/// Check run still running
pub fn running(name: &str) -> CheckRun {
    CheckRun {
        name: name.to_string(),
        status: CheckStatus::InProgress,
        conclusion: None,
    }
}

/// Scheduler that records tasks instead of running them
#[derive(Default)]
pub struct RecordingScheduler {
    tasks: Mutex<Vec<RecheckTask>>,
}

impl RecordingScheduler {
    pub fn tasks(&self) -> Vec<RecheckTask> {
        self.tasks.lock().unwrap().clone()
    }
}

impl RecheckScheduler for RecordingScheduler {
    fn schedule(&self, task: RecheckTask) -> Result<()> {
        self.tasks.lock().unwrap().push(task);
        Ok(())
    }
}

/// Reporter that keeps every line
#[derive(Default)]
pub struct RecordingReporter {
    lines: Mutex<Vec<(PrRef, String)>>,
}

impl RecordingReporter {
    pub fn messages(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .map(|(_, line)| line.clone())
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|line| line.contains(needle))
    }
}

#[async_trait]
impl EvaluationReporter for RecordingReporter {
    async fn on_message(&self, pr: &PrRef, message: &str) {
        self.lines
            .lock()
            .unwrap()
            .push((pr.clone(), message.to_string()));
    }
}

/// Engine wired to a mock, recording scheduler, and recording reporter
pub struct TestEngine {
    pub engine: MergeEngine,
    pub platform: Arc<MockPlatformService>,
    pub scheduler: Arc<RecordingScheduler>,
    pub reporter: Arc<RecordingReporter>,
}

pub fn test_engine(policy: MergePolicy, recheck: RecheckConfig) -> TestEngine {
    let platform = Arc::new(MockPlatformService::with_config(github_config()));
    let scheduler = Arc::new(RecordingScheduler::default());
    let reporter = Arc::new(RecordingReporter::default());
    let engine = MergeEngine::new(
        platform.clone(),
        policy,
        recheck,
        reporter.clone(),
        scheduler.clone(),
    );
    TestEngine {
        engine,
        platform,
        scheduler,
        reporter,
    }
}
