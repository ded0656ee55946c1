//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use pr_automerge::error::{Error, Result};
use pr_automerge::platform::PlatformService;
use pr_automerge::types::{
    CheckRun, MergeMethod, MergeResult, PlatformConfig, PullRequest, Review,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Call record for `merge_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePrCall {
    pub pr_number: u64,
    pub method: MergeMethod,
}

/// Simple mock platform service for testing
///
/// Features:
/// - Configurable responses per PR / ref
/// - Queued check-run responses to simulate checks finishing between rechecks
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: PlatformConfig,
    // Responses
    pr_responses: Mutex<HashMap<u64, PullRequest>>,
    review_responses: Mutex<HashMap<u64, Vec<Review>>>,
    check_run_responses: Mutex<HashMap<String, VecDeque<Vec<CheckRun>>>>,
    merge_responses: Mutex<HashMap<u64, MergeResult>>,
    files: Mutex<HashMap<String, String>>,
    // Call tracking
    get_pr_calls: Mutex<Vec<u64>>,
    list_reviews_calls: Mutex<Vec<u64>>,
    list_check_runs_calls: Mutex<Vec<String>>,
    merge_pr_calls: Mutex<Vec<MergePrCall>>,
    get_file_calls: Mutex<Vec<String>>,
    // Error injection
    error_on_get_pr: Mutex<Option<String>>,
    error_on_list_reviews: Mutex<Option<String>>,
    error_on_list_check_runs: Mutex<Option<String>>,
    error_on_merge_pr: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            pr_responses: Mutex::new(HashMap::new()),
            review_responses: Mutex::new(HashMap::new()),
            check_run_responses: Mutex::new(HashMap::new()),
            merge_responses: Mutex::new(HashMap::new()),
            files: Mutex::new(HashMap::new()),
            get_pr_calls: Mutex::new(Vec::new()),
            list_reviews_calls: Mutex::new(Vec::new()),
            list_check_runs_calls: Mutex::new(Vec::new()),
            merge_pr_calls: Mutex::new(Vec::new()),
            get_file_calls: Mutex::new(Vec::new()),
            error_on_get_pr: Mutex::new(None),
            error_on_list_reviews: Mutex::new(None),
            error_on_list_check_runs: Mutex::new(None),
            error_on_merge_pr: Mutex::new(None),
        }
    }

    // === Error injection methods ===

    /// Make `get_pull_request` return an error
    pub fn fail_get_pr(&self, msg: &str) {
        *self.error_on_get_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `list_reviews` return an error
    pub fn fail_list_reviews(&self, msg: &str) {
        *self.error_on_list_reviews.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `list_check_runs` return an error
    pub fn fail_list_check_runs(&self, msg: &str) {
        *self.error_on_list_check_runs.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `merge_pr` return an error
    pub fn fail_merge_pr(&self, msg: &str) {
        *self.error_on_merge_pr.lock().unwrap() = Some(msg.to_string());
    }

    // === Response setup ===

    /// Set the response for `get_pull_request`
    pub fn set_pr(&self, pr: PullRequest) {
        self.pr_responses.lock().unwrap().insert(pr.id.number, pr);
    }

    /// Set the response for `list_reviews`
    pub fn set_reviews(&self, pr_number: u64, reviews: Vec<Review>) {
        self.review_responses
            .lock()
            .unwrap()
            .insert(pr_number, reviews);
    }

    /// Replace all queued `list_check_runs` responses for a ref
    pub fn set_check_runs(&self, git_ref: &str, runs: Vec<CheckRun>) {
        self.check_run_responses
            .lock()
            .unwrap()
            .insert(git_ref.to_string(), VecDeque::from([runs]));
    }

    /// Queue another `list_check_runs` response for a ref
    ///
    /// Responses are served in order; the last one repeats forever.
    pub fn push_check_runs(&self, git_ref: &str, runs: Vec<CheckRun>) {
        self.check_run_responses
            .lock()
            .unwrap()
            .entry(git_ref.to_string())
            .or_default()
            .push_back(runs);
    }

    /// Set the response for `merge_pr` (default: merged)
    pub fn set_merge_response(&self, pr_number: u64, result: MergeResult) {
        self.merge_responses
            .lock()
            .unwrap()
            .insert(pr_number, result);
    }

    /// Add a file readable via `get_file_content`
    pub fn set_file(&self, path: &str, content: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), content.to_string());
    }

    // === Call verification methods ===

    /// Get all `get_pull_request` calls
    pub fn get_pr_calls(&self) -> Vec<u64> {
        self.get_pr_calls.lock().unwrap().clone()
    }

    /// Get all `list_reviews` calls
    pub fn get_list_reviews_calls(&self) -> Vec<u64> {
        self.list_reviews_calls.lock().unwrap().clone()
    }

    /// Get all refs `list_check_runs` was called with
    pub fn get_list_check_runs_calls(&self) -> Vec<String> {
        self.list_check_runs_calls.lock().unwrap().clone()
    }

    /// Get all `merge_pr` calls
    pub fn get_merge_pr_calls(&self) -> Vec<MergePrCall> {
        self.merge_pr_calls.lock().unwrap().clone()
    }

    /// Get all `get_file_content` calls
    pub fn get_file_calls(&self) -> Vec<String> {
        self.get_file_calls.lock().unwrap().clone()
    }

    /// Assert that `merge_pr` was called with a specific method
    pub fn assert_merge_called_with_method(&self, pr_number: u64, method: MergeMethod) {
        let calls = self.get_merge_pr_calls();
        assert!(
            calls.iter().any(|c| c.pr_number == pr_number && c.method == method),
            "Expected merge_pr({pr_number}, {method:?}) but got: {calls:?}"
        );
    }

    /// Assert that `merge_pr` was NOT called for a specific PR
    pub fn assert_merge_not_called(&self, pr_number: u64) {
        let calls = self.get_merge_pr_calls();
        assert!(
            !calls.iter().any(|c| c.pr_number == pr_number),
            "Expected merge_pr({pr_number}) NOT to be called but it was: {calls:?}"
        );
    }

    /// Get count of merge_pr calls
    pub fn merge_call_count(&self) -> usize {
        self.merge_pr_calls.lock().unwrap().len()
    }
}

fn injected(slot: &Mutex<Option<String>>) -> Result<()> {
    match slot.lock().unwrap().as_ref() {
        Some(msg) => Err(Error::Platform(msg.clone())),
        None => Ok(()),
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn get_pull_request(&self, pr_number: u64) -> Result<PullRequest> {
        self.get_pr_calls.lock().unwrap().push(pr_number);
        injected(&self.error_on_get_pr)?;

        self.pr_responses
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .ok_or_else(|| Error::Platform(format!("PR #{pr_number} not found")))
    }

    async fn list_reviews(&self, pr_number: u64) -> Result<Vec<Review>> {
        self.list_reviews_calls.lock().unwrap().push(pr_number);
        injected(&self.error_on_list_reviews)?;

        Ok(self
            .review_responses
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_check_runs(&self, git_ref: &str) -> Result<Vec<CheckRun>> {
        self.list_check_runs_calls
            .lock()
            .unwrap()
            .push(git_ref.to_string());
        injected(&self.error_on_list_check_runs)?;

        let mut responses = self.check_run_responses.lock().unwrap();
        let Some(queue) = responses.get_mut(git_ref) else {
            return Ok(Vec::new());
        };
        let runs = if queue.len() > 1 {
            queue.pop_front().unwrap_or_default()
        } else {
            queue.front().cloned().unwrap_or_default()
        };
        Ok(runs)
    }

    async fn merge_pr(&self, pr_number: u64, method: MergeMethod) -> Result<MergeResult> {
        self.merge_pr_calls
            .lock()
            .unwrap()
            .push(MergePrCall { pr_number, method });
        injected(&self.error_on_merge_pr)?;

        Ok(self
            .merge_responses
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .unwrap_or_else(|| MergeResult {
                merged: true,
                sha: Some(format!("merged_sha_{pr_number}")),
                message: None,
            }))
    }

    async fn get_file_content(&self, path: &str) -> Result<Option<String>> {
        self.get_file_calls.lock().unwrap().push(path.to_string());
        Ok(self.files.lock().unwrap().get(path).cloned())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
