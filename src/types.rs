//! Core types for pr-automerge

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a pull request: repository coordinates plus number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrRef {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// PR number
    pub number: u64,
}

impl PrRef {
    /// Create a new PR reference
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }
}

impl std::fmt::Display for PrRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// Repository coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
}

/// Platform configuration for one repository
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}

/// PR state as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrState {
    /// PR is open
    Open,
    /// PR is closed (merged or not)
    Closed,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Snapshot of a pull request, fetched fresh for every evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// Owner/repo/number identity
    pub id: PrRef,
    /// SHA of the head commit (check runs are looked up against it)
    pub head_sha: String,
    /// Repository the PR targets
    pub base: RepoRef,
    /// Base branch name
    pub base_ref: String,
    /// Open or closed
    pub state: PrState,
    /// Whether the PR has already been merged
    pub merged: bool,
    /// Whether PR can be merged (no conflicts)
    /// - `Some(true)` = mergeable
    /// - `Some(false)` = has conflicts
    /// - `None` = unknown (GitHub still computing)
    pub mergeable: Option<bool>,
}

/// Review verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    /// Reviewer approved the changes
    Approved,
    /// Reviewer asked for changes
    ChangesRequested,
    /// Comment without a verdict
    Commented,
    /// Earlier review was dismissed
    Dismissed,
    /// Review started but not submitted
    Pending,
}

impl std::fmt::Display for ReviewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approved => write!(f, "APPROVED"),
            Self::ChangesRequested => write!(f, "CHANGES_REQUESTED"),
            Self::Commented => write!(f, "COMMENTED"),
            Self::Dismissed => write!(f, "DISMISSED"),
            Self::Pending => write!(f, "PENDING"),
        }
    }
}

/// A single submitted review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Login of the reviewer
    pub author: String,
    /// Verdict
    pub state: ReviewState,
    /// Submission time (pending reviews have none)
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Lifecycle status of a check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Waiting to start
    Queued,
    /// Running
    InProgress,
    /// Finished, conclusion available
    Completed,
}

impl CheckStatus {
    /// Parse a GitHub status string.
    ///
    /// GitHub also reports `waiting`, `requested`, and `pending`; none of them
    /// are finished, so they collapse to `Queued`.
    pub fn from_api(status: &str) -> Self {
        match status {
            "completed" => Self::Completed,
            "in_progress" => Self::InProgress,
            _ => Self::Queued,
        }
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Terminal outcome of a completed check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    /// Passed
    Success,
    /// Failed
    Failure,
    /// Neither pass nor fail
    Neutral,
    /// Cancelled before finishing
    Cancelled,
    /// Exceeded its time limit
    TimedOut,
    /// Needs a manual action
    ActionRequired,
    /// Not run
    Skipped,
    /// Superseded by a newer run
    Stale,
}

impl CheckConclusion {
    /// Parse a GitHub conclusion string, `None` for values we don't know
    pub fn from_api(conclusion: &str) -> Option<Self> {
        match conclusion {
            "success" => Some(Self::Success),
            "failure" => Some(Self::Failure),
            "neutral" => Some(Self::Neutral),
            "cancelled" => Some(Self::Cancelled),
            "timed_out" => Some(Self::TimedOut),
            "action_required" => Some(Self::ActionRequired),
            "skipped" => Some(Self::Skipped),
            "stale" => Some(Self::Stale),
            _ => None,
        }
    }

    /// Whether this conclusion prevents a merge
    pub const fn is_blocking(self) -> bool {
        matches!(
            self,
            Self::Failure | Self::Cancelled | Self::TimedOut | Self::ActionRequired
        )
    }
}

impl std::fmt::Display for CheckConclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
            Self::Neutral => write!(f, "neutral"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::TimedOut => write!(f, "timed_out"),
            Self::ActionRequired => write!(f, "action_required"),
            Self::Skipped => write!(f, "skipped"),
            Self::Stale => write!(f, "stale"),
        }
    }
}

/// A named check on a commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRun {
    /// Check name, e.g. "ci"
    pub name: String,
    /// Lifecycle status
    pub status: CheckStatus,
    /// Populated once `status` is `Completed`
    pub conclusion: Option<CheckConclusion>,
}

/// Result of a merge operation
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// Whether the merge was successful
    pub merged: bool,
    /// The SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Message from the merge operation (especially on failure)
    pub message: Option<String>,
}

/// Merge strategy/method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMethod {
    /// Squash all commits into one
    Squash,
    /// Create a merge commit
    Merge,
    /// Rebase commits onto base branch
    Rebase,
}

impl std::fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Squash => write!(f, "squash"),
            Self::Merge => write!(f, "merge"),
            Self::Rebase => write!(f, "rebase"),
        }
    }
}
