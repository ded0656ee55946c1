//! Merge policy - pure decision function
//!
//! No I/O happens here. All data is passed in, making it easy to unit test.

use crate::checks::CheckSummary;
use crate::config::MergePolicy;
use crate::review::LatestReviews;
use crate::types::{CheckConclusion, PrState, PullRequest, ReviewState};
use std::time::Duration;

/// Why a PR will not be merged right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockReason {
    /// PR is closed
    NotOpen,
    /// PR was merged already
    AlreadyMerged,
    /// Conflicts, or GitHub hasn't computed mergeability yet
    NotMergeable,
    /// Too many reviewers currently request changes
    TooManyChangeRequests {
        /// Reviewers whose latest review requests changes
        rejections: usize,
        /// Largest tolerated count
        limit: u32,
    },
    /// Too few reviewers currently approve
    NotEnoughApprovals {
        /// Reviewers whose latest review approves
        approvals: usize,
        /// Smallest accepted count
        required: u32,
    },
    /// At least one check finished with a blocking conclusion
    BlockingCheckConclusion(Vec<CheckConclusion>),
}

impl std::fmt::Display for BlockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotOpen => write!(f, "not open"),
            Self::AlreadyMerged => write!(f, "already merged"),
            Self::NotMergeable => write!(f, "not mergeable"),
            Self::TooManyChangeRequests { rejections, limit } => {
                write!(f, "too many change requests ({rejections} > {limit})")
            }
            Self::NotEnoughApprovals {
                approvals,
                required,
            } => write!(f, "not enough approvals ({approvals} < {required})"),
            Self::BlockingCheckConclusion(conclusions) => {
                let names: Vec<String> = conclusions.iter().map(ToString::to_string).collect();
                write!(f, "blocking check conclusion ({})", names.join(", "))
            }
        }
    }
}

/// Outcome of applying the merge policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeDecision {
    /// Merge now
    Merge,
    /// Don't merge; wait for another event
    Blocked(BlockReason),
    /// Checks still running; evaluate again after the delay
    Pending(Duration),
}

fn exceeds(count: usize, threshold: u32) -> bool {
    u32::try_from(count).map_or(true, |count| count > threshold)
}

fn below(count: usize, threshold: u32) -> bool {
    u32::try_from(count).is_ok_and(|count| count < threshold)
}

/// Decide what to do with a PR (PURE - no I/O, easily testable)
///
/// Rules are applied in order and the first match wins:
/// 1. closed, 2. merged, 3. not mergeable (including unknown),
/// 4. change requests, 5. approvals, 6. checks still running,
/// 7. blocking check conclusions, 8. merge.
///
/// Rules 4 and 5 compare change requests against `min_approvals` and
/// approvals against `max_requested_changes`, crossed relative to their names.
pub fn evaluate_policy(
    pr: &PullRequest,
    reviews: &LatestReviews,
    policy: &MergePolicy,
    checks: &CheckSummary,
    recheck_delay: Duration,
) -> MergeDecision {
    if pr.state != PrState::Open {
        return MergeDecision::Blocked(BlockReason::NotOpen);
    }
    if pr.merged {
        return MergeDecision::Blocked(BlockReason::AlreadyMerged);
    }
    if pr.mergeable != Some(true) {
        return MergeDecision::Blocked(BlockReason::NotMergeable);
    }

    let rejections = reviews.count(ReviewState::ChangesRequested);
    if exceeds(rejections, policy.min_approvals) {
        return MergeDecision::Blocked(BlockReason::TooManyChangeRequests {
            rejections,
            limit: policy.min_approvals,
        });
    }

    let approvals = reviews.count(ReviewState::Approved);
    if below(approvals, policy.max_requested_changes) {
        return MergeDecision::Blocked(BlockReason::NotEnoughApprovals {
            approvals,
            required: policy.max_requested_changes,
        });
    }

    if !checks.all_completed {
        return MergeDecision::Pending(recheck_delay);
    }

    let blocking = checks.blocking();
    if !blocking.is_empty() {
        return MergeDecision::Blocked(BlockReason::BlockingCheckConclusion(blocking));
    }

    MergeDecision::Merge
}
