//! Review aggregation
//!
//! Reduces a PR's review history to one current verdict per reviewer.

use crate::types::{Review, ReviewState};
use std::collections::BTreeMap;

/// Latest review verdict per reviewer login
///
/// Keyed by login so the summary lines come out in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatestReviews(BTreeMap<String, ReviewState>);

impl LatestReviews {
    /// Verdict for one reviewer, if they reviewed at all
    pub fn get(&self, reviewer: &str) -> Option<ReviewState> {
        self.0.get(reviewer).copied()
    }

    /// Number of distinct reviewers
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// No reviews at all
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reviewers whose latest verdict is `state`
    pub fn count(&self, state: ReviewState) -> usize {
        self.0.values().filter(|s| **s == state).count()
    }

    /// Iterate reviewers and verdicts in login order
    pub fn iter(&self) -> impl Iterator<Item = (&str, ReviewState)> {
        self.0.iter().map(|(login, state)| (login.as_str(), *state))
    }

    /// One-line summary, e.g. `alice: APPROVED, bob: CHANGES_REQUESTED`
    pub fn summary(&self) -> String {
        if self.0.is_empty() {
            return "no reviews".to_string();
        }
        self.iter()
            .map(|(login, state)| format!("{login}: {state}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<(String, ReviewState)> for LatestReviews {
    fn from_iter<I: IntoIterator<Item = (String, ReviewState)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Reduce reviews to the latest verdict per reviewer
///
/// Reviews are ordered by submission time; a later review from the same
/// reviewer replaces the earlier one. The sort is stable, so reviews with
/// the same timestamp keep their input order and the last one wins.
/// Reviews without a timestamp sort first.
pub fn aggregate_reviews(reviews: &[Review]) -> LatestReviews {
    let mut ordered: Vec<&Review> = reviews.iter().collect();
    ordered.sort_by_key(|r| r.submitted_at);

    ordered
        .into_iter()
        .map(|r| (r.author.clone(), r.state))
        .collect()
}
