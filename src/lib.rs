//! pr-automerge: automatic merge decisions for GitHub pull requests
//!
//! Reacts to pull request, review, and check lifecycle events, reduces the
//! pull request's reviews and check runs to a current state, applies the
//! repository's merge policy, and merges when everything is green. Pending
//! checks are rechecked later through an explicit work queue.

pub mod auth;
pub mod checks;
pub mod config;
pub mod error;
pub mod events;
pub mod merge;
pub mod platform;
pub mod report;
pub mod review;
pub mod types;
