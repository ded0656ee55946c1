//! Webhook event routing
//!
//! Maps a lifecycle event to the pull requests it should re-evaluate.

use crate::error::{Error, Result};
use crate::types::{PrRef, RepoRef};
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Deserialize)]
struct RepositoryPayload {
    name: String,
    owner: OwnerPayload,
}

#[derive(Deserialize)]
struct OwnerPayload {
    login: String,
}

impl From<RepositoryPayload> for RepoRef {
    fn from(repo: RepositoryPayload) -> Self {
        Self {
            owner: repo.owner.login,
            repo: repo.name,
        }
    }
}

#[derive(Deserialize)]
struct PrNumberPayload {
    number: u64,
}

#[derive(Deserialize)]
struct PullRequestEventPayload {
    action: String,
    pull_request: PrNumberPayload,
    repository: RepositoryPayload,
}

#[derive(Deserialize)]
struct CheckBodyPayload {
    #[serde(default)]
    pull_requests: Vec<PrNumberPayload>,
}

#[derive(Deserialize)]
struct CheckRunEventPayload {
    action: String,
    check_run: CheckBodyPayload,
    repository: RepositoryPayload,
}

#[derive(Deserialize)]
struct CheckSuiteEventPayload {
    action: String,
    check_suite: CheckBodyPayload,
    repository: RepositoryPayload,
}

/// A parsed webhook event, reduced to what routing needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    /// `pull_request`
    PullRequest {
        /// Event action, e.g. "opened"
        action: String,
        /// Repository the event came from
        repository: RepoRef,
        /// PR number
        number: u64,
    },
    /// `pull_request_review`
    PullRequestReview {
        /// Event action, e.g. "submitted"
        action: String,
        /// Repository the event came from
        repository: RepoRef,
        /// PR number
        number: u64,
    },
    /// `check_run`
    CheckRun {
        /// Event action, e.g. "created"
        action: String,
        /// Repository the event came from
        repository: RepoRef,
        /// PRs the check run's commit belongs to
        pull_requests: Vec<u64>,
    },
    /// `check_suite`
    CheckSuite {
        /// Event action, e.g. "completed"
        action: String,
        /// Repository the event came from
        repository: RepoRef,
        /// PRs the check suite's commit belongs to
        pull_requests: Vec<u64>,
    },
    /// Any event we don't route
    Other {
        /// Event name from the delivery header
        name: String,
    },
}

fn parse_payload<T: DeserializeOwned>(name: &str, payload: &str) -> Result<T> {
    serde_json::from_str(payload).map_err(|e| Error::Event(format!("{name} payload: {e}")))
}

impl WebhookEvent {
    /// Parse a delivery from its event name (`X-GitHub-Event`) and JSON body
    pub fn parse(name: &str, payload: &str) -> Result<Self> {
        let event = match name {
            "pull_request" => {
                let p: PullRequestEventPayload = parse_payload(name, payload)?;
                Self::PullRequest {
                    action: p.action,
                    repository: p.repository.into(),
                    number: p.pull_request.number,
                }
            }
            "pull_request_review" => {
                let p: PullRequestEventPayload = parse_payload(name, payload)?;
                Self::PullRequestReview {
                    action: p.action,
                    repository: p.repository.into(),
                    number: p.pull_request.number,
                }
            }
            "check_run" => {
                let p: CheckRunEventPayload = parse_payload(name, payload)?;
                Self::CheckRun {
                    action: p.action,
                    repository: p.repository.into(),
                    pull_requests: p.check_run.pull_requests.iter().map(|pr| pr.number).collect(),
                }
            }
            "check_suite" => {
                let p: CheckSuiteEventPayload = parse_payload(name, payload)?;
                Self::CheckSuite {
                    action: p.action,
                    repository: p.repository.into(),
                    pull_requests: p
                        .check_suite
                        .pull_requests
                        .iter()
                        .map(|pr| pr.number)
                        .collect(),
                }
            }
            other => Self::Other {
                name: other.to_string(),
            },
        };
        Ok(event)
    }

    /// Repository the event came from, if it's one we route
    pub const fn repository(&self) -> Option<&RepoRef> {
        match self {
            Self::PullRequest { repository, .. }
            | Self::PullRequestReview { repository, .. }
            | Self::CheckRun { repository, .. }
            | Self::CheckSuite { repository, .. } => Some(repository),
            Self::Other { .. } => None,
        }
    }

    /// PRs to evaluate for this event, without duplicates
    ///
    /// Actions that can't change the merge decision yield nothing.
    pub fn target_pull_requests(&self) -> Vec<PrRef> {
        let (repository, numbers): (&RepoRef, Vec<u64>) = match self {
            Self::PullRequest {
                action,
                repository,
                number,
            } if matches!(action.as_str(), "opened" | "reopened" | "synchronize") => {
                (repository, vec![*number])
            }
            Self::PullRequestReview {
                action,
                repository,
                number,
            } if matches!(action.as_str(), "submitted" | "dismissed") => {
                (repository, vec![*number])
            }
            Self::CheckRun {
                action,
                repository,
                pull_requests,
            } if matches!(
                action.as_str(),
                "created" | "rerequested" | "requested_action"
            ) =>
            {
                (repository, pull_requests.clone())
            }
            Self::CheckSuite {
                action,
                repository,
                pull_requests,
            } if matches!(action.as_str(), "completed" | "requested" | "rerequested") => {
                (repository, pull_requests.clone())
            }
            _ => return Vec::new(),
        };

        let mut targets: Vec<PrRef> = Vec::new();
        for number in numbers {
            let pr = PrRef::new(repository.owner.clone(), repository.repo.clone(), number);
            if !targets.contains(&pr) {
                targets.push(pr);
            }
        }
        targets
    }
}
