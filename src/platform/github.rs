//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    CheckConclusion, CheckRun, CheckStatus, MergeMethod, MergeResult, PlatformConfig, PrRef,
    PrState, PullRequest, RepoRef, Review, ReviewState,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Page size for paginated REST calls (GitHub maximum).
const PER_PAGE: usize = 100;

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
    /// Token for raw HTTP requests (check runs)
    token: String,
    /// HTTP client for raw requests (check runs)
    http_client: Client,
    /// API base URL for raw requests, without trailing slash
    api_base: String,
}

impl GitHubService {
    /// Create a new GitHub service
    pub fn new(token: &str, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let api_base = host.as_ref().map_or_else(
            || "https://api.github.com".to_string(),
            |h| format!("https://{h}/api/v3"),
        );
        Self::with_base_url(token, owner, repo, host, &api_base)
    }

    /// Create a GitHub service talking to an explicit API base URL
    pub fn with_base_url(
        token: &str,
        owner: String,
        repo: String,
        host: Option<String>,
        api_base: &str,
    ) -> Result<Self> {
        let api_base = api_base.trim_end_matches('/').to_string();

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(api_base.as_str())
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("pr-automerge")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: PlatformConfig { owner, repo, host },
            token: token.to_string(),
            http_client,
            api_base,
        })
    }

    /// Fetch one page of check runs for a ref
    async fn fetch_check_runs_page(&self, git_ref: &str, page: usize) -> Result<CheckRunsResponse> {
        let url = format!(
            "{}/repos/{}/{}/commits/{}/check-runs",
            self.api_base, self.config.owner, self.config.repo, git_ref
        );

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("filter", "latest".to_string()),
                ("per_page", PER_PAGE.to_string()),
                ("page", page.to_string()),
            ])
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to fetch check runs: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::GitHubApi(format!(
                "Check runs request for {git_ref} returned {status}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse check runs: {e}")))
    }
}

#[derive(Deserialize)]
struct CheckRunsResponse {
    total_count: usize,
    check_runs: Vec<ApiCheckRun>,
}

#[derive(Deserialize)]
struct ApiCheckRun {
    name: String,
    status: String,
    conclusion: Option<String>,
}

impl From<ApiCheckRun> for CheckRun {
    fn from(run: ApiCheckRun) -> Self {
        Self {
            status: CheckStatus::from_api(&run.status),
            conclusion: run.conclusion.as_deref().and_then(CheckConclusion::from_api),
            name: run.name,
        }
    }
}

/// Helper to convert octocrab PR to our `PullRequest` type
fn pr_from_octocrab(config: &PlatformConfig, pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    let state = match pr.state {
        Some(octocrab::models::IssueState::Open) => PrState::Open,
        // IssueState is non-exhaustive, so use wildcard for Closed and any future variants
        Some(_) | None => PrState::Closed,
    };

    let base = pr.base.repo.as_ref().map_or_else(
        || RepoRef {
            owner: config.owner.clone(),
            repo: config.repo.clone(),
        },
        |repo| RepoRef {
            owner: repo
                .owner
                .as_ref()
                .map_or_else(|| config.owner.clone(), |o| o.login.clone()),
            repo: repo.name.clone(),
        },
    );

    PullRequest {
        id: PrRef::new(config.owner.clone(), config.repo.clone(), pr.number),
        head_sha: pr.head.sha.clone(),
        base,
        base_ref: pr.base.ref_field.clone(),
        state,
        merged: pr.merged.unwrap_or(false) || pr.merged_at.is_some(),
        mergeable: pr.mergeable,
    }
}

/// Helper to convert an octocrab review, dropping ones we can't attribute
fn review_from_octocrab(review: &octocrab::models::pulls::Review) -> Option<Review> {
    use octocrab::models::pulls::ReviewState as Api;

    let author = review.user.as_ref()?.login.clone();
    let state = match review.state? {
        Api::Approved => ReviewState::Approved,
        Api::ChangesRequested => ReviewState::ChangesRequested,
        Api::Commented => ReviewState::Commented,
        Api::Dismissed => ReviewState::Dismissed,
        Api::Pending => ReviewState::Pending,
        _ => return None,
    };

    Some(Review {
        author,
        state,
        submitted_at: review.submitted_at,
    })
}

/// Whether the merge endpoint refused rather than failed.
///
/// 405: not mergeable (includes "already merged"), 409: head SHA moved.
fn is_merge_refusal(error: &octocrab::GitHubError) -> bool {
    matches!(error.status_code.as_u16(), 405 | 409)
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn get_pull_request(&self, pr_number: u64) -> Result<PullRequest> {
        debug!(pr_number, "getting PR");

        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .get(pr_number)
            .await?;

        let result = pr_from_octocrab(&self.config, &pr);
        debug!(
            pr_number,
            state = %result.state,
            merged = result.merged,
            mergeable = ?result.mergeable,
            "got PR"
        );
        Ok(result)
    }

    async fn list_reviews(&self, pr_number: u64) -> Result<Vec<Review>> {
        debug!(pr_number, "listing reviews");

        let first_page = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list_reviews(pr_number)
            .per_page(100)
            .send()
            .await?;
        let reviews = self.client.all_pages(first_page).await?;

        let result: Vec<Review> = reviews.iter().filter_map(review_from_octocrab).collect();
        debug!(pr_number, count = result.len(), "listed reviews");
        Ok(result)
    }

    async fn list_check_runs(&self, git_ref: &str) -> Result<Vec<CheckRun>> {
        debug!(git_ref, "listing check runs");

        let mut runs: Vec<CheckRun> = Vec::new();
        let mut page = 1;
        loop {
            let response = self.fetch_check_runs_page(git_ref, page).await?;
            let fetched = response.check_runs.len();
            runs.extend(response.check_runs.into_iter().map(CheckRun::from));

            if fetched < PER_PAGE || runs.len() >= response.total_count {
                break;
            }
            page += 1;
        }

        debug!(git_ref, count = runs.len(), "listed check runs");
        Ok(runs)
    }

    async fn merge_pr(&self, pr_number: u64, method: MergeMethod) -> Result<MergeResult> {
        debug!(pr_number, %method, "merging PR");

        let octocrab_method = match method {
            MergeMethod::Squash => octocrab::params::pulls::MergeMethod::Squash,
            MergeMethod::Merge => octocrab::params::pulls::MergeMethod::Merge,
            MergeMethod::Rebase => octocrab::params::pulls::MergeMethod::Rebase,
        };

        let merge_result = match self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .merge(pr_number)
            .method(octocrab_method)
            .send()
            .await
        {
            Ok(result) => MergeResult {
                merged: result.merged,
                sha: result.sha,
                message: result.message,
            },
            Err(octocrab::Error::GitHub { source, .. }) if is_merge_refusal(&source) => {
                debug!(pr_number, status = %source.status_code, "merge refused");
                MergeResult {
                    merged: false,
                    sha: None,
                    message: Some(source.message.clone()),
                }
            }
            Err(e) => return Err(Error::GitHubApi(format!("Merge failed: {e}"))),
        };

        debug!(
            pr_number,
            merged = merge_result.merged,
            sha = ?merge_result.sha,
            "merge complete"
        );
        Ok(merge_result)
    }

    async fn get_file_content(&self, path: &str) -> Result<Option<String>> {
        debug!(path, "reading repository file");

        let items = match self
            .client
            .repos(&self.config.owner, &self.config.repo)
            .get_content()
            .path(path)
            .send()
            .await
        {
            Ok(items) => items,
            Err(octocrab::Error::GitHub { source, .. }) if source.status_code.as_u16() == 404 => {
                debug!(path, "repository file not found");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        Ok(items.items.first().and_then(|item| item.decoded_content()))
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
