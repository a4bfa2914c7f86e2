//! GitHub REST API Client
//!
//! Thin reqwest-based client for the three queries the action performs:
//! fetching the workflow definition file, listing a run's jobs, and reading
//! the rate limit. Every caller treats failures as degradations, never as
//! fatal errors.

use log::debug;
use thiserror::Error;

use super::models::{JobsListing, RateLimit};

/// Default API base URL, overridable for GitHub Enterprise via
/// `GITHUB_API_URL`.
const DEFAULT_API_URL: &str = "https://api.github.com";

/// Jobs are fetched in a single page; runs with more jobs than this are
/// truncated.
const JOBS_PER_PAGE: u32 = 100;

/// Errors returned by [`GitHubClient`] operations.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Transport-level failure (connection, TLS, body decoding).
    #[error("GitHub API request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("GitHub API returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
}

/// Client for the GitHub REST API.
pub struct GitHubClient {
    http: reqwest::Client,
    token: String,
    api_url: String,
}

impl GitHubClient {
    /// Creates a client authenticating with the given token. The API base
    /// URL is taken from `GITHUB_API_URL` when set (GitHub Enterprise).
    pub fn new(token: impl Into<String>) -> Self {
        let api_url =
            std::env::var("GITHUB_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::with_api_url(token, api_url)
    }

    /// Creates a client against an explicit API base URL.
    pub fn with_api_url(token: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: token.into(),
            api_url: api_url.into(),
        }
    }

    /// Fetches the raw text of a workflow definition file at a ref.
    ///
    /// # Arguments
    ///
    /// * `repo` - Repository in `owner/name` form
    /// * `path` - Repository-relative workflow file path
    /// * `git_ref` - Commit SHA or ref to read the file at
    pub async fn fetch_workflow_definition(
        &self,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<String, GitHubError> {
        let url = format!("{}/repos/{}/contents/{}", self.api_url, repo, path);
        debug!("Fetching workflow definition: {} at {}", url, git_ref);

        let resp = self
            .get(&url)
            .query(&[("ref", git_ref)])
            .header("Accept", "application/vnd.github.raw+json")
            .send()
            .await?;
        let resp = check_status(resp)?;

        Ok(resp.text().await?)
    }

    /// Lists the jobs of a workflow run (latest attempt, first page only).
    pub async fn list_workflow_jobs(
        &self,
        repo: &str,
        run_id: u64,
    ) -> Result<JobsListing, GitHubError> {
        let url = format!("{}/repos/{}/actions/runs/{}/jobs", self.api_url, repo, run_id);
        debug!("Listing jobs: {}", url);

        let resp = self
            .get(&url)
            .query(&[("per_page", JOBS_PER_PAGE)])
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;
        let resp = check_status(resp)?;

        Ok(resp.json().await?)
    }

    /// Reads the current rate limit state for this client's token.
    pub async fn rate_limit(&self) -> Result<RateLimit, GitHubError> {
        let url = format!("{}/rate_limit", self.api_url);
        debug!("Reading rate limit: {}", url);

        let resp = self
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;
        let resp = check_status(resp)?;

        Ok(resp.json().await?)
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("User-Agent", "actions-metrics")
    }
}

/// Turns a non-success response into a [`GitHubError::Status`].
fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, GitHubError> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        Err(GitHubError::Status {
            status: resp.status(),
            url: resp.url().to_string(),
        })
    }
}
