//! GitHub REST API Response Models
//!
//! Serde models for the job listing and rate limit endpoints. As with the
//! event payload, only consumed fields are modeled.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Response of `GET /repos/{repo}/actions/runs/{run_id}/jobs`.
#[derive(Deserialize, Debug, Clone)]
pub struct JobsListing {
    /// Total number of jobs for the run, across all pages.
    pub total_count: u64,

    /// Jobs on this page.
    pub jobs: Vec<WorkflowJob>,
}

/// A single job of a workflow run.
#[derive(Deserialize, Debug, Clone)]
pub struct WorkflowJob {
    /// Job id.
    pub id: u64,

    /// Runtime job name, possibly with matrix values and composite
    /// segments rendered in.
    pub name: String,

    /// Final conclusion; absent while the job is in progress.
    #[serde(default)]
    pub conclusion: Option<String>,

    /// When the job started executing.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,

    /// When the job finished.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,

    /// Steps of the job.
    #[serde(default)]
    pub steps: Vec<JobStep>,
}

/// A single step within a job.
#[derive(Deserialize, Debug, Clone)]
pub struct JobStep {
    /// Step name.
    pub name: String,

    /// Final conclusion; absent while the step is in progress or when the
    /// step was skipped before starting.
    #[serde(default)]
    pub conclusion: Option<String>,

    /// Step number within the job, starting at 1.
    pub number: u64,

    /// When the step started executing.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,

    /// When the step finished.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Response of `GET /rate_limit`.
#[derive(Deserialize, Debug, Clone)]
pub struct RateLimit {
    /// Per-resource quota buckets.
    pub resources: RateLimitResources,
}

/// The quota buckets reported by the rate limit endpoint.
#[derive(Deserialize, Debug, Clone)]
pub struct RateLimitResources {
    /// REST API quota.
    pub core: RateLimitResource,

    /// Search API quota.
    #[serde(default)]
    pub search: Option<RateLimitResource>,

    /// GraphQL API quota; absent for some token types.
    #[serde(default)]
    pub graphql: Option<RateLimitResource>,
}

/// Quota state of one rate limit resource.
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct RateLimitResource {
    /// Maximum requests per window.
    pub limit: u64,

    /// Requests remaining in the current window.
    pub remaining: u64,

    /// Requests consumed in the current window.
    pub used: u64,
}
