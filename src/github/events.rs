//! Workflow Run Event Payload
//!
//! Serde model for the `workflow_run` webhook payload delivered to the
//! action. Only the fields the metric computation consumes are modeled;
//! everything else in the payload is ignored.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A `workflow_run` event payload.
#[derive(Deserialize, Debug, Clone)]
pub struct WorkflowRunEvent {
    /// Event action (`requested`, `in_progress`, `completed`).
    pub action: String,

    /// The workflow run the event describes.
    pub workflow_run: WorkflowRun,

    /// The workflow the run belongs to.
    pub workflow: WorkflowInfo,

    /// The repository the run belongs to.
    pub repository: RepositoryInfo,
}

/// The `workflow_run` object of the payload.
#[derive(Deserialize, Debug, Clone)]
pub struct WorkflowRun {
    /// Run id, used to list the run's jobs.
    pub id: u64,

    /// Workflow name as rendered for this run.
    #[serde(default)]
    pub name: Option<String>,

    /// Head commit SHA; the workflow file is fetched at this ref.
    pub head_sha: String,

    /// Triggering event name (`push`, `pull_request`, `schedule`, ...).
    pub event: String,

    /// Final conclusion (`success`, `failure`, `cancelled`, ...); absent
    /// until the run completes.
    #[serde(default)]
    pub conclusion: Option<String>,

    /// Link to the run, used in log output.
    pub html_url: String,

    /// When the run was created (queued).
    pub created_at: DateTime<Utc>,

    /// When the run was last updated; for a completed run this is the
    /// completion time.
    pub updated_at: DateTime<Utc>,

    /// When the run actually started executing.
    #[serde(default)]
    pub run_started_at: Option<DateTime<Utc>>,

    /// Attempt number, starting at 1.
    #[serde(default)]
    pub run_attempt: Option<u64>,
}

/// The `workflow` object of the payload.
#[derive(Deserialize, Debug, Clone)]
pub struct WorkflowInfo {
    /// Workflow name as declared in the definition.
    pub name: String,

    /// Repository-relative path of the workflow file, e.g.
    /// `.github/workflows/ci.yaml`.
    pub path: String,
}

/// The `repository` object of the payload.
#[derive(Deserialize, Debug, Clone)]
pub struct RepositoryInfo {
    /// `owner/name` form, e.g. `Codertocat/Hello-World`.
    pub full_name: String,
}
