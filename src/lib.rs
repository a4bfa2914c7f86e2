//! Actions Metrics - GitHub Actions Workflow Metrics Collector
//!
//! A GitHub Action that turns completed `workflow_run` events into
//! OpenTelemetry metrics: run, job, and step durations and counts, labeled
//! with canonical job names, matrix values, and the runner each job was
//! declared to execute on.
//!
//! # Architecture
//!
//! The library is organized into six modules:
//!
//! - [`workflow`]: Workflow definition parsing, job name canonicalization,
//!   runner inference, and metric computation
//! - [`github`]: Event payload models and the REST client
//! - [`rate_limit`]: GitHub API quota gauges
//! - [`otel`]: Meter provider setup and exporter selection
//! - [`config`]: Action inputs and run context
//! - [`run`]: Event dispatch
//!
//! # Example
//!
//! ```
//! use actions_metrics::workflow::{infer_runner, parse_job_name, parse_workflow};
//!
//! let definition = parse_workflow("jobs:\n  ts:\n    runs-on: ubuntu-latest\n").unwrap();
//!
//! let runner = infer_runner("ts (1, 2, 3)", Some(&definition));
//! assert_eq!(runner.as_deref(), Some("ubuntu-latest"));
//!
//! let attributes = parse_job_name("ts (1, 2, 3)");
//! assert_eq!(attributes.canonical_name, "ts");
//! assert_eq!(attributes.matrix.as_deref(), Some("1, 2, 3"));
//! ```

pub mod config;
pub mod github;
pub mod otel;
pub mod rate_limit;
pub mod run;
pub mod workflow;

// Re-export commonly used types
pub use github::{GitHubClient, WorkflowRunEvent};
pub use workflow::{
    canonical_job_name, infer_runner, parse_job_name, parse_workflow, JobNameAttributes, JobSpec,
    WorkflowDefinition, WorkflowParseError,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "actions-metrics";
