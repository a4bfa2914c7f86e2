//! Action Configuration
//!
//! Inputs declared in the action manifest arrive as `INPUT_<NAME>`
//! environment variables; the run context (event name, repository, payload
//! file) comes from the standard `GITHUB_*` variables of the runner.

use std::error::Error;
use std::fs;
use std::path::Path;

use log::warn;

/// Inputs of the action, loaded from the environment.
#[derive(Debug, Clone)]
pub struct ActionInputs {
    /// Token for job listing and workflow file queries.
    pub github_token: String,
    /// Dedicated token for rate limit queries.
    pub github_token_rate_limit_metrics: String,
    /// Record job-level metrics.
    pub collect_job_metrics: bool,
    /// Record step-level metrics.
    pub collect_step_metrics: bool,
    /// Parse matrix values out of runtime job names.
    pub parse_matrix_job_names: bool,
    /// Exporter backend: `otlp` or `console`.
    pub exporter: String,
    /// OTLP gRPC endpoint, used when the exporter is `otlp`.
    pub otlp_endpoint: String,
}

impl Default for ActionInputs {
    fn default() -> Self {
        Self {
            github_token: String::new(),
            github_token_rate_limit_metrics: String::new(),
            collect_job_metrics: false,
            collect_step_metrics: false,
            parse_matrix_job_names: false,
            exporter: "console".to_string(),
            otlp_endpoint: "http://localhost:4317".to_string(),
        }
    }
}

impl ActionInputs {
    /// Loads the inputs from the environment, warning about missing
    /// tokens. Missing tokens disable the corresponding queries at run
    /// time rather than failing here.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let github_token = input("github-token").unwrap_or_default();
        let github_token_rate_limit_metrics = input("github-token-rate-limit-metrics")
            .unwrap_or_else(|| github_token.clone());

        if github_token.is_empty() {
            warn!("github-token not set -- job and step metrics disabled");
        }

        Self {
            github_token,
            github_token_rate_limit_metrics,
            collect_job_metrics: input_flag("collect-job-metrics"),
            collect_step_metrics: input_flag("collect-step-metrics"),
            parse_matrix_job_names: input_flag("parse-matrix-job-names"),
            exporter: input("exporter").unwrap_or(defaults.exporter),
            otlp_endpoint: input("otlp-endpoint").unwrap_or(defaults.otlp_endpoint),
        }
    }
}

/// Reads an action input by its manifest name. The runner exposes the
/// input `foo-bar` as `INPUT_FOO-BAR`.
fn input(name: &str) -> Option<String> {
    let var = format!("INPUT_{}", name.to_uppercase());
    std::env::var(var).ok().filter(|s| !s.is_empty())
}

/// Reads a boolean action input; anything but a case-insensitive `true`
/// is false.
fn input_flag(name: &str) -> bool {
    input(name)
        .map(|s| s.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// The GitHub context of this action invocation.
#[derive(Debug, Clone)]
pub struct GitHubContext {
    /// Name of the event that triggered the action.
    pub event_name: String,
    /// Repository in `owner/name` form.
    pub repository: String,
    /// Raw event payload.
    pub payload: serde_json::Value,
}

impl GitHubContext {
    /// Loads the context from the runner environment: `GITHUB_EVENT_NAME`,
    /// `GITHUB_REPOSITORY`, and the payload file at `GITHUB_EVENT_PATH`.
    pub fn from_env() -> Result<Self, Box<dyn Error>> {
        let event_name = std::env::var("GITHUB_EVENT_NAME")
            .map_err(|_| "GITHUB_EVENT_NAME is not set")?;
        let repository = std::env::var("GITHUB_REPOSITORY")
            .map_err(|_| "GITHUB_REPOSITORY is not set")?;
        let event_path = std::env::var("GITHUB_EVENT_PATH")
            .map_err(|_| "GITHUB_EVENT_PATH is not set")?;

        Self::load(event_name, repository, event_path)
    }

    /// Builds a context from an explicit payload file path.
    pub fn load(
        event_name: impl Into<String>,
        repository: impl Into<String>,
        payload_path: impl AsRef<Path>,
    ) -> Result<Self, Box<dyn Error>> {
        let payload_path = payload_path.as_ref();
        let text = fs::read_to_string(payload_path).map_err(|e| {
            format!(
                "Failed to read event payload '{}': {}",
                payload_path.display(),
                e
            )
        })?;
        let payload = serde_json::from_str(&text)
            .map_err(|e| format!("Failed to parse event payload: {}", e))?;

        Ok(Self {
            event_name: event_name.into(),
            repository: repository.into(),
            payload,
        })
    }
}
