//! Event Dispatch
//!
//! Entry point of the action after configuration: sets up telemetry,
//! routes the event to its handler, then flushes and shuts the meter
//! provider down. Only completed `workflow_run` events produce metrics;
//! anything else logs a warning and succeeds.
//!
//! GitHub API failures never abort metric emission: the affected metrics
//! are skipped with a warning and the rest of the run proceeds.

use std::error::Error;

use log::{info, warn};
use opentelemetry::metrics::MeterProvider;
use opentelemetry_sdk::metrics::SdkMeterProvider;

use crate::config::{ActionInputs, GitHubContext};
use crate::github::{GitHubClient, WorkflowRunEvent};
use crate::otel;
use crate::rate_limit::RateLimitMetrics;
use crate::workflow::{parse_workflow, CollectionOptions, WorkflowDefinition, WorkflowRunMetrics};

/// Runs the action: telemetry setup, event handling, flush, shutdown.
pub async fn run(context: GitHubContext, inputs: ActionInputs) -> Result<(), Box<dyn Error>> {
    let provider = otel::setup_meter_provider(&inputs)?;

    handle_event(&provider, &context, &inputs).await?;

    info!("Shutting down telemetry");
    provider.force_flush()?;
    provider.shutdown()?;

    Ok(())
}

async fn handle_event(
    provider: &SdkMeterProvider,
    context: &GitHubContext,
    inputs: &ActionInputs,
) -> Result<(), Box<dyn Error>> {
    if context.event_name == "workflow_run" {
        let event: WorkflowRunEvent = serde_json::from_value(context.payload.clone())?;
        return handle_workflow_run(provider, &event, context, inputs).await;
    }

    warn!("Event not supported: {}", context.event_name);
    Ok(())
}

async fn handle_workflow_run(
    provider: &SdkMeterProvider,
    event: &WorkflowRunEvent,
    context: &GitHubContext,
    inputs: &ActionInputs,
) -> Result<(), Box<dyn Error>> {
    info!(
        "Got workflow run {} event: {}",
        event.action, event.workflow_run.html_url
    );

    if event.action != "completed" {
        warn!("Not supported action {}", event.action);
        return Ok(());
    }

    let meter = provider.meter("workflow-run");
    let metrics = WorkflowRunMetrics::new(&meter);
    metrics.record_run(event);

    if inputs.collect_job_metrics || inputs.collect_step_metrics {
        collect_job_step_metrics(&metrics, event, context, inputs).await;
    }

    collect_rate_limit_metrics(provider, inputs).await;

    Ok(())
}

/// Queries the run's jobs and the workflow definition, then records job
/// and step metrics. Each query degrades independently.
async fn collect_job_step_metrics(
    metrics: &WorkflowRunMetrics,
    event: &WorkflowRunEvent,
    context: &GitHubContext,
    inputs: &ActionInputs,
) {
    let client = GitHubClient::new(&inputs.github_token);

    let definition = fetch_definition(&client, event, context).await;

    let listing = match client
        .list_workflow_jobs(&context.repository, event.workflow_run.id)
        .await
    {
        Ok(listing) => listing,
        Err(e) => {
            warn!("Could not list jobs of the workflow run: {}", e);
            return;
        }
    };

    info!(
        "Found {} job(s) for run {}",
        listing.jobs.len(),
        event.workflow_run.id
    );

    let options = CollectionOptions {
        job_metrics: inputs.collect_job_metrics,
        step_metrics: inputs.collect_step_metrics,
        parse_matrix_job_names: inputs.parse_matrix_job_names,
    };
    for job in &listing.jobs {
        metrics.record_job(event, job, definition.as_ref(), options);
    }
}

/// Fetches and parses the workflow definition at the run's head SHA.
/// Returns `None` on any failure; runner inference is skipped then.
async fn fetch_definition(
    client: &GitHubClient,
    event: &WorkflowRunEvent,
    context: &GitHubContext,
) -> Option<WorkflowDefinition> {
    let text = match client
        .fetch_workflow_definition(
            &context.repository,
            &event.workflow.path,
            &event.workflow_run.head_sha,
        )
        .await
    {
        Ok(text) => text,
        Err(e) => {
            warn!("Could not get the workflow definition: {}", e);
            return None;
        }
    };

    match parse_workflow(&text) {
        Ok(definition) => Some(definition),
        Err(e) => {
            warn!("Could not parse the workflow definition: {}", e);
            None
        }
    }
}

async fn collect_rate_limit_metrics(provider: &SdkMeterProvider, inputs: &ActionInputs) {
    let client = GitHubClient::new(&inputs.github_token_rate_limit_metrics);
    match client.rate_limit().await {
        Ok(rate_limit) => {
            let meter = provider.meter("rate-limit");
            RateLimitMetrics::new(&meter).record(&rate_limit);
        }
        Err(e) => warn!("Could not get the rate limit: {}", e),
    }
}
