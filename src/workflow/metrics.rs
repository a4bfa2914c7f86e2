//! Workflow Run Metric Computation
//!
//! Translates a completed workflow run, its jobs, and their steps into
//! OpenTelemetry data points. Job- and step-level points are labeled with
//! the canonical job name, the rendered matrix values, and the runner label
//! inferred from the workflow definition when one is available.
//!
//! | Metric                                 | Type      | Unit |
//! |----------------------------------------|-----------|------|
//! | `actions.workflow_run.total`           | Counter   | 1    |
//! | `actions.workflow_run.duration`        | Histogram | s    |
//! | `actions.workflow_run.queued_duration` | Histogram | s    |
//! | `actions.job.total`                    | Counter   | 1    |
//! | `actions.job.duration`                 | Histogram | s    |
//! | `actions.step.duration`                | Histogram | s    |

use chrono::{DateTime, Utc};
use opentelemetry::metrics::{Counter, Histogram, Meter};
use opentelemetry::KeyValue;

use crate::github::events::WorkflowRunEvent;
use crate::github::models::WorkflowJob;

use super::jobname::{parse_job_name, JobNameAttributes};
use super::model::WorkflowDefinition;
use super::runner::infer_runner;

/// Conclusion attribute value when GitHub reports none.
const UNKNOWN_CONCLUSION: &str = "unknown";

/// What to record for each job, as selected by the action inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionOptions {
    /// Record job-level count and duration points.
    pub job_metrics: bool,
    /// Record step-level duration points.
    pub step_metrics: bool,
    /// Parse matrix values out of job names. When off, the raw runtime
    /// name is used as the canonical attribute and no matrix attribute is
    /// emitted.
    pub parse_matrix_job_names: bool,
}

/// Records workflow run, job, and step metrics through OpenTelemetry
/// instruments.
pub struct WorkflowRunMetrics {
    runs_total: Counter<u64>,
    run_duration: Histogram<f64>,
    run_queued_duration: Histogram<f64>,
    jobs_total: Counter<u64>,
    job_duration: Histogram<f64>,
    step_duration: Histogram<f64>,
}

impl WorkflowRunMetrics {
    /// Creates the instrument set on the given meter.
    pub fn new(meter: &Meter) -> Self {
        let runs_total = meter
            .u64_counter("actions.workflow_run.total")
            .with_description("Completed workflow runs")
            .build();

        let run_duration = meter
            .f64_histogram("actions.workflow_run.duration")
            .with_description("Workflow run execution time")
            .with_unit("s")
            .build();

        let run_queued_duration = meter
            .f64_histogram("actions.workflow_run.queued_duration")
            .with_description("Time a workflow run spent queued before starting")
            .with_unit("s")
            .build();

        let jobs_total = meter
            .u64_counter("actions.job.total")
            .with_description("Completed workflow jobs")
            .build();

        let job_duration = meter
            .f64_histogram("actions.job.duration")
            .with_description("Job execution time")
            .with_unit("s")
            .build();

        let step_duration = meter
            .f64_histogram("actions.step.duration")
            .with_description("Step execution time")
            .with_unit("s")
            .build();

        Self {
            runs_total,
            run_duration,
            run_queued_duration,
            jobs_total,
            job_duration,
            step_duration,
        }
    }

    /// Records run-level metrics from the event payload.
    pub fn record_run(&self, event: &WorkflowRunEvent) {
        let attrs = run_attributes(event);
        self.runs_total.add(1, &attrs);

        let run = &event.workflow_run;
        if let Some(duration) = duration_secs(run.run_started_at, Some(run.updated_at)) {
            self.run_duration.record(duration, &attrs);
        }
        if let Some(queued) = duration_secs(Some(run.created_at), run.run_started_at) {
            self.run_queued_duration.record(queued, &attrs);
        }
    }

    /// Records job-level and step-level metrics for one job, as selected
    /// by `options`.
    pub fn record_job(
        &self,
        event: &WorkflowRunEvent,
        job: &WorkflowJob,
        definition: Option<&WorkflowDefinition>,
        options: CollectionOptions,
    ) {
        let attrs = job_attributes(event, job, definition, options.parse_matrix_job_names);

        if options.job_metrics {
            self.jobs_total.add(1, &attrs);
            if let Some(duration) = duration_secs(job.started_at, job.completed_at) {
                self.job_duration.record(duration, &attrs);
            }
        }

        if options.step_metrics {
            for step in &job.steps {
                let mut step_attrs = attrs.clone();
                step_attrs.push(KeyValue::new("step.name", step.name.clone()));
                step_attrs.push(KeyValue::new(
                    "step.conclusion",
                    step.conclusion
                        .clone()
                        .unwrap_or_else(|| UNKNOWN_CONCLUSION.to_string()),
                ));

                if let Some(duration) = duration_secs(step.started_at, step.completed_at) {
                    self.step_duration.record(duration, &step_attrs);
                }
            }
        }
    }
}

/// Attributes attached to run-level data points.
fn run_attributes(event: &WorkflowRunEvent) -> Vec<KeyValue> {
    vec![
        KeyValue::new("workflow.name", event.workflow.name.clone()),
        KeyValue::new("repository", event.repository.full_name.clone()),
        KeyValue::new("run.event", event.workflow_run.event.clone()),
        KeyValue::new(
            "run.conclusion",
            event
                .workflow_run
                .conclusion
                .clone()
                .unwrap_or_else(|| UNKNOWN_CONCLUSION.to_string()),
        ),
    ]
}

/// Attributes attached to job-level data points (and inherited by steps).
fn job_attributes(
    event: &WorkflowRunEvent,
    job: &WorkflowJob,
    definition: Option<&WorkflowDefinition>,
    parse_matrix_job_names: bool,
) -> Vec<KeyValue> {
    let names = if parse_matrix_job_names {
        parse_job_name(&job.name)
    } else {
        JobNameAttributes {
            canonical_name: job.name.clone(),
            matrix: None,
        }
    };

    let mut attrs = vec![
        KeyValue::new("workflow.name", event.workflow.name.clone()),
        KeyValue::new("repository", event.repository.full_name.clone()),
        KeyValue::new("job.canonical_name", names.canonical_name),
        KeyValue::new(
            "job.conclusion",
            job.conclusion
                .clone()
                .unwrap_or_else(|| UNKNOWN_CONCLUSION.to_string()),
        ),
    ];

    if let Some(matrix) = names.matrix {
        attrs.push(KeyValue::new("job.matrix", matrix));
    }

    if let Some(runner) = infer_runner(&job.name, definition) {
        attrs.push(KeyValue::new("job.runner", runner));
    }

    attrs
}

/// Computes a duration in seconds between two optional timestamps.
///
/// Returns `None` when either endpoint is absent or the interval is
/// negative (clock skew or an in-progress entity).
fn duration_secs(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Option<f64> {
    let delta = end? - start?;
    if delta < chrono::Duration::zero() {
        return None;
    }
    Some(delta.num_milliseconds() as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::events::{RepositoryInfo, WorkflowInfo, WorkflowRun};
    use crate::workflow::model::JobSpec;
    use chrono::TimeZone;
    use opentelemetry::metrics::MeterProvider;

    fn timestamp(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 8, 11, 0, secs / 60, secs % 60)
            .unwrap()
    }

    fn example_event() -> WorkflowRunEvent {
        WorkflowRunEvent {
            action: "completed".to_string(),
            workflow_run: WorkflowRun {
                id: 30433642,
                name: Some("Build".to_string()),
                head_sha: "acb5820".to_string(),
                event: "push".to_string(),
                conclusion: Some("success".to_string()),
                html_url: "https://example.invalid/runs/30433642".to_string(),
                created_at: timestamp(0),
                updated_at: timestamp(342),
                run_started_at: Some(timestamp(12)),
                run_attempt: Some(1),
            },
            workflow: WorkflowInfo {
                name: "Build".to_string(),
                path: ".github/workflows/build.yaml".to_string(),
            },
            repository: RepositoryInfo {
                full_name: "Codertocat/Hello-World".to_string(),
            },
        }
    }

    fn example_job(name: &str) -> WorkflowJob {
        WorkflowJob {
            id: 399444496,
            name: name.to_string(),
            conclusion: Some("success".to_string()),
            started_at: Some(timestamp(15)),
            completed_at: Some(timestamp(141)),
            steps: Vec::new(),
        }
    }

    fn attribute(attrs: &[KeyValue], key: &str) -> Option<String> {
        attrs
            .iter()
            .find(|kv| kv.key.as_str() == key)
            .map(|kv| kv.value.as_str().into_owned())
    }

    #[test]
    fn test_duration_secs() {
        assert_eq!(
            duration_secs(Some(timestamp(0)), Some(timestamp(90))),
            Some(90.0)
        );
    }

    #[test]
    fn test_duration_secs_missing_endpoint() {
        assert_eq!(duration_secs(None, Some(timestamp(90))), None);
        assert_eq!(duration_secs(Some(timestamp(0)), None), None);
        assert_eq!(duration_secs(None, None), None);
    }

    #[test]
    fn test_duration_secs_negative_interval() {
        assert_eq!(duration_secs(Some(timestamp(90)), Some(timestamp(0))), None);
    }

    #[test]
    fn test_run_attributes() {
        let attrs = run_attributes(&example_event());

        assert_eq!(
            attribute(&attrs, "workflow.name"),
            Some("Build".to_string())
        );
        assert_eq!(
            attribute(&attrs, "run.conclusion"),
            Some("success".to_string())
        );
    }

    #[test]
    fn test_job_attributes_with_matrix_parsing() {
        let definition = WorkflowDefinition::from_jobs(vec![(
            "build",
            JobSpec::new().with_runner("ubuntu-latest"),
        )]);
        let job = example_job("build (ubuntu, 20)");

        let attrs = job_attributes(&example_event(), &job, Some(&definition), true);

        assert_eq!(
            attribute(&attrs, "job.canonical_name"),
            Some("build".to_string())
        );
        assert_eq!(
            attribute(&attrs, "job.matrix"),
            Some("ubuntu, 20".to_string())
        );
        assert_eq!(
            attribute(&attrs, "job.runner"),
            Some("ubuntu-latest".to_string())
        );
    }

    #[test]
    fn test_job_attributes_without_matrix_parsing() {
        let job = example_job("build (ubuntu, 20)");

        let attrs = job_attributes(&example_event(), &job, None, false);

        assert_eq!(
            attribute(&attrs, "job.canonical_name"),
            Some("build (ubuntu, 20)".to_string())
        );
        assert!(attribute(&attrs, "job.matrix").is_none());
        assert!(attribute(&attrs, "job.runner").is_none());
    }

    #[test]
    fn test_job_attributes_unknown_conclusion() {
        let mut job = example_job("build");
        job.conclusion = None;

        let attrs = job_attributes(&example_event(), &job, None, true);

        assert_eq!(
            attribute(&attrs, "job.conclusion"),
            Some(UNKNOWN_CONCLUSION.to_string())
        );
    }

    #[test]
    fn test_records_expected_instruments() {
        use crate::github::models::JobStep;
        use opentelemetry_sdk::metrics::{
            data::ResourceMetrics, InMemoryMetricExporter, PeriodicReader, SdkMeterProvider,
        };

        let exporter = InMemoryMetricExporter::default();
        let reader = PeriodicReader::builder(exporter.clone()).build();
        let provider = SdkMeterProvider::builder().with_reader(reader).build();
        let meter = provider.meter("workflow-run");

        let metrics = WorkflowRunMetrics::new(&meter);
        let event = example_event();
        let mut job = example_job("build (ubuntu, 20)");
        job.steps.push(JobStep {
            name: "Run tests".to_string(),
            conclusion: Some("success".to_string()),
            number: 1,
            started_at: Some(timestamp(16)),
            completed_at: Some(timestamp(140)),
        });

        metrics.record_run(&event);
        metrics.record_job(
            &event,
            &job,
            None,
            CollectionOptions {
                job_metrics: true,
                step_metrics: true,
                parse_matrix_job_names: true,
            },
        );

        provider.force_flush().expect("force_flush");
        let finished = exporter.get_finished_metrics().expect("finished metrics");

        let mut names = std::collections::HashSet::new();
        for resource_metrics in &finished {
            collect_metric_names(resource_metrics, &mut names);
        }
        for expected in [
            "actions.workflow_run.total",
            "actions.workflow_run.duration",
            "actions.workflow_run.queued_duration",
            "actions.job.total",
            "actions.job.duration",
            "actions.step.duration",
        ] {
            assert!(names.contains(expected), "missing metric: {expected}");
        }

        provider.shutdown().expect("shutdown");

        fn collect_metric_names(
            resource_metrics: &ResourceMetrics,
            names: &mut std::collections::HashSet<String>,
        ) {
            for scope_metrics in &resource_metrics.scope_metrics {
                for metric in &scope_metrics.metrics {
                    names.insert(metric.name.to_string());
                }
            }
        }
    }
}
