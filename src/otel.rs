//! Telemetry Setup
//!
//! Builds the OpenTelemetry meter provider the action records through. The
//! exporter backend is selected by the `exporter` input: `otlp` pushes to
//! an OTLP/gRPC collector, `console` prints to stdout, and anything else
//! falls back to the console exporter with a warning.
//!
//! The returned provider must be kept alive for the duration of the run
//! and force-flushed before shutdown; the action is one-shot, so the
//! periodic reader mainly batches what the handlers record.

use std::error::Error;
use std::time::Duration;

use log::{info, warn};
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::metrics::exporter::PushMetricExporter;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::Resource;

use crate::config::ActionInputs;

/// Service identity attached to every exported data point.
const SERVICE_NAME: &str = "github-actions-metrics";

/// Export interval. Cloud backends commonly reject sample periods below
/// a few seconds; 10 s matches them comfortably.
const EXPORT_INTERVAL: Duration = Duration::from_secs(10);

/// Builds the meter provider for the configured exporter.
pub fn setup_meter_provider(inputs: &ActionInputs) -> Result<SdkMeterProvider, Box<dyn Error>> {
    info!("Setting up telemetry with {} exporter", inputs.exporter);

    let resource = Resource::builder()
        .with_service_name(SERVICE_NAME)
        .with_attributes(vec![KeyValue::new("service.namespace", SERVICE_NAME)])
        .build();

    let provider = match inputs.exporter.as_str() {
        "otlp" => {
            let exporter = opentelemetry_otlp::MetricExporter::builder()
                .with_tonic()
                .with_endpoint(&inputs.otlp_endpoint)
                .build()?;
            build_provider(resource, exporter)
        }
        "console" => build_provider(resource, opentelemetry_stdout::MetricExporter::default()),
        other => {
            warn!("Unknown exporter {}. Falling back to console exporter", other);
            build_provider(resource, opentelemetry_stdout::MetricExporter::default())
        }
    };

    Ok(provider)
}

fn build_provider<E: PushMetricExporter>(resource: Resource, exporter: E) -> SdkMeterProvider {
    let reader = PeriodicReader::builder(exporter)
        .with_interval(EXPORT_INTERVAL)
        .build();

    SdkMeterProvider::builder()
        .with_resource(resource)
        .with_reader(reader)
        .build()
}
