//! Prometheus metrics exporter.
//!
//! The recorder is installed once per process; the service and store record
//! through the `metrics` macros and `GET /metrics` renders the result.

use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use thiserror::Error;

/// Errors from metrics setup.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Build a recorder with latency buckets for every `*_duration_seconds`
/// histogram, without installing it.
///
/// # Errors
///
/// Returns [`MetricsError::Build`] if the bucket configuration is rejected.
pub fn build_recorder() -> Result<PrometheusRecorder, MetricsError> {
    let builder = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )
        .map_err(|e| MetricsError::Build(e.to_string()))?;

    Ok(builder.build_recorder())
}

/// Install the global recorder and describe the application metrics.
///
/// # Errors
///
/// Returns [`MetricsError::Install`] if a recorder is already installed.
pub fn install_recorder() -> Result<PrometheusHandle, MetricsError> {
    let recorder = build_recorder()?;
    let handle = recorder.handle();

    metrics::set_global_recorder(recorder).map_err(|e| MetricsError::Install(e.to_string()))?;
    register_metrics();

    tracing::info!("Metrics recorder installed - available at /metrics");
    Ok(handle)
}

/// Router serving `GET /metrics` from `handle`.
pub fn metrics_router(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || std::future::ready(handle.render())))
}

fn register_metrics() {
    describe_counter!(
        "item_requests_created_total",
        "Total number of item requests created"
    );
    describe_counter!(
        "item_requests_status_edits_total",
        "Total number of status edits, by new status"
    );
    describe_counter!(
        "item_requests_failures_total",
        "Total number of failed operations, by operation and error type"
    );
    describe_histogram!(
        "item_requests_store_duration_seconds",
        "Time taken by store operations"
    );
    describe_counter!(
        "item_requests_store_errors_total",
        "Total number of failed store operations"
    );
    describe_counter!(
        "item_requests_store_connections_total",
        "Total number of store connection pools established"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn local_recorder_renders_recorded_metrics() {
        let recorder = build_recorder().expect("recorder should build");
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            metrics::counter!("item_requests_created_total").increment(2);
            metrics::histogram!("item_requests_store_duration_seconds", "operation" => "insert")
                .record(0.003);
        });

        let rendered = handle.render();
        assert!(rendered.contains("item_requests_created_total 2"));
        assert!(rendered.contains("item_requests_store_duration_seconds_bucket"));
    }
}
