//! Wiring for the item request server binary.
//!
//! The binary reads [`Config`](config::Config), installs logging and the
//! metrics recorder, then serves [`build_app`] until a shutdown signal.

#![forbid(unsafe_code)]

pub mod config;
pub mod metrics;

use axum::Router;
use item_requests_web::{build_router, AppState};
use metrics_exporter_prometheus::PrometheusHandle;

/// The full application router: request and health routes plus `/metrics`.
pub fn build_app(state: AppState, metrics_handle: PrometheusHandle) -> Router {
    build_router(state).merge(metrics::metrics_router(metrics_handle))
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` overrides the default `item_requests=info,tower_http=debug`.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "item_requests=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
