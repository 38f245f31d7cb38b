//! Router configuration.

use axum::{middleware::from_fn, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{create_request, edit_status, health_check, list_requests, readiness_check};
use crate::middleware::correlation_id;
use crate::AppState;

/// Build the complete Axum router.
///
/// The request routes are mounted twice, at `/request` and `/api/request`.
/// The caller may add further routes (such as `/metrics`) to the result.
pub fn build_router(state: AppState) -> Router {
    let request_routes = Router::new().route(
        "/request",
        get(list_requests).put(create_request).patch(edit_status),
    );

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .merge(request_routes.clone())
        .nest("/api", request_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(from_fn(correlation_id))
        .with_state(state)
}
