//! Tests for the assembled application router.

#![allow(clippy::expect_used)] // Test code uses expect for clear failure messages

use axum::http::StatusCode;
use axum_test::TestServer;
use item_requests_core::{RequestService, ServiceConfig};
use item_requests_server::build_app;
use item_requests_server::metrics::build_recorder;
use item_requests_testing::helpers::create_body;
use item_requests_testing::{test_clock, InMemoryRequestStore};
use item_requests_web::AppState;
use std::sync::Arc;

fn server() -> TestServer {
    let service = RequestService::new(
        Arc::new(InMemoryRequestStore::new()),
        Arc::new(test_clock()),
        ServiceConfig::default(),
    );
    let handle = build_recorder().expect("recorder should build").handle();
    TestServer::new(build_app(AppState::new(service), handle)).expect("test server should start")
}

#[tokio::test]
async fn test_metrics_endpoint_is_mounted() {
    let server = server();
    let response = server.get("/metrics").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_request_routes_are_mounted() {
    let server = server();

    let created = server
        .put("/api/request")
        .json(&create_body("Jane Doe", "Flashlights"))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);

    let listed = server.get("/request").await;
    assert_eq!(listed.status_code(), StatusCode::OK);
    assert_eq!(listed.json::<serde_json::Value>()["totalCount"], 1);

    assert_eq!(server.get("/health").await.status_code(), StatusCode::OK);
}
