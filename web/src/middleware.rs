//! Correlation ID middleware.
//!
//! Every request gets a [`CorrelationId`]: the UUID sent in `X-Correlation-ID`,
//! or a fresh one. Handlers can read it from request extensions, the request
//! runs inside an `http_request` span carrying it, and the response echoes it
//! back in the same header.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use std::fmt;
use tracing::Instrument;
use uuid::Uuid;

/// Header name for correlation ID.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Identifier tying one HTTP exchange to its log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CorrelationId(pub Uuid);

impl CorrelationId {
    /// Reuse the caller's id when it is a UUID, otherwise mint one.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let id = headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .unwrap_or_else(Uuid::new_v4);
        Self(id)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The item request operation a method and path resolve to, for log fields.
#[must_use]
pub fn operation_name(method: &Method, path: &str) -> &'static str {
    match path.trim_end_matches('/') {
        "/request" | "/api/request" => match *method {
            Method::GET => "list_requests",
            Method::PUT => "create_request",
            Method::PATCH => "edit_status",
            _ => "unsupported",
        },
        "/health" => "health",
        "/ready" => "readiness",
        _ => "other",
    }
}

/// Attach a [`CorrelationId`] to the request, its span and its response.
///
/// Install with `axum::middleware::from_fn(correlation_id)`.
pub async fn correlation_id(mut req: Request, next: Next) -> Response {
    let id = CorrelationId::from_headers(req.headers());
    req.extensions_mut().insert(id);

    let span = tracing::info_span!(
        "http_request",
        correlation_id = %id,
        operation = operation_name(req.method(), req.uri().path()),
        method = %req.method(),
        uri = %req.uri(),
    );

    let mut response = next.run(req).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, middleware::from_fn, routing::get, Extension, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route(
                "/request",
                get(|Extension(id): Extension<CorrelationId>| async move { id.to_string() }),
            )
            .layer(from_fn(correlation_id))
    }

    fn response_id(response: &Response) -> String {
        response
            .headers()
            .get(CORRELATION_ID_HEADER)
            .expect("Correlation ID header should be present")
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_correlation_id_generated_if_missing() {
        let request = Request::builder().uri("/request").body(Body::empty()).unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert!(Uuid::parse_str(&response_id(&response)).is_ok());
    }

    #[tokio::test]
    async fn test_correlation_id_preserved_and_visible_to_handler() {
        let request_uuid = Uuid::new_v4();
        let request = Request::builder()
            .uri("/request")
            .header(CORRELATION_ID_HEADER, request_uuid.to_string())
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response_id(&response), request_uuid.to_string());

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(body, request_uuid.to_string().as_bytes());
    }

    #[tokio::test]
    async fn test_invalid_uuid_generates_new() {
        let request = Request::builder()
            .uri("/request")
            .header(CORRELATION_ID_HEADER, "not-a-uuid")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        let id = response_id(&response);
        assert!(Uuid::parse_str(&id).is_ok());
        assert_ne!(id, "not-a-uuid");
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(operation_name(&Method::GET, "/request"), "list_requests");
        assert_eq!(operation_name(&Method::PUT, "/api/request/"), "create_request");
        assert_eq!(operation_name(&Method::PATCH, "/api/request"), "edit_status");
        assert_eq!(operation_name(&Method::DELETE, "/request"), "unsupported");
        assert_eq!(operation_name(&Method::GET, "/ready"), "readiness");
        assert_eq!(operation_name(&Method::GET, "/metrics"), "other");
    }
}
