//! Axum HTTP endpoints for the item request tracker.
//!
//! Handlers are a thin shell over [`RequestService`](item_requests_core::RequestService):
//!
//! 1. **Extract** query parameters or the JSON body
//! 2. **Call** the service with the untrusted input
//! 3. **Map** the result to a status code and JSON body
//!
//! Validation, timestamps and persistence all live in the service. Errors
//! become an [`AppError`], which renders `{errorType, message}`.
//!
//! # Routes
//!
//! ```text
//! GET    /request?status=&page=   list one page, newest first
//! PUT    /request                 create a pending request
//! PATCH  /request                 change a request's status
//! (same three under /api/request)
//! GET    /health                  liveness
//! GET    /ready                   readiness (pings the store)
//! ```
//!
//! # Example
//!
//! ```
//! use item_requests_core::{RequestService, ServiceConfig};
//! use item_requests_core::environment::SystemClock;
//! use item_requests_testing::InMemoryRequestStore;
//! use item_requests_web::{build_router, AppState};
//! use std::sync::Arc;
//!
//! let service = RequestService::new(
//!     Arc::new(InMemoryRequestStore::new()),
//!     Arc::new(SystemClock),
//!     ServiceConfig::default(),
//! );
//! let _app: axum::Router = build_router(AppState::new(service));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use middleware::{correlation_id, CorrelationId, CORRELATION_ID_HEADER};
pub use routes::build_router;
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
