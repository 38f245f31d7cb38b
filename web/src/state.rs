//! Application state for Axum handlers.

use item_requests_core::RequestService;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The request service every handler delegates to.
    pub service: RequestService,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub const fn new(service: RequestService) -> Self {
        Self { service }
    }
}
