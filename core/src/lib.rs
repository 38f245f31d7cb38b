//! # Item Requests Core
//!
//! Domain types and the request lifecycle for the item request tracker.
//!
//! A requester submits a name and an item; staff move each request through a
//! fixed set of statuses; a paginated, filterable listing shows the results.
//! This crate holds everything that does not touch the network or a database:
//!
//! - **Types**: [`ItemRequest`], [`RequestId`], [`RequestStatus`]
//! - **Validation**: untrusted JSON in, normalized input or a [`ValidationError`] out
//! - **Query**: status filter and 1-based page parsing, skip/limit math
//! - **Store**: the [`RequestStore`] trait implemented by the `postgres` and `testing` crates
//! - **Service**: [`RequestService`], which validates, stamps time and calls the store
//!
//! ## Example
//!
//! ```ignore
//! use item_requests_core::{RequestService, ServiceConfig};
//! use item_requests_core::environment::SystemClock;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let service = RequestService::new(store, Arc::new(SystemClock), ServiceConfig::default());
//!
//! let created = service
//!     .create_request(&json!({ "requestorName": "Ada Lovelace", "itemRequested": "Standing desk" }))
//!     .await?;
//! assert_eq!(created.status, RequestStatus::Pending);
//! ```

pub mod error;
pub mod query;
pub mod request;
pub mod service;
pub mod store;
pub mod validation;

pub use error::{ErrorType, RequestError};
pub use query::{ListQuery, Page, PageNumber, PageWindow, StatusFilter, DEFAULT_PAGE_SIZE};
pub use request::{ItemRequest, NewItemRequest, RequestDraft, RequestId, RequestStatus, StatusEdit};
pub use service::{RequestService, ServiceConfig};
pub use store::{RequestStore, StoreError};
pub use validation::{
    is_valid_id, is_valid_status, validate_create, validate_edit_status, ValidationError,
    Validator,
};

// Re-export commonly used types
pub use chrono::{DateTime, Utc};

/// Environment module - injected dependencies.
///
/// Time is the only ambient dependency of the service; it is abstracted so
/// tests can pin or step it.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use item_requests_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let before = clock.now();
    /// assert!(clock.now() >= before);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall-clock time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
