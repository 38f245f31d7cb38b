//! Persistence abstraction for item requests.
//!
//! # Implementations
//!
//! - `PostgresRequestStore` (in `item-requests-postgres`): production store
//! - `InMemoryRequestStore` (in `item-requests-testing`): fast, deterministic tests
//!
//! # Dyn Compatibility
//!
//! Methods return `Pin<Box<dyn Future>>` rather than using `async fn` so the
//! service can hold an `Arc<dyn RequestStore>`.

use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

use crate::query::PageWindow;
use crate::request::{ItemRequest, RequestDraft, RequestId, RequestStatus};

/// Boxed future returned by [`RequestStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Errors raised by a [`RequestStore`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached or a connection could not be established.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A query failed.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// A stored row could not be decoded into an [`ItemRequest`].
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
}

/// Storage for item requests.
///
/// Implementations must be `Send + Sync`; one instance is shared by every
/// in-flight HTTP request.
pub trait RequestStore: Send + Sync {
    /// Persist a new request and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    fn insert(&self, draft: RequestDraft) -> StoreFuture<'_, ItemRequest>;

    /// Count requests, optionally only those with `status`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query fails.
    fn count(&self, status: Option<RequestStatus>) -> StoreFuture<'_, u64>;

    /// Load one window of requests ordered newest first.
    ///
    /// Ties on creation time are broken by insertion order, later first.
    /// A window past the end yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query fails.
    fn find_page(
        &self,
        status: Option<RequestStatus>,
        window: PageWindow,
    ) -> StoreFuture<'_, Vec<ItemRequest>>;

    /// Atomically set `status` and bump the last-edited time.
    ///
    /// The stored last-edited time becomes the later of `edited_at` and its
    /// current value, so it never moves backwards. Concurrent edits to one
    /// record are last-write-wins.
    ///
    /// Returns `None` if no record has this id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    fn update_status(
        &self,
        id: RequestId,
        status: RequestStatus,
        edited_at: DateTime<Utc>,
    ) -> StoreFuture<'_, Option<ItemRequest>>;

    /// Check that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if it is not.
    fn ping(&self) -> StoreFuture<'_, ()>;
}
