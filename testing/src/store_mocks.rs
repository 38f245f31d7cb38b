//! In-memory request store testing utilities
//!
//! - [`InMemoryRequestStore`]: `Vec`-backed store with the same ordering and
//!   update semantics as the `PostgreSQL` store
//! - [`FailingRequestStore`]: every call fails, for exercising error paths

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Test utilities document panics where critical

use chrono::{DateTime, Utc};
use item_requests_core::store::StoreFuture;
use item_requests_core::{
    ItemRequest, PageWindow, RequestDraft, RequestId, RequestStatus, RequestStore, StoreError,
};
use std::sync::{Arc, RwLock};

/// In-memory request store for fast, deterministic testing.
///
/// Records are kept in insertion order. Listing sorts newest first by
/// creation time and, for equal times, by insertion order (later first).
///
/// # Example
///
/// ```
/// use item_requests_testing::{test_clock, InMemoryRequestStore};
/// use item_requests_core::{NewItemRequest, RequestDraft, RequestStore};
/// use item_requests_core::environment::Clock;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryRequestStore::new();
/// let draft = RequestDraft::pending(
///     NewItemRequest {
///         requestor_name: "Ada Lovelace".to_string(),
///         item_requested: "Standing desk".to_string(),
///     },
///     test_clock().now(),
/// );
///
/// let created = store.insert(draft).await?;
/// assert_eq!(store.get(created.id), Some(created));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryRequestStore {
    records: Arc<RwLock<Vec<ItemRequest>>>,
}

impl InMemoryRequestStore {
    /// Create a new empty in-memory store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored requests
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Check if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().unwrap().is_empty()
    }

    /// Look up a request by id, bypassing the trait
    #[must_use]
    pub fn get(&self, id: RequestId) -> Option<ItemRequest> {
        self.records
            .read()
            .unwrap()
            .iter()
            .find(|record| record.id == id)
            .cloned()
    }

    /// Snapshot of every stored request in insertion order
    #[must_use]
    pub fn all(&self) -> Vec<ItemRequest> {
        self.records.read().unwrap().clone()
    }

    fn matching(&self, status: Option<RequestStatus>) -> Vec<ItemRequest> {
        self.records
            .read()
            .unwrap()
            .iter()
            .filter(|record| status.is_none_or(|s| record.status == s))
            .cloned()
            .collect()
    }
}

impl RequestStore for InMemoryRequestStore {
    fn insert(&self, draft: RequestDraft) -> StoreFuture<'_, ItemRequest> {
        Box::pin(async move {
            let created = draft.into_request(RequestId::new());
            self.records.write().unwrap().push(created.clone());
            Ok(created)
        })
    }

    fn count(&self, status: Option<RequestStatus>) -> StoreFuture<'_, u64> {
        Box::pin(async move { Ok(self.matching(status).len() as u64) })
    }

    fn find_page(
        &self,
        status: Option<RequestStatus>,
        window: PageWindow,
    ) -> StoreFuture<'_, Vec<ItemRequest>> {
        Box::pin(async move {
            let mut records = self.matching(status);
            records.reverse();
            records.sort_by(|a, b| b.request_created_date.cmp(&a.request_created_date));

            let skip = usize::try_from(window.skip).unwrap_or(usize::MAX);
            let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);
            Ok(records.into_iter().skip(skip).take(limit).collect())
        })
    }

    fn update_status(
        &self,
        id: RequestId,
        status: RequestStatus,
        edited_at: DateTime<Utc>,
    ) -> StoreFuture<'_, Option<ItemRequest>> {
        Box::pin(async move {
            let mut records = self.records.write().unwrap();
            Ok(records.iter_mut().find(|record| record.id == id).map(|record| {
                record.status = status;
                record.last_edited_date = record.last_edited_date.max(edited_at);
                record.clone()
            }))
        })
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async { Ok(()) })
    }
}

/// Store whose every operation fails with the configured error.
///
/// # Example
///
/// ```
/// use item_requests_testing::FailingRequestStore;
/// use item_requests_core::{RequestStore, StoreError};
///
/// # async fn example() {
/// let store = FailingRequestStore::unavailable();
/// assert!(matches!(store.ping().await, Err(StoreError::Unavailable(_))));
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct FailingRequestStore {
    error: StoreError,
}

impl FailingRequestStore {
    /// Fail every call with `error`.
    #[must_use]
    pub const fn new(error: StoreError) -> Self {
        Self { error }
    }

    /// Fail every call as if the database were down.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::new(StoreError::Unavailable("connection refused".to_string()))
    }

    fn fail<T: Send + 'static>(&self) -> StoreFuture<'_, T> {
        let error = self.error.clone();
        Box::pin(async move { Err(error) })
    }
}

impl RequestStore for FailingRequestStore {
    fn insert(&self, _draft: RequestDraft) -> StoreFuture<'_, ItemRequest> {
        self.fail()
    }

    fn count(&self, _status: Option<RequestStatus>) -> StoreFuture<'_, u64> {
        self.fail()
    }

    fn find_page(
        &self,
        _status: Option<RequestStatus>,
        _window: PageWindow,
    ) -> StoreFuture<'_, Vec<ItemRequest>> {
        self.fail()
    }

    fn update_status(
        &self,
        _id: RequestId,
        _status: RequestStatus,
        _edited_at: DateTime<Utc>,
    ) -> StoreFuture<'_, Option<ItemRequest>> {
        self.fail()
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        self.fail()
    }
}
