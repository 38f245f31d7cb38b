//! The request service: validation, timestamps and store calls.
//!
//! Every operation follows the same shape:
//!
//! 1. Run untrusted input through a [`Validator`](crate::validation::Validator)
//! 2. Stamp time from the injected [`Clock`]
//! 3. Make one or two store calls
//! 4. Record metrics and map failures into [`RequestError`]

use serde_json::Value;
use std::sync::Arc;

use crate::environment::Clock;
use crate::error::{RequestError, Result};
use crate::query::{ListQuery, Page, DEFAULT_PAGE_SIZE};
use crate::request::{ItemRequest, RequestDraft};
use crate::store::RequestStore;
use crate::validation::{validate_create, validate_edit_status};

/// Tunables for [`RequestService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Records per listing page; at least 1.
    pub page_size: u32,
}

impl ServiceConfig {
    /// Config with the given page size, raised to 1 if zero.
    #[must_use]
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Orchestrates the create, list and edit-status operations.
///
/// Cheap to clone; clones share the same store and clock.
#[derive(Clone)]
pub struct RequestService {
    store: Arc<dyn RequestStore>,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

impl RequestService {
    /// Create a service over the given store and clock.
    #[must_use]
    pub fn new(store: Arc<dyn RequestStore>, clock: Arc<dyn Clock>, config: ServiceConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Validate and persist a new request in the `pending` state.
    ///
    /// Any `status` in `input` is ignored.
    ///
    /// # Errors
    ///
    /// - [`RequestError::InvalidInput`] if validation fails; nothing is persisted
    /// - [`RequestError::StorageFailure`] if the insert fails
    #[tracing::instrument(skip(self, input))]
    pub async fn create_request(&self, input: &Value) -> Result<ItemRequest> {
        let result = self.try_create(input).await;

        match &result {
            Ok(created) => {
                metrics::counter!("item_requests_created_total").increment(1);
                tracing::info!(id = %created.id, "Item request created");
            }
            Err(err) => record_failure("create", err),
        }
        result
    }

    /// List one page of requests, newest first.
    ///
    /// `total_count` covers every record matching the filter, not just this page.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::StorageFailure`] if either store call fails.
    #[tracing::instrument(skip(self), fields(page = query.page.get()))]
    pub async fn list_requests(&self, query: ListQuery) -> Result<Page<ItemRequest>> {
        let result = self.try_list(query).await;

        match &result {
            Ok(page) => tracing::debug!(
                returned = page.data.len(),
                total_count = page.total_count,
                "Listed item requests"
            ),
            Err(err) => record_failure("list", err),
        }
        result
    }

    /// Validate and apply a status edit.
    ///
    /// # Errors
    ///
    /// - [`RequestError::InvalidInput`] if `id` or `status` is malformed
    /// - [`RequestError::NotFound`] if no record has the id; nothing is mutated
    /// - [`RequestError::StorageFailure`] if the update fails
    #[tracing::instrument(skip(self, input))]
    pub async fn edit_status(&self, input: &Value) -> Result<ItemRequest> {
        let result = self.try_edit_status(input).await;

        match &result {
            Ok(updated) => {
                metrics::counter!(
                    "item_requests_status_edits_total",
                    "status" => updated.status.as_str()
                )
                .increment(1);
                tracing::info!(id = %updated.id, status = %updated.status, "Item request status changed");
            }
            Err(err) => record_failure("edit_status", err),
        }
        result
    }

    async fn try_create(&self, input: &Value) -> Result<ItemRequest> {
        let input = validate_create(input)?;
        let draft = RequestDraft::pending(input, self.clock.now());
        Ok(self.store.insert(draft).await?)
    }

    async fn try_list(&self, query: ListQuery) -> Result<Page<ItemRequest>> {
        let status = query.filter.status();
        let window = query.page.window(self.config.page_size);

        let total_count = self.store.count(status).await?;
        let data = self.store.find_page(status, window).await?;

        Ok(Page { data, total_count })
    }

    async fn try_edit_status(&self, input: &Value) -> Result<ItemRequest> {
        let edit = validate_edit_status(input)?;
        self.store
            .update_status(edit.id, edit.status, self.clock.now())
            .await?
            .ok_or(RequestError::NotFound(edit.id))
    }

    /// Check that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::StorageFailure`] if it is not.
    pub async fn ping(&self) -> Result<()> {
        Ok(self.store.ping().await?)
    }
}

fn record_failure(operation: &'static str, err: &RequestError) {
    metrics::counter!(
        "item_requests_failures_total",
        "operation" => operation,
        "error_type" => err.error_type().as_str()
    )
    .increment(1);

    if err.is_client_error() {
        tracing::debug!(operation, error = %err, "Rejected item request operation");
    } else {
        tracing::error!(operation, error = %err, "Item request operation failed");
    }
}
