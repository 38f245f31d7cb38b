//! `PostgreSQL` implementation of [`RequestStore`].

use chrono::{DateTime, Utc};
use item_requests_core::store::StoreFuture;
use item_requests_core::{
    ItemRequest, PageWindow, RequestDraft, RequestId, RequestStatus, RequestStore, StoreError,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::connector::{ConnectionSettings, PgConnector};

/// `PostgreSQL`-backed request store.
///
/// Cheap to clone; clones share one [`PgConnector`] and therefore one pool.
///
/// # Example
///
/// ```no_run
/// use item_requests_postgres::PostgresRequestStore;
/// use item_requests_core::RequestStore;
///
/// # async fn example(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let store = PostgresRequestStore::from_pool(pool);
/// let pending = store.count(Some(item_requests_core::RequestStatus::Pending)).await?;
/// println!("Pending requests: {pending}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PostgresRequestStore {
    connector: Arc<PgConnector>,
}

impl PostgresRequestStore {
    /// A store that connects lazily with `settings`.
    #[must_use]
    pub fn new(settings: ConnectionSettings) -> Self {
        Self::with_connector(Arc::new(PgConnector::new(settings)))
    }

    /// A store over an existing pool.
    #[must_use]
    pub fn from_pool(pool: sqlx::PgPool) -> Self {
        Self::with_connector(Arc::new(PgConnector::from_pool(pool)))
    }

    /// A store sharing an existing connector.
    #[must_use]
    pub const fn with_connector(connector: Arc<PgConnector>) -> Self {
        Self { connector }
    }

    /// Whether the underlying pool has been established.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connector.is_connected()
    }

    /// Close the underlying pool.
    pub async fn close(&self) {
        self.connector.close().await;
    }

    async fn insert_row(&self, draft: RequestDraft) -> Result<ItemRequest, StoreError> {
        let pool = self.connector.pool().await?;
        let id = RequestId::new();

        let row: ItemRequestRow = sqlx::query_as(
            r"
            INSERT INTO item_requests (
                id, requestor_name, item_requested,
                request_created_date, last_edited_date, status
            ) VALUES ($1, $2, $3, $4, $4, $5)
            RETURNING id, requestor_name, item_requested,
                      request_created_date, last_edited_date, status
            ",
        )
        .bind(id.as_uuid())
        .bind(&draft.requestor_name)
        .bind(&draft.item_requested)
        .bind(draft.created_at)
        .bind(draft.status.as_str())
        .fetch_one(pool)
        .await
        .map_err(|e| map_sqlx_error("insert", &e))?;

        let created = row.into_request()?;
        tracing::debug!(id = %created.id, "Inserted item request");
        Ok(created)
    }

    async fn count_rows(&self, status: Option<RequestStatus>) -> Result<u64, StoreError> {
        let pool = self.connector.pool().await?;

        let (count,): (i64,) = sqlx::query_as(
            r"
            SELECT COUNT(*)
            FROM item_requests
            WHERE ($1::TEXT IS NULL OR status = $1)
            ",
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_one(pool)
        .await
        .map_err(|e| map_sqlx_error("count", &e))?;

        u64::try_from(count).map_err(|_| StoreError::CorruptRecord(format!("negative count {count}")))
    }

    async fn page_rows(
        &self,
        status: Option<RequestStatus>,
        window: PageWindow,
    ) -> Result<Vec<ItemRequest>, StoreError> {
        let pool = self.connector.pool().await?;

        let rows: Vec<ItemRequestRow> = sqlx::query_as(
            r"
            SELECT id, requestor_name, item_requested,
                   request_created_date, last_edited_date, status
            FROM item_requests
            WHERE ($1::TEXT IS NULL OR status = $1)
            ORDER BY request_created_date DESC, seq DESC
            OFFSET $2
            LIMIT $3
            ",
        )
        .bind(status.map(|s| s.as_str()))
        .bind(i64::try_from(window.skip).unwrap_or(i64::MAX))
        .bind(i64::try_from(window.limit).unwrap_or(i64::MAX))
        .fetch_all(pool)
        .await
        .map_err(|e| map_sqlx_error("find_page", &e))?;

        rows.into_iter().map(ItemRequestRow::into_request).collect()
    }

    async fn update_row(
        &self,
        id: RequestId,
        status: RequestStatus,
        edited_at: DateTime<Utc>,
    ) -> Result<Option<ItemRequest>, StoreError> {
        let pool = self.connector.pool().await?;

        let row: Option<ItemRequestRow> = sqlx::query_as(
            r"
            UPDATE item_requests
            SET status = $2,
                last_edited_date = GREATEST(last_edited_date, $3)
            WHERE id = $1
            RETURNING id, requestor_name, item_requested,
                      request_created_date, last_edited_date, status
            ",
        )
        .bind(id.as_uuid())
        .bind(status.as_str())
        .bind(edited_at)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_sqlx_error("update_status", &e))?;

        row.map(ItemRequestRow::into_request).transpose()
    }

    async fn ping_database(&self) -> Result<(), StoreError> {
        let pool = self.connector.pool().await?;
        sqlx::query("SELECT 1")
            .execute(pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(())
    }
}

impl RequestStore for PostgresRequestStore {
    fn insert(&self, draft: RequestDraft) -> StoreFuture<'_, ItemRequest> {
        Box::pin(timed("insert", self.insert_row(draft)))
    }

    fn count(&self, status: Option<RequestStatus>) -> StoreFuture<'_, u64> {
        Box::pin(timed("count", self.count_rows(status)))
    }

    fn find_page(
        &self,
        status: Option<RequestStatus>,
        window: PageWindow,
    ) -> StoreFuture<'_, Vec<ItemRequest>> {
        Box::pin(timed("find_page", self.page_rows(status, window)))
    }

    fn update_status(
        &self,
        id: RequestId,
        status: RequestStatus,
        edited_at: DateTime<Utc>,
    ) -> StoreFuture<'_, Option<ItemRequest>> {
        Box::pin(timed("update_status", self.update_row(id, status, edited_at)))
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(timed("ping", self.ping_database()))
    }
}

/// Raw row as selected from `item_requests`.
#[derive(Debug, sqlx::FromRow)]
struct ItemRequestRow {
    id: Uuid,
    requestor_name: String,
    item_requested: String,
    request_created_date: DateTime<Utc>,
    last_edited_date: DateTime<Utc>,
    status: String,
}

impl ItemRequestRow {
    fn into_request(self) -> Result<ItemRequest, StoreError> {
        let status = RequestStatus::parse(&self.status).ok_or_else(|| {
            StoreError::CorruptRecord(format!("unknown status `{}` for {}", self.status, self.id))
        })?;

        Ok(ItemRequest {
            id: RequestId::from_uuid(self.id),
            requestor_name: self.requestor_name,
            item_requested: self.item_requested,
            request_created_date: self.request_created_date,
            last_edited_date: self.last_edited_date,
            status,
        })
    }
}

async fn timed<T>(
    operation: &'static str,
    fut: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, StoreError> {
    let start = Instant::now();
    let result = fut.await;

    metrics::histogram!("item_requests_store_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
    if let Err(e) = &result {
        metrics::counter!("item_requests_store_errors_total", "operation" => operation).increment(1);
        tracing::warn!(operation, error = %e, "Store operation failed");
    }

    result
}

fn map_sqlx_error(operation: &str, e: &sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreError::Unavailable(format!("{operation}: {e}")),
        _ => StoreError::DatabaseError(format!("{operation}: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> ItemRequestRow {
        let now = Utc::now();
        ItemRequestRow {
            id: Uuid::new_v4(),
            requestor_name: "Ada Lovelace".to_string(),
            item_requested: "Standing desk".to_string(),
            request_created_date: now,
            last_edited_date: now,
            status: status.to_string(),
        }
    }

    #[test]
    fn row_decodes_known_status() {
        let request = row("completed").into_request();
        assert!(matches!(request, Ok(r) if r.status == RequestStatus::Completed));
    }

    #[test]
    fn row_with_unknown_status_is_corrupt() {
        assert!(matches!(row("archived").into_request(), Err(StoreError::CorruptRecord(_))));
    }

    #[test]
    fn pool_errors_map_to_unavailable() {
        assert!(matches!(
            map_sqlx_error("count", &sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            map_sqlx_error("count", &sqlx::Error::RowNotFound),
            StoreError::DatabaseError(_)
        ));
    }

    #[test]
    fn new_store_is_lazy() {
        let store = PostgresRequestStore::new(ConnectionSettings::new("postgres://localhost/none"));
        assert!(!store.is_connected());
    }
}
