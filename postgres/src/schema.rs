//! Table definition for item requests.
//!
//! `seq` is internal: it breaks ties between requests created in the same
//! microsecond so listing order matches insertion order.

use item_requests_core::StoreError;
use sqlx::PgPool;

const STATEMENTS: [&str; 3] = [
    r"
    CREATE TABLE IF NOT EXISTS item_requests (
        id UUID PRIMARY KEY,
        seq BIGSERIAL NOT NULL,
        requestor_name TEXT NOT NULL CHECK (char_length(requestor_name) BETWEEN 3 AND 30),
        item_requested TEXT NOT NULL CHECK (char_length(item_requested) BETWEEN 2 AND 100),
        request_created_date TIMESTAMPTZ NOT NULL,
        last_edited_date TIMESTAMPTZ NOT NULL,
        status TEXT NOT NULL CHECK (status IN ('pending', 'approved', 'completed', 'rejected')),
        CHECK (last_edited_date >= request_created_date)
    )
    ",
    r"
    CREATE INDEX IF NOT EXISTS idx_item_requests_created
        ON item_requests (request_created_date DESC, seq DESC)
    ",
    r"
    CREATE INDEX IF NOT EXISTS idx_item_requests_status_created
        ON item_requests (status, request_created_date DESC, seq DESC)
    ",
];

/// Create the table and indexes if they do not exist.
///
/// # Errors
///
/// Returns [`StoreError::DatabaseError`] if any statement fails.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    for statement in STATEMENTS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| StoreError::DatabaseError(format!("Schema setup failed: {e}")))?;
    }

    tracing::debug!("item_requests schema ready");
    Ok(())
}
