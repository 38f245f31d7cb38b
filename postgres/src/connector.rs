//! Lazily established, shared connection pool.
//!
//! Connecting is expensive, so the pool is created at most once per
//! [`PgConnector`] and reused by every later call. The schema is ensured once
//! on the same path. Concurrent first callers wait on a single
//! initialization instead of racing to open their own pools.

use item_requests_core::StoreError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::schema;

/// How to reach the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// `PostgreSQL` connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of idle connections in the pool
    pub min_connections: u32,
    /// How long to wait for a connection before giving up
    pub connect_timeout: Duration,
}

impl ConnectionSettings {
    /// Settings for `url` with default pool sizing.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 0,
            connect_timeout: Duration::from_secs(30),
        }
    }
}

/// Owner of the process-wide pool.
///
/// Starts disconnected. The first call to [`PgConnector::pool`] connects and
/// creates the schema; subsequent calls return the same pool.
#[derive(Debug)]
pub struct PgConnector {
    settings: Option<ConnectionSettings>,
    pool: OnceCell<PgPool>,
    schema_ready: OnceCell<()>,
}

impl PgConnector {
    /// A connector that will connect on first use.
    #[must_use]
    pub fn new(settings: ConnectionSettings) -> Self {
        Self {
            settings: Some(settings),
            pool: OnceCell::new(),
            schema_ready: OnceCell::new(),
        }
    }

    /// A connector around an existing pool.
    ///
    /// The schema is still ensured on first use.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            settings: None,
            pool: OnceCell::new_with(Some(pool)),
            schema_ready: OnceCell::new(),
        }
    }

    /// Whether a pool has been established.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.pool.initialized()
    }

    /// The shared pool, connecting and creating the schema if needed.
    ///
    /// A failed attempt leaves the connector disconnected; the next call
    /// tries again.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the database cannot be reached,
    /// or [`StoreError::DatabaseError`] if schema creation fails.
    pub async fn pool(&self) -> Result<&PgPool, StoreError> {
        let pool = self.pool.get_or_try_init(|| self.connect()).await?;
        self.schema_ready
            .get_or_try_init(|| schema::ensure_schema(pool))
            .await?;
        Ok(pool)
    }

    /// Close the pool if one was established.
    pub async fn close(&self) {
        if let Some(pool) = self.pool.get() {
            pool.close().await;
            tracing::info!("PostgreSQL pool closed");
        }
    }

    async fn connect(&self) -> Result<PgPool, StoreError> {
        let settings = self.settings.as_ref().ok_or_else(|| {
            StoreError::Unavailable("no connection settings configured".to_string())
        })?;

        tracing::info!(
            max_connections = settings.max_connections,
            min_connections = settings.min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(settings.connect_timeout)
            .connect(&settings.url)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to connect to PostgreSQL");
                StoreError::Unavailable(e.to_string())
            })?;

        metrics::counter!("item_requests_store_connections_total").increment(1);
        tracing::info!("PostgreSQL pool established");
        Ok(pool)
    }
}
