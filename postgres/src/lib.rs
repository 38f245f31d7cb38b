//! `PostgreSQL` request store for the item request tracker.
//!
//! This crate provides a `PostgreSQL`-backed implementation of the
//! `RequestStore` trait from `item-requests-core`. It uses sqlx and supports:
//!
//! - A lazily established, process-wide connection pool
//! - Idempotent schema creation on first use
//! - Atomic single-row status updates (last write wins)
//!
//! # Example
//!
//! ```no_run
//! use item_requests_postgres::{ConnectionSettings, PostgresRequestStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = PostgresRequestStore::new(ConnectionSettings::new("postgres://localhost/item_requests"));
//! assert!(!store.is_connected());
//! // The first query connects and creates the schema; later ones reuse the pool.
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod connector;
pub mod schema;
pub mod store;

pub use connector::{ConnectionSettings, PgConnector};
pub use store::PostgresRequestStore;
