//! Database access layer.
//!
//! One module per dashboard resource. All queries are read-only runtime
//! queries (`sqlx::query_as` + `.bind`, no macros, so builds do not need
//! an offline query cache or a live database). Row structs derive
//! `sqlx::FromRow` and convert into the API models, keeping SQL column
//! shapes out of the wire types.

pub mod materials;
pub mod order_detail;
pub mod orders;
pub mod products;
pub mod recipes;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use crate::config::ApiConfig;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error. The message reaches the client verbatim on 500s.
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    /// A stored value failed to decode into its expected shape.
    #[error("corrupt data: {0}")]
    DataCorruption(String),
}

/// Create the process-wide connection pool.
///
/// Called once at startup and injected through `AppState`; a connection
/// failure here is fatal.
///
/// # Errors
///
/// Returns the underlying `sqlx::Error` when the database is unreachable.
pub async fn create_pool(config: &ApiConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(config.database_url.expose_secret())
        .await
}
