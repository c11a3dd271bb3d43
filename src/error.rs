//! Error types for the persistence layer.

use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while talking to the store
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StoreError {
    /// Query, connection or transaction failure in PostgreSQL
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed at startup
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}
