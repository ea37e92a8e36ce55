use std::sync::PoisonError;
use thiserror::Error;
use crate::database::DatabaseError;

/// Error type for repository operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// SQLite error
    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// PostgreSQL error
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// PostgreSQL pool checkout error
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL pool error: {0}")]
    PostgresPool(String),

    /// Lock error
    #[error("Lock error: {0}")]
    Lock(String),

    /// A stored row could not be read back
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    /// Simulated or otherwise unavailable storage
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl<T> From<PoisonError<T>> for RepositoryError {
    fn from(error: PoisonError<T>) -> Self {
        RepositoryError::Lock(error.to_string())
    }
}

#[cfg(feature = "postgres")]
impl From<deadpool_postgres::PoolError> for RepositoryError {
    fn from(error: deadpool_postgres::PoolError) -> Self {
        RepositoryError::PostgresPool(error.to_string())
    }
}
