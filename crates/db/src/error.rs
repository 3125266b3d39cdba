//! Typed error type for the db crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// No row matched the requested key.
    #[error("{0}")]
    NotFound(String),

    /// The caller supplied input the query cannot be built from.
    #[error("{0}")]
    BadRequest(String),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}
