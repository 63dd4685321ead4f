//! Error types for the registrant store.

use thiserror::Error;

/// Errors surfaced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A UNIQUE constraint on email, phone, or link was violated.
    #[error("unique constraint violated")]
    Conflict,

    /// Any other database failure.
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// Schema migration failure at startup.
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict,
            _ => StoreError::Database(err),
        }
    }
}
