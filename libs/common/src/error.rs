//! Custom error types for the common library
//!
//! This module defines the storage error taxonomy shared by the services.
//! Raw sqlx errors are classified here so that callers only ever branch on
//! [`DatabaseError`] variants, never on engine-specific codes.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// SQLSTATE reported by PostgreSQL for a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// A write was rejected by a uniqueness constraint
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// Classify an error returned by a query.
    pub fn from_query(err: SqlxError) -> Self {
        if is_unique_violation(&err) {
            DatabaseError::UniqueViolation(err)
        } else {
            DatabaseError::Query(err)
        }
    }

    /// Whether this error is a uniqueness constraint violation
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DatabaseError::UniqueViolation(_))
    }
}

fn is_unique_violation(err: &SqlxError) -> bool {
    match err {
        SqlxError::Database(db_err) => db_err.code().is_some_and(|code| code == UNIQUE_VIOLATION),
        _ => false,
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
