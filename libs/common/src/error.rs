//! Custom error types for the common library
//!
//! This module defines the store error type shared by every service, along
//! with helpers to recognise constraint violations reported by PostgreSQL.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// Name of the constraint the store rejected, if any
    pub fn violated_constraint(&self) -> Option<&str> {
        match self {
            DatabaseError::Query(SqlxError::Database(db_error)) => db_error.constraint(),
            _ => None,
        }
    }

    /// True when a query failed on a UNIQUE or PRIMARY KEY constraint
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::Query(SqlxError::Database(db_error)) if db_error.is_unique_violation()
        )
    }

    /// True when a query referenced a row that does not exist
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::Query(SqlxError::Database(db_error)) if db_error.is_foreign_key_violation()
        )
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
