//! Store error types.
//!
//! Backend failures arrive as [`StoreError::Database`], except unique
//! constraint violations which arrive as [`StoreError::Constraint`].
//! Repositories translate the latter into [`StoreError::AlreadyExists`] so
//! callers can branch on it.

use miette::Diagnostic;
use thiserror::Error;

/// Store operation errors.
#[derive(Error, Diagnostic, Debug)]
pub enum StoreError {
    #[error("Entity already exists: {entity_type} with id '{id}'")]
    #[diagnostic(code(blog::store::already_exists))]
    AlreadyExists { entity_type: String, id: String },

    /// A unique constraint rejected the write.
    #[error("Constraint violation: {message}")]
    #[diagnostic(code(blog::store::constraint))]
    Constraint { message: String },

    #[error("Invalid data: {message}")]
    #[diagnostic(code(blog::store::invalid_data))]
    InvalidData { message: String },

    #[error("Database error: {message}")]
    #[diagnostic(code(blog::store::database_error))]
    Database { message: String },

    #[error("Migration error: {message}")]
    #[diagnostic(code(blog::store::migration_error))]
    Migration { message: String },

    #[error("Connection error: {message}")]
    #[diagnostic(
        code(blog::store::connection_error),
        help("Is the database running? Check the BLOG_DATABASE_* settings.")
    )]
    Connection { message: String },
}

impl StoreError {
    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists { .. })
    }

    fn is_unique_violation(err: &sqlx::Error) -> bool {
        err.as_database_error()
            .is_some_and(|db_err| db_err.is_unique_violation())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if Self::is_unique_violation(&e) {
            StoreError::Constraint {
                message: e.to_string(),
            }
        } else {
            StoreError::Database {
                message: e.to_string(),
            }
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        StoreError::Migration {
            message: e.to_string(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
