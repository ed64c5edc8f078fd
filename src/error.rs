//! Error types for the catalog core
//!
//! This module defines error types using thiserror for ergonomic error handling.
//! Errors are categorized by domain (validation, storage, migration) so callers
//! can distinguish "reject the input" from "the store is broken".
//!
//! Validation errors are raised before any storage access, so a rejected write
//! never leaves partial state behind. A vanished book id during update/delete is
//! not an error at all: those operations report `Ok(false)` ("nothing to do").

use thiserror::Error;

/// Result type alias using our CatalogError type
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Main error type for the catalog core
#[derive(Error, Debug)]
pub enum CatalogError {
    // ===== Validation =====

    /// A required field was blank after trimming
    #[error("missing required field: {field}")]
    Validation {
        /// Name of the offending field
        field: &'static str,
    },

    // ===== Lookups that require presence =====

    /// Book id does not exist in the store
    #[error("book not found: {0}")]
    BookNotFound(i64),

    /// Location id does not exist (dangling tree reference)
    #[error("location not found: {0}")]
    LocationNotFound(i64),

    // ===== Storage =====

    /// Schema migration could not be applied
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// Filesystem operation failed (database directory)
    #[error("file I/O error: {0}")]
    FileIoError(String),

    /// Underlying sqlx error
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl CatalogError {
    /// True for errors caused by caller input rather than store state
    pub fn is_validation(&self) -> bool {
        matches!(self, CatalogError::Validation { .. })
    }
}
