//! # Store Error Types
//!
//! Error types for persistence and store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  CoreError (rule violated)   sqlx / io / serde_json (backend failed)   │
//! │       │                                │                                │
//! │       └──────────────┬─────────────────┘                                │
//! │                      ▼                                                  │
//! │  StoreError (this module) ← Adds context and categorization            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in CLI) ← Code + operator-facing message                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use thiserror::Error;

use grocer_core::CoreError;

/// Store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A business rule rejected the operation. State is unchanged.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Reading or writing a collection file failed.
    ///
    /// ## When This Occurs
    /// - Data directory not writable
    /// - Disk full
    /// - Rename of the temporary file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A persisted collection is not valid JSON for its entity shape.
    #[error("Malformed {collection} data: {source}")]
    Serialization {
        collection: String,
        #[source]
        source: serde_json::Error,
    },

    /// SQLite query or connection failure.
    #[error("Database error: {0}")]
    Database(String),

    /// Migration failed.
    ///
    /// ## When This Occurs
    /// - Invalid SQL in migration
    /// - Migration version conflict
    #[error("Migration failed: {0}")]
    Migration(String),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn serialization(collection: impl Into<String>, source: serde_json::Error) -> Self {
        StoreError::Serialization {
            collection: collection.into(),
            source,
        }
    }

    /// True when a business rule, not the backend, rejected the operation.
    pub fn is_rejection(&self) -> bool {
        matches!(self, StoreError::Core(_))
    }
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database     → StoreError::Database(message)
/// sqlx::Error::PoolTimedOut → StoreError::Database("pool timed out")
/// Other                     → StoreError::Database(err.to_string())
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => StoreError::Database(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => StoreError::Database("connection pool timed out".to_string()),
            sqlx::Error::PoolClosed => StoreError::Database("connection pool is closed".to_string()),
            _ => StoreError::Database(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Migration(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
