//! # API Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Grocer POS                             │
//! │                                                                         │
//! │  grocer checkout --item p1:3                                           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<String, ApiError>                                        │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Storage Error? ─── StoreError::Io(..) ───────────┐ (logged)     │  │
//! │  │         │                                          │             │  │
//! │  │         ▼                                          ▼             │  │
//! │  │  Rule Violated? ─── CoreError::EmptyOrder ────── ApiError ──────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────── stdout ───────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr: error: [EMPTY_ORDER] Order has no items                       │
//! │  --json: {"code":"EMPTY_ORDER","message":"Order has no items"}         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::error;

use crate::config::ConfigError;
use grocer_core::CoreError;
use grocer_store::StoreError;

/// Error returned from CLI commands.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for scripts
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product, supplier or user id not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Checkout with an empty cart
    EmptyOrder,

    /// Strict stock policy refused an oversell
    InsufficientStock,

    /// Operator role may not perform the action
    PermissionDenied,

    /// Persistence backend failed
    StorageError,

    /// Cart limits exceeded
    CartError,

    /// Configuration could not be loaded
    ConfigError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::EmptyOrder => "EMPTY_ORDER",
            ErrorCode::InsufficientStock => "INSUFFICIENT_STOCK",
            ErrorCode::PermissionDenied => "PERMISSION_DENIED",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::CartError => "CART_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a storage error with a generic message.
    pub fn storage(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::StorageError, message)
    }
}

/// Converts store errors to API errors.
///
/// Backend details are logged, not shown.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Core(e) => e.into(),
            StoreError::Io { path, source } => {
                error!(path = %path.display(), error = %source, "Storage I/O failed");
                ApiError::storage("Could not read or write store data")
            }
            StoreError::Serialization { collection, source } => {
                error!(collection = %collection, error = %source, "Stored data is malformed");
                ApiError::storage(format!("Stored {} data is unreadable", collection))
            }
            StoreError::Database(e) => {
                error!(error = %e, "Database operation failed");
                ApiError::storage("Database operation failed")
            }
            StoreError::Migration(e) => {
                error!(error = %e, "Database migration failed");
                ApiError::storage("Database migration failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::ProductNotFound(_)
            | CoreError::SupplierNotFound(_)
            | CoreError::UserNotFound(_) => ErrorCode::NotFound,
            CoreError::EmptyOrder => ErrorCode::EmptyOrder,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::CartTooLarge { .. } | CoreError::NotInCart(_) => ErrorCode::CartError,
            CoreError::QuantityTooLarge { .. } | CoreError::Validation(_) => {
                ErrorCode::ValidationError
            }
            CoreError::PermissionDenied { .. } => ErrorCode::PermissionDenied,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        error!(error = %err, "Failed to encode output");
        ApiError::new(ErrorCode::ValidationError, "Could not encode output as JSON")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}
