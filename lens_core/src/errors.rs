//! # Error Types
//!
//! Structured error types for lens_core. The view engine itself never fails;
//! these errors only come from the boundary: loading result files, reading
//! configuration and assembling search requests.
//!
//! ## Example
//!
//! ```rust
//! use lens_core::errors::{LensError, LensResult};
//!
//! fn validate_query(query: &str) -> LensResult<&str> {
//!     let trimmed = query.trim();
//!     if trimmed.is_empty() {
//!         return Err(LensError::invalid_input("query", query, "Query must not be empty"));
//!     }
//!     Ok(trimmed)
//! }
//!
//! assert!(validate_query("   ").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for lens_core operations
pub type LensResult<T> = Result<T, LensError>;

/// Structured error type for boundary operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum LensError {
    /// An input value is invalid (empty query, unknown aspect, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A configuration value failed validation
    #[error("Invalid setting '{setting}': {value} - {reason}")]
    InvalidSetting {
        setting: String,
        value: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// The search service answered with a non-success status
    #[error("Search failed with status '{status}'")]
    SearchFailed { status: String },
}

impl LensError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        LensError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        LensError::MissingField {
            field: field.into(),
        }
    }

    /// Create an InvalidSetting error
    pub fn invalid_setting(setting: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        LensError::InvalidSetting {
            setting: setting.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        LensError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        LensError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Create a SearchFailed error
    pub fn search_failed(status: impl Into<String>) -> Self {
        LensError::SearchFailed {
            status: status.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            LensError::InvalidInput { .. } => "INVALID_INPUT",
            LensError::MissingField { .. } => "MISSING_FIELD",
            LensError::InvalidSetting { .. } => "INVALID_SETTING",
            LensError::FileError { .. } => "FILE_ERROR",
            LensError::SerializationError { .. } => "SERIALIZATION_ERROR",
            LensError::SearchFailed { .. } => "SEARCH_FAILED",
        }
    }
}
