//! # API Error Type
//!
//! Unified error type for console commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Console                            │
//! │                                                                         │
//! │  Command Function                                                       │
//! │  Result<T, ApiError>                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Store Error? ──── StoreError::Io { path, .. } ──────┐                 │
//! │         │                                             │                 │
//! │         ▼                                             ▼                 │
//! │  Rule Error? ───── CoreError::DuplicateImei ────── ApiError ─────────► │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Success ─────────────────────────────────────────────────────────────► │
//! │                                                                         │
//! │  The shell prints `message`; `code` drives the follow-up prompt         │
//! │  (NOT_FOUND offers to search the other pools).                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use equip_core::{CoreError, ValidationError};
use equip_store::StoreError;
use serde::Serialize;

/// API error returned from console commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "DUPLICATE",
///   "message": "IMEI 123 already exists in the active pool (branch альфа)"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unit or snapshot not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// IMEI already tracked
    Duplicate,

    /// Snapshot could not be read or written
    StorageError,

    /// Saving refused to keep unloaded data on disk
    Protected,

    /// Internal error
    Internal,
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
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::NotFound, message)
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::NotFound
    }

    pub fn is_protected(&self) -> bool {
        self.code == ErrorCode::Protected
    }
}

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { location } => {
                ApiError::not_found(format!("No saved data at {location}"))
            }
            StoreError::Snapshot(e) => {
                ApiError::new(ErrorCode::StorageError, format!("Saved data is invalid: {e}"))
            }
            StoreError::Protected { location, .. } => ApiError::new(
                ErrorCode::Protected,
                format!(
                    "Not saved: the data in {location} could not be loaded at startup. \
                     Use load to retry or save to move it aside and overwrite it."
                ),
            ),
            StoreError::Io { path, source } => {
                // Log the actual error but return a generic message
                tracing::error!(path = %path.display(), error = %source, "File access failed");
                ApiError::new(
                    ErrorCode::StorageError,
                    format!("Could not access {}", path.display()),
                )
            }
            StoreError::Csv { path, source } => {
                tracing::error!(path = %path.display(), error = %source, "CSV encoding failed");
                ApiError::new(
                    ErrorCode::StorageError,
                    format!("{} is not a readable CSV table", path.display()),
                )
            }
            StoreError::Json { path, source } => {
                tracing::error!(path = %path.display(), error = %source, "JSON encoding failed");
                ApiError::new(
                    ErrorCode::StorageError,
                    format!("{} is not a readable JSON document", path.display()),
                )
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DuplicateImei { .. } => ApiError::new(ErrorCode::Duplicate, err.to_string()),
            CoreError::UnitNotFound { .. } => ApiError::not_found(err.to_string()),
            CoreError::Validation(e) => ApiError::from(e),
            CoreError::Snapshot(e) => {
                ApiError::new(ErrorCode::StorageError, format!("Saved data is invalid: {e}"))
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use equip_core::{Field, Pool};
    use std::path::PathBuf;

    #[test]
    fn test_core_error_codes() {
        let duplicate = ApiError::from(CoreError::DuplicateImei {
            imei: "123".into(),
            branch: "альфа".into(),
            pool: Pool::Faulty,
        });
        assert_eq!(duplicate.code, ErrorCode::Duplicate);

        let missing = ApiError::from(CoreError::not_found("альфа", "123", Pool::Active));
        assert!(missing.is_not_found());

        let invalid = ApiError::from(CoreError::from(ValidationError::InvalidDigits(Field::Imei)));
        assert_eq!(invalid.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_store_error_hides_source() {
        let err = ApiError::from(StoreError::Io {
            path: PathBuf::from("/data/equipment.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "secret detail"),
        });
        assert_eq!(err.code, ErrorCode::StorageError);
        assert!(!err.message.contains("secret detail"));
        assert!(err.message.contains("equipment.json"));
    }

    #[test]
    fn test_protected_store_error() {
        let err = ApiError::from(StoreError::Protected {
            location: "json:/data/equipment.json".into(),
            reason: "bad row".into(),
        });
        assert!(err.is_protected());
        assert!(err.message.contains("/data/equipment.json"));
    }

    #[test]
    fn test_serialized_code() {
        let json = serde_json::to_string(&ApiError::not_found("gone")).unwrap();
        assert_eq!(json, r#"{"code":"NOT_FOUND","message":"gone"}"#);
    }
}
