//! # Error Types
//!
//! Domain-specific error types for equip-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  equip-core errors (this file)                                         │
//! │  ├── CoreError        - Registry rule violations                       │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── SnapshotError    - Malformed persisted rows                       │
//! │                                                                         │
//! │  equip-store errors (separate crate)                                   │
//! │  └── StoreError       - Load/save failures                             │
//! │                                                                         │
//! │  Console errors (in app)                                               │
//! │  └── ApiError         - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Operator               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (IMEI, branch, field)
//! 3. Errors are enum variants, never String
//! 4. Every variant is recoverable; nothing here is fatal

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Pool;

// =============================================================================
// Field
// =============================================================================

/// One of the eight named input fields of a unit record.
///
/// The declaration order is the order of the required-field check and of
/// the names reported in [`ValidationError::MissingFields`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Branch,
    Imei,
    Brand,
    Model,
    Status,
    Condition,
    Location,
    Date,
}

impl Field {
    /// All fields in record order.
    pub const ALL: [Field; 8] = [
        Field::Branch,
        Field::Imei,
        Field::Brand,
        Field::Model,
        Field::Status,
        Field::Condition,
        Field::Location,
        Field::Date,
    ];

    /// Column name used in snapshots and prompts.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Field::Branch => "branch",
            Field::Imei => "imei",
            Field::Brand => "brand",
            Field::Model => "model",
            Field::Status => "status",
            Field::Condition => "condition",
            Field::Location => "location",
            Field::Date => "date",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Registry rule violations.
///
/// These errors never leave the registry half-modified: an operation that
/// returns one of them has not mutated any pool or the date ledger.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The IMEI is already tracked somewhere in the system.
    ///
    /// ## When This Occurs
    /// - Adding a unit whose IMEI sits in Active, Faulty or UnderDiagnostic
    /// - IMEIs are unique across all branches and all pools
    #[error("IMEI {imei} already exists in the {pool} pool (branch {branch})")]
    DuplicateImei {
        imei: String,
        branch: String,
        pool: Pool,
    },

    /// No unit with this (branch, IMEI) in the pool an operation requires.
    ///
    /// ## User Workflow
    /// ```text
    /// moveToFaulty("альфа", "123")
    ///      │
    ///      ▼
    /// Active has no ("альфа", "123")
    ///      │
    ///      ▼
    /// UnitNotFound { pool: Active, .. }
    ///      │
    ///      ▼
    /// Caller may `locate("123")` to find it elsewhere
    /// ```
    #[error("No unit {imei} in branch {branch} of the {pool} pool")]
    UnitNotFound {
        branch: String,
        imei: String,
        pool: Pool,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Snapshot could not be turned back into a registry.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

impl CoreError {
    /// Creates a UnitNotFound error.
    pub fn not_found(branch: impl Into<String>, imei: impl Into<String>, pool: Pool) -> Self {
        CoreError::UnitNotFound {
            branch: branch.into(),
            imei: imei.into(),
            pool,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Exactly one is produced per validation attempt; checks short-circuit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more required fields are empty after trimming.
    #[error("Fill in the required fields: {}", join_fields(.0))]
    MissingFields(Vec<Field>),

    /// Field must consist of Cyrillic letters only.
    #[error("{0} must contain only Cyrillic letters, without spaces or punctuation")]
    InvalidScript(Field),

    /// Field must consist of digits only.
    #[error("{0} must contain only digits")]
    InvalidDigits(Field),

    /// Field has the wrong number of characters.
    #[error("{field} must be between {min} and {max} digits long")]
    InvalidLength { field: Field, min: usize, max: usize },

    /// Value is not in the allowed set.
    #[error("{field} must be one of: {}", .allowed.join(", "))]
    InvalidEnum {
        field: Field,
        allowed: Vec<&'static str>,
    },

    /// Date is not a `YYYY-MM-DD` calendar date.
    #[error("date '{0}' is not a valid YYYY-MM-DD date")]
    InvalidDate(String),
}

impl ValidationError {
    /// The field the error is about (the first one for MissingFields).
    pub fn field(&self) -> Option<Field> {
        match self {
            ValidationError::MissingFields(fields) => fields.first().copied(),
            ValidationError::InvalidScript(field) | ValidationError::InvalidDigits(field) => {
                Some(*field)
            }
            ValidationError::InvalidLength { field, .. }
            | ValidationError::InvalidEnum { field, .. } => Some(*field),
            ValidationError::InvalidDate(_) => Some(Field::Date),
        }
    }
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(Field::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Snapshot Error
// =============================================================================

/// Persisted rows that cannot be loaded into a registry.
///
/// `row` is the zero-based position within its table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// A column holds a value outside its vocabulary.
    #[error("unit row {row}: invalid {column} value '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    /// The same IMEI appears in more than one unit row.
    #[error("unit row {row}: IMEI {imei} already loaded into the {pool} pool")]
    DuplicateImei { row: usize, imei: String, pool: Pool },

    /// A ledger row's date cannot be parsed.
    #[error("date row {row}: invalid date '{value}' for IMEI {imei}")]
    InvalidLedgerDate {
        row: usize,
        imei: String,
        value: String,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::DuplicateImei {
            imei: "123456".to_string(),
            branch: "альфа".to_string(),
            pool: Pool::Faulty,
        };
        assert_eq!(
            err.to_string(),
            "IMEI 123456 already exists in the faulty pool (branch альфа)"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MissingFields(vec![Field::Branch, Field::Date]);
        assert_eq!(err.to_string(), "Fill in the required fields: branch, date");

        let err = ValidationError::InvalidLength {
            field: Field::Imei,
            min: 3,
            max: 15,
        };
        assert_eq!(err.to_string(), "imei must be between 3 and 15 digits long");

        let err = ValidationError::InvalidEnum {
            field: Field::Location,
            allowed: vec!["склад", "тс"],
        };
        assert_eq!(err.to_string(), "location must be one of: склад, тс");
    }

    #[test]
    fn test_validation_error_field() {
        assert_eq!(
            ValidationError::InvalidDate("x".into()).field(),
            Some(Field::Date)
        );
        assert_eq!(ValidationError::MissingFields(vec![]).field(), None);
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::InvalidDigits(Field::Model);
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
