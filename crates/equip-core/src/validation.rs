//! # Validation Module
//!
//! The field grammar every record passes before it enters the registry.
//!
//! ## Check Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      validate(raw) pipeline                             │
//! │                                                                         │
//! │  normalize    trim + lower-case all 8 fields                           │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  required     all 8 non-empty            → MissingFields([..])         │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  script       branch, brand, status,     → InvalidScript(field)        │
//! │               condition, location                                       │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  digits       imei, model                → InvalidDigits(field)        │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  length       3 <= len(imei) <= 15       → InvalidLength               │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  enum         status, condition,         → InvalidEnum(field, allowed) │
//! │               location                                                  │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  date         YYYY-MM-DD                 → InvalidDate                 │
//! │                                                                         │
//! │  First failure wins. Callers always get exactly one error.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use equip_core::validation::validate;
//! use equip_core::RawUnitFields;
//!
//! let raw = RawUnitFields {
//!     branch: " Альфа ".into(),
//!     imei: "123456789012".into(),
//!     brand: "самсунг".into(),
//!     model: "4567".into(),
//!     status: "исправен".into(),
//!     condition: "установлен".into(),
//!     location: "склад".into(),
//!     date: "2022-01-01".into(),
//! };
//! let unit = validate(&raw).unwrap();
//! assert_eq!(unit.branch, "альфа");
//! ```

use chrono::NaiveDate;

use crate::error::{Field, ValidationError};
use crate::types::{Condition, Location, NormalizedUnit, RawUnitFields, Status, Vocabulary};
use crate::{IMEI_MAX_LEN, IMEI_MIN_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Fields that must be written in Cyrillic letters, in check order.
const LETTER_FIELDS: [Field; 5] = [
    Field::Branch,
    Field::Brand,
    Field::Status,
    Field::Condition,
    Field::Location,
];

/// Fields that must be written in digits, in check order.
const DIGIT_FIELDS: [Field; 2] = [Field::Imei, Field::Model];

/// Persisted and entered date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Primitive Checks
// =============================================================================

/// Trims surrounding whitespace and lower-cases.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// One or more Russian letters (`а`–`я`, `ё`), nothing else.
///
/// Expects already-normalized input; upper-case letters are rejected.
pub fn is_cyrillic_word(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| ('а'..='я').contains(&c) || c == 'ё')
}

/// One or more ASCII digits, nothing else.
pub fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}

// =============================================================================
// Record Validator
// =============================================================================

/// Validates and normalizes a full 8-field record.
///
/// ## Example
/// ```rust
/// use equip_core::validation::validate;
/// use equip_core::{Field, RawUnitFields, ValidationError};
///
/// let err = validate(&RawUnitFields::default()).unwrap_err();
/// assert!(matches!(err, ValidationError::MissingFields(ref f) if f.len() == 8));
/// ```
pub fn validate(raw: &RawUnitFields) -> ValidationResult<NormalizedUnit> {
    let mut out = RawUnitFields::default();
    for field in Field::ALL {
        out.set(field, normalize(raw.get(field)));
    }

    let missing: Vec<Field> = Field::ALL
        .into_iter()
        .filter(|field| out.get(*field).is_empty())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    if let Some(field) = LETTER_FIELDS
        .into_iter()
        .find(|field| !is_cyrillic_word(out.get(*field)))
    {
        return Err(ValidationError::InvalidScript(field));
    }

    if let Some(field) = DIGIT_FIELDS
        .into_iter()
        .find(|field| !is_digits(out.get(*field)))
    {
        return Err(ValidationError::InvalidDigits(field));
    }

    // Digits are ASCII here, so byte length is digit count.
    if !(IMEI_MIN_LEN..=IMEI_MAX_LEN).contains(&out.imei.len()) {
        return Err(ValidationError::InvalidLength {
            field: Field::Imei,
            min: IMEI_MIN_LEN,
            max: IMEI_MAX_LEN,
        });
    }

    let status = Status::lookup(&out.status)?;
    let condition = Condition::lookup(&out.condition)?;
    let location = Location::lookup(&out.location)?;
    let date = parse_date(&out.date)?;

    Ok(NormalizedUnit {
        branch: out.branch,
        imei: out.imei,
        brand: out.brand,
        model: out.model,
        status,
        condition,
        location,
        date,
    })
}

// =============================================================================
// Single-Field Validators
// =============================================================================

/// Validates one vocabulary field typed on its own (edit flow).
///
/// Applies the script and enumeration rules, not the required-field rule:
/// an empty value is simply not a member of the vocabulary.
pub fn validate_value<T: Vocabulary>(raw: &str) -> ValidationResult<T> {
    let value = normalize(raw);
    if !is_cyrillic_word(&value) {
        return Err(ValidationError::InvalidScript(T::FIELD));
    }
    T::lookup(&value)
}

/// Validates a new status value.
pub fn validate_status(raw: &str) -> ValidationResult<Status> {
    validate_value(raw)
}

/// Validates a new condition value.
pub fn validate_condition(raw: &str) -> ValidationResult<Condition> {
    validate_value(raw)
}

/// Validates a new location value.
pub fn validate_location(raw: &str) -> ValidationResult<Location> {
    validate_value(raw)
}

// =============================================================================
// Unit Tests
// =============================================================================
