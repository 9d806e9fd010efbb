//! # Domain Types
//!
//! Core domain types used throughout the equipment tracker.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Unit       │   │     Status      │   │    Condition    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  branch ┐ key   │   │  исправен       │   │  установлен     │       │
//! │  │  imei   ┘       │   │  неисправен     │   │  диагностика    │       │
//! │  │  brand, model   │   └─────────────────┘   │  ремонт         │       │
//! │  │  status         │                         │  демонтирован   │       │
//! │  │  condition      │   ┌─────────────────┐   │  неустановлен   │       │
//! │  │  location       │   │    Location     │   └─────────────────┘       │
//! │  │  first_seen     │   │  склад / тс     │                             │
//! │  └─────────────────┘   └─────────────────┘   ┌─────────────────┐       │
//! │                                              │      Pool       │       │
//! │                                              │  Active         │       │
//! │                                              │  Faulty         │       │
//! │                                              │  UnderDiagnostic│       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Vocabulary
//! Status, condition and location values are stored and entered as
//! lower-case Russian words. The Rust variants carry English names; serde
//! and [`Vocabulary::as_str`] map between the two.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{Field, ValidationError};

// =============================================================================
// Vocabulary
// =============================================================================

/// A closed set of lower-case values accepted for one field.
pub trait Vocabulary: Sized + Copy + 'static {
    /// The input field this vocabulary belongs to.
    const FIELD: Field;

    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    /// The persisted (and user-typed) spelling.
    fn as_str(&self) -> &'static str;

    /// Allowed spellings in sorted order, as reported in errors.
    fn allowed() -> Vec<&'static str> {
        let mut values: Vec<&'static str> = Self::ALL.iter().map(Self::as_str).collect();
        values.sort_unstable();
        values
    }

    /// Looks up a variant by its already-normalized spelling.
    fn lookup(value: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .iter()
            .copied()
            .find(|variant| variant.as_str() == value)
            .ok_or_else(|| ValidationError::InvalidEnum {
                field: Self::FIELD,
                allowed: Self::allowed(),
            })
    }
}

// =============================================================================
// Status
// =============================================================================

/// Whether the unit works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Status {
    #[serde(rename = "исправен")]
    Operational,
    #[serde(rename = "неисправен")]
    Faulty,
}

impl Vocabulary for Status {
    const FIELD: Field = Field::Status;
    const ALL: &'static [Self] = &[Status::Operational, Status::Faulty];

    fn as_str(&self) -> &'static str {
        match self {
            Status::Operational => "исправен",
            Status::Faulty => "неисправен",
        }
    }
}

// =============================================================================
// Condition
// =============================================================================

/// Physical condition of the unit.
///
/// No `Ord` on purpose: sorting by condition uses the persisted string,
/// see [`crate::report::sort_units`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Condition {
    #[serde(rename = "установлен")]
    Installed,
    #[serde(rename = "диагностика")]
    DiagnosticReview,
    #[serde(rename = "ремонт")]
    Repair,
    #[serde(rename = "демонтирован")]
    Decommissioned,
    #[serde(rename = "неустановлен")]
    NotInstalled,
}

impl Vocabulary for Condition {
    const FIELD: Field = Field::Condition;
    const ALL: &'static [Self] = &[
        Condition::Installed,
        Condition::DiagnosticReview,
        Condition::Repair,
        Condition::Decommissioned,
        Condition::NotInstalled,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Condition::Installed => "установлен",
            Condition::DiagnosticReview => "диагностика",
            Condition::Repair => "ремонт",
            Condition::Decommissioned => "демонтирован",
            Condition::NotInstalled => "неустановлен",
        }
    }
}

// =============================================================================
// Location
// =============================================================================

/// Where the unit physically is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Location {
    /// Branch warehouse ("склад").
    #[serde(rename = "склад")]
    Warehouse,
    /// Mounted in a vehicle ("тс").
    #[serde(rename = "тс")]
    Vehicle,
}

impl Vocabulary for Location {
    const FIELD: Field = Field::Location;
    const ALL: &'static [Self] = &[Location::Warehouse, Location::Vehicle];

    fn as_str(&self) -> &'static str {
        match self {
            Location::Warehouse => "склад",
            Location::Vehicle => "тс",
        }
    }
}

macro_rules! vocabulary_traits {
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            /// Parses a persisted value, tolerating case and surrounding blanks.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::lookup(&s.trim().to_lowercase())
            }
        }
    )*};
}

vocabulary_traits!(Status, Condition, Location);

// =============================================================================
// Pool
// =============================================================================

/// The three mutually-exclusive classification pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Pool {
    /// Installed / in service. Every new unit starts here.
    Active,
    /// Pulled from service as broken.
    Faulty,
    /// Awaiting diagnostic review.
    UnderDiagnostic,
}

impl Pool {
    /// Every pool, in registry iteration order.
    pub const ALL: [Pool; 3] = [Pool::Active, Pool::Faulty, Pool::UnderDiagnostic];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Pool::Active => "active",
            Pool::Faulty => "faulty",
            Pool::UnderDiagnostic => "under_diagnostic",
        }
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Pool::ALL
            .into_iter()
            .find(|pool| pool.as_str() == s)
            .ok_or(s)
    }
}

// =============================================================================
// Raw Input
// =============================================================================

/// The eight fields as typed by an operator, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RawUnitFields {
    pub branch: String,
    pub imei: String,
    pub brand: String,
    pub model: String,
    pub status: String,
    pub condition: String,
    pub location: String,
    pub date: String,
}

impl RawUnitFields {
    /// Returns the raw value of one field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Branch => &self.branch,
            Field::Imei => &self.imei,
            Field::Brand => &self.brand,
            Field::Model => &self.model,
            Field::Status => &self.status,
            Field::Condition => &self.condition,
            Field::Location => &self.location,
            Field::Date => &self.date,
        }
    }

    /// Sets the raw value of one field.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Branch => self.branch = value,
            Field::Imei => self.imei = value,
            Field::Brand => self.brand = value,
            Field::Model => self.model = value,
            Field::Status => self.status = value,
            Field::Condition => self.condition = value,
            Field::Location => self.location = value,
            Field::Date => self.date = value,
        }
    }
}

// =============================================================================
// Normalized Input
// =============================================================================

/// A record that passed [`crate::validation::validate`].
///
/// Only the validator constructs these from operator input, so holding one
/// means every field is trimmed, lower-cased and within its grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedUnit {
    pub branch: String,
    pub imei: String,
    pub brand: String,
    pub model: String,
    pub status: Status,
    pub condition: Condition,
    pub location: Location,
    pub date: NaiveDate,
}

// =============================================================================
// Unit
// =============================================================================

/// One physical equipment item.
///
/// Identity is `(branch, imei)`; the IMEI alone is also unique system-wide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Unit {
    pub branch: String,
    pub imei: String,
    /// Device type / manufacturer.
    pub brand: String,
    pub model: String,
    pub status: Status,
    pub condition: Condition,
    pub location: Location,
    /// First-seen date. `None` means unknown, never "today".
    #[ts(as = "Option<String>")]
    pub first_seen: Option<NaiveDate>,
}

impl Unit {
    /// True when this unit has the given identity.
    #[inline]
    pub fn is(&self, branch: &str, imei: &str) -> bool {
        self.branch == branch && self.imei == imei
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
