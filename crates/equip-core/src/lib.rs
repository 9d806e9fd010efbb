//! # equip-core: Pure Business Logic for the Equipment Tracker
//!
//! This crate is the **heart** of the tracker. It holds the classification
//! engine and every business rule as pure code with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Equipment Tracker Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Front end (console today, GUI later)               │   │
//! │  │    add ──► find/edit ──► move to faulty/diagnostic ──► reports  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ UserPrompt                             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ equip-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │  ┌────────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐ │   │
//! │  │  │ validation │ │ registry │ │ snapshot │ │ report, warranty │ │   │
//! │  │  │  grammar   │ │ 3 pools  │ │ flat rows│ │ sort, counts     │ │   │
//! │  │  │            │ │ + ledger │ │          │ │ 1095-day rule    │ │   │
//! │  │  └────────────┘ └──────────┘ └──────────┘ └──────────────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO CLOCK • PURE FUNCTIONS                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Snapshot                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 equip-store (Persistence Layer)                 │   │
//! │  │                  CSV / JSON snapshot stores                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Unit, Status, Condition, Location, Pool)
//! - [`validation`] - Field grammar applied before a record enters the system
//! - [`warranty`] - 1095-day warranty rule
//! - [`ledger`] - IMEI → first-seen date ledger
//! - [`registry`] - The three classification pools and their transitions
//! - [`snapshot`] - Flat row representation for persistence
//! - [`report`] - Sorting and aggregation views
//! - [`prompt`] - The interactive front-end capability
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use equip_core::{validation::validate, warranty::WarrantyStatus, RawUnitFields, Registry};
//!
//! let raw = RawUnitFields {
//!     branch: "альфа".into(),
//!     imei: "123456789012".into(),
//!     brand: "самсунг".into(),
//!     model: "4567".into(),
//!     status: "исправен".into(),
//!     condition: "установлен".into(),
//!     location: "склад".into(),
//!     date: "2022-01-01".into(),
//! };
//!
//! let mut registry = Registry::new();
//! registry.add_unit(validate(&raw)?)?;
//!
//! let unit = registry.find_unit("альфа", "123456789012").unwrap();
//! let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
//! assert_eq!(WarrantyStatus::evaluate(unit.first_seen, today), WarrantyStatus::Expired);
//! # Ok::<(), equip_core::CoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod prompt;
pub mod registry;
pub mod report;
pub mod snapshot;
pub mod types;
pub mod validation;
pub mod warranty;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, Field, SnapshotError, ValidationError};
pub use ledger::DateLedger;
pub use prompt::UserPrompt;
pub use registry::{EditOutcome, Placement, PoolCounts, Registry, UnitEdit};
pub use snapshot::{LedgerRow, Restored, Snapshot, SnapshotRow};
pub use types::*;
pub use warranty::WarrantyStatus;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Warranty length in days, counted from the first-seen date.
///
/// Three years without leap-day adjustment. Day 1095 itself is expired.
pub const WARRANTY_PERIOD_DAYS: i64 = 1095;

/// Shortest accepted IMEI, in digits.
pub const IMEI_MIN_LEN: usize = 3;

/// Longest accepted IMEI, in digits.
pub const IMEI_MAX_LEN: usize = 15;
