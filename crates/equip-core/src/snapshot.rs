//! # Snapshot Codec
//!
//! Flattens a [`Registry`] into two tables of plain strings and rebuilds it.
//!
//! ## Tables
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  units                                                                  │
//! │  pool │ branch │ imei │ brand │ model │ status │ condition │ location │ date
//! │  active│ альфа │ 1234 │ самсунг│ 4567 │ исправен│ установлен│ склад │ 2022-01-01
//! │  faulty│ бета  │ 5678 │ нокиа │ 3310  │ неисправен│ ремонт │ склад    │
//! │                                                                  ▲ empty│
//! │  dates (ledger)                                                  │      │
//! │  imei │ date                                                     │      │
//! │  5678 │ 2020-03-15  ─────────── backfills on load ───────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Load Rules
//! - The ledger table is read first; the first date per IMEI wins
//! - A unit row with an empty or unparseable date takes the ledger's date
//! - The ledger never learns dates from unit rows
//! - Unknown pool/status/condition/location values and repeated IMEIs
//!   reject the whole snapshot
//!
//! The codec is encoding-agnostic; `equip-store` writes these rows as CSV or
//! JSON.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::SnapshotError;
use crate::registry::Registry;
use crate::types::{Condition, Location, Pool, Status, Unit};
use crate::validation::{normalize, DATE_FORMAT};

// =============================================================================
// Rows
// =============================================================================

/// One unit, flattened. Column order is the persisted column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SnapshotRow {
    pub pool: String,
    pub branch: String,
    pub imei: String,
    pub brand: String,
    pub model: String,
    pub status: String,
    pub condition: String,
    pub location: String,
    /// `YYYY-MM-DD`, or empty when unknown.
    #[serde(default)]
    pub date: String,
}

/// One date ledger entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LedgerRow {
    pub imei: String,
    pub date: String,
}

/// The whole registry as flat rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Snapshot {
    pub units: Vec<SnapshotRow>,
    #[serde(default)]
    pub dates: Vec<LedgerRow>,
}

/// A registry rebuilt from a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restored {
    pub registry: Registry,
    /// Unit rows whose date came from the ledger.
    pub backfilled: usize,
}

// =============================================================================
// Registry → Rows
// =============================================================================

impl From<&Registry> for Snapshot {
    fn from(registry: &Registry) -> Self {
        let units = registry
            .placed_units()
            .map(|placement| unit_to_row(placement.pool, placement.unit))
            .collect();
        let dates = registry
            .ledger()
            .iter()
            .map(|(imei, date)| LedgerRow {
                imei: imei.to_string(),
                date: date.format(DATE_FORMAT).to_string(),
            })
            .collect();
        Snapshot { units, dates }
    }
}

fn unit_to_row(pool: Pool, unit: &Unit) -> SnapshotRow {
    SnapshotRow {
        pool: pool.as_str().to_string(),
        branch: unit.branch.clone(),
        imei: unit.imei.clone(),
        brand: unit.brand.clone(),
        model: unit.model.clone(),
        status: unit.status.to_string(),
        condition: unit.condition.to_string(),
        location: unit.location.to_string(),
        date: unit
            .first_seen
            .map(|date| date.format(DATE_FORMAT).to_string())
            .unwrap_or_default(),
    }
}

// =============================================================================
// Rows → Registry
// =============================================================================

impl Snapshot {
    /// Flattens a registry. Same as `Snapshot::from(registry)`.
    pub fn of(registry: &Registry) -> Self {
        Snapshot::from(registry)
    }

    /// Rebuilds a registry, backfilling unknown dates from the ledger table.
    pub fn restore(&self) -> Result<Restored, SnapshotError> {
        let mut registry = Registry::new();

        for (row, entry) in self.dates.iter().enumerate() {
            let imei = normalize(&entry.imei);
            let value = entry.date.trim();
            if imei.is_empty() || value.is_empty() {
                continue;
            }
            let date = chrono::NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
                SnapshotError::InvalidLedgerDate {
                    row,
                    imei: imei.clone(),
                    value: value.to_string(),
                }
            })?;
            registry.ledger_mut().record(&imei, date);
        }

        let mut backfilled = 0;
        for (index, row) in self.units.iter().enumerate() {
            let (pool, mut unit) = row_to_unit(index, row)?;
            if registry.ledger().backfill(&mut unit) {
                backfilled += 1;
            }
            let imei = unit.imei.clone();
            registry
                .restore(pool, unit)
                .map_err(|existing| SnapshotError::DuplicateImei {
                    row: index,
                    imei,
                    pool: existing,
                })?;
        }

        Ok(Restored {
            registry,
            backfilled,
        })
    }
}

impl TryFrom<&Snapshot> for Registry {
    type Error = SnapshotError;

    fn try_from(snapshot: &Snapshot) -> Result<Self, Self::Error> {
        snapshot.restore().map(|restored| restored.registry)
    }
}

fn row_to_unit(index: usize, row: &SnapshotRow) -> Result<(Pool, Unit), SnapshotError> {
    let invalid = |column: &'static str, value: &str| SnapshotError::InvalidValue {
        row: index,
        column,
        value: value.to_string(),
    };

    let pool: Pool = row.pool.parse().map_err(|_| invalid("pool", &row.pool))?;
    let status: Status = row.status.parse().map_err(|_| invalid("status", &row.status))?;
    let condition: Condition = row
        .condition
        .parse()
        .map_err(|_| invalid("condition", &row.condition))?;
    let location: Location = row
        .location
        .parse()
        .map_err(|_| invalid("location", &row.location))?;

    // Unreadable dates count as unknown so the ledger can fill them.
    let first_seen = chrono::NaiveDate::parse_from_str(row.date.trim(), DATE_FORMAT).ok();

    // Same normalization as operator input.
    let unit = Unit {
        branch: normalize(&row.branch),
        imei: normalize(&row.imei),
        brand: normalize(&row.brand),
        model: normalize(&row.model),
        status,
        condition,
        location,
        first_seen,
    };
    Ok((pool, unit))
}

// =============================================================================
// Unit Tests
// =============================================================================
