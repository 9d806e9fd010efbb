//! # Console Commands Module
//!
//! Every operation the shell can run, as plain functions over the state
//! types. Commands never prompt; the shell collects input through
//! `UserPrompt` and passes plain values in.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (shared result types, autosave)
//! ├── unit.rs     ◄─── add, find, locate, edit, diag, faulty
//! ├── report.rs   ◄─── sort, top, dist, loc
//! ├── storage.rs  ◄─── save, load csv|json
//! └── config.rs   ◄─── about, help
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Shell                                                                  │
//! │  ─────                                                                  │
//! │  let raw = ask 8 fields via UserPrompt;                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  commands::unit::add_unit(                                              │
//! │      &RegistryState,   ◄── locked for the whole call                   │
//! │      &StorageState,    ◄── autosave after the change                   │
//! │      &raw,                                                              │
//! │  ) -> Result<Saved<UnitCard>, ApiError>                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Shell renders UnitCard, then any save error                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod report;
pub mod storage;
pub mod unit;

use chrono::NaiveDate;
use equip_core::{validation::DATE_FORMAT, Condition, Location, Pool, Registry, Status, Unit, WarrantyStatus};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::StorageState;

/// A unit as shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitCard {
    pub pool: Pool,
    pub branch: String,
    pub imei: String,
    pub brand: String,
    pub model: String,
    pub status: Status,
    pub condition: Condition,
    pub location: Location,
    /// `YYYY-MM-DD`, or `None` when unknown.
    pub first_seen: Option<String>,
    pub warranty: WarrantyStatus,
}

impl UnitCard {
    pub fn new(pool: Pool, unit: &Unit, today: NaiveDate) -> Self {
        UnitCard {
            pool,
            branch: unit.branch.clone(),
            imei: unit.imei.clone(),
            brand: unit.brand.clone(),
            model: unit.model.clone(),
            status: unit.status,
            condition: unit.condition,
            location: unit.location,
            first_seen: unit.first_seen.map(|date| date.format(DATE_FORMAT).to_string()),
            warranty: WarrantyStatus::evaluate(unit.first_seen, today),
        }
    }
}

/// Outcome of a command that changed the registry.
///
/// The change itself succeeded. `save_error` is set when the autosave after
/// it failed; the in-memory registry keeps the change and a later `save` can
/// retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saved<T> {
    pub value: T,
    pub save_error: Option<ApiError>,
}

/// Persists the registry after a change, keeping the error for display.
pub(crate) fn autosave(registry: &Registry, storage: &StorageState) -> Option<ApiError> {
    match storage.inner().persist(registry) {
        Ok(()) => {
            debug!(units = registry.len(), "Autosaved");
            None
        }
        Err(err) => Some(ApiError::from(err)),
    }
}
