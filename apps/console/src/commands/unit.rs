//! # Unit Commands
//!
//! Adding units, looking them up, and moving them between pools.
//!
//! ## Unit Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   add_unit ──► ┌──────────┐ ──move_to_faulty─────► ┌──────────────────┐ │
//! │                │  Active  │                        │     Faulty       │ │
//! │   edit_unit ──►│          │ ──move_to_diagnostic─► ├──────────────────┤ │
//! │   find_unit ──►└──────────┘                        │ UnderDiagnostic  │ │
//! │                                                    └──────────────────┘ │
//! │   locate_unit searches all three pools                                  │
//! │   Moves are one-way: nothing returns to Active.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Branch and IMEI arguments are normalized (trimmed, lower-cased) the same
//! way the validator normalizes stored values.

use chrono::NaiveDate;
use equip_core::validation::{normalize, validate};
use equip_core::{EditOutcome, Pool, RawUnitFields, UnitEdit};
use serde::Serialize;
use tracing::{debug, info};

use super::{autosave, Saved, UnitCard};
use crate::error::ApiError;
use crate::state::{RegistryState, StorageState};

/// Adds a unit from the eight raw form fields.
///
/// ## Flow
/// ```text
/// raw fields ──► validate ──► Registry::add_unit ──► autosave
///                   │                 │
///                   ▼                 ▼
///          VALIDATION_ERROR       DUPLICATE
/// ```
///
/// The stored unit is always `исправен` / `установлен`.
pub fn add_unit(
    registry: &RegistryState,
    storage: &StorageState,
    raw: &RawUnitFields,
    today: NaiveDate,
) -> Result<Saved<UnitCard>, ApiError> {
    let fields = validate(raw)?;
    debug!(branch = %fields.branch, imei = %fields.imei, "add_unit command");

    registry.with_registry_mut(|r| {
        let card = UnitCard::new(Pool::Active, r.add_unit(fields)?, today);
        info!(branch = %card.branch, imei = %card.imei, "Unit added");
        Ok::<_, ApiError>(Saved {
            value: card,
            save_error: autosave(r, storage),
        })
    })
}

/// Looks a unit up in Active.
///
/// ## Returns
/// `NOT_FOUND` when Active has no such unit, even if another pool has it;
/// use [`locate_unit`] for that.
pub fn find_unit(
    registry: &RegistryState,
    branch: &str,
    imei: &str,
    today: NaiveDate,
) -> Result<UnitCard, ApiError> {
    let (branch, imei) = (normalize(branch), normalize(imei));
    debug!(branch = %branch, imei = %imei, "find_unit command");

    registry.with_registry(|r| {
        r.find_unit(&branch, &imei)
            .map(|unit| UnitCard::new(Pool::Active, unit, today))
            .ok_or_else(|| {
                ApiError::not_found(format!("No active unit {imei} in branch {branch}"))
            })
    })
}

/// Every record with this IMEI, whatever its pool or branch.
pub fn locate_unit(registry: &RegistryState, imei: &str, today: NaiveDate) -> Vec<UnitCard> {
    let imei = normalize(imei);
    registry.with_registry(|r| {
        r.locate(&imei)
            .into_iter()
            .map(|placement| UnitCard::new(placement.pool, placement.unit, today))
            .collect()
    })
}

/// Result of an edit: the unit after the edit plus what was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditReport {
    pub unit: UnitCard,
    /// Names of the fields that changed.
    pub applied: Vec<String>,
    /// One message per rejected value.
    pub rejected: Vec<String>,
}

impl EditReport {
    fn new(unit: UnitCard, outcome: EditOutcome) -> Self {
        EditReport {
            unit,
            applied: outcome.applied.iter().map(|f| f.as_str().to_string()).collect(),
            rejected: outcome.rejected.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Edits status, condition and location of an active unit.
///
/// Blank or missing values leave a field unchanged. Each value is checked on
/// its own, so some fields may change while others are rejected. Autosaves
/// only when something changed.
pub fn edit_unit(
    registry: &RegistryState,
    storage: &StorageState,
    branch: &str,
    imei: &str,
    edit: &UnitEdit,
    today: NaiveDate,
) -> Result<Saved<EditReport>, ApiError> {
    let (branch, imei) = (normalize(branch), normalize(imei));
    let edit = UnitEdit {
        status: non_blank(&edit.status),
        condition: non_blank(&edit.condition),
        location: non_blank(&edit.location),
    };
    debug!(branch = %branch, imei = %imei, ?edit, "edit_unit command");

    registry.with_registry_mut(|r| {
        let outcome = r.edit_unit(&branch, &imei, &edit)?;
        let unit = r
            .find_unit(&branch, &imei)
            .map(|unit| UnitCard::new(Pool::Active, unit, today))
            .ok_or_else(|| ApiError::internal("Edited unit disappeared from Active"))?;

        let save_error = if outcome.applied.is_empty() {
            None
        } else {
            info!(branch = %branch, imei = %imei, applied = ?outcome.applied, "Unit edited");
            autosave(r, storage)
        };

        Ok::<_, ApiError>(Saved {
            value: EditReport::new(unit, outcome),
            save_error,
        })
    })
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Moves an active unit to UnderDiagnostic (`неисправен` / `диагностика`).
pub fn move_to_diagnostic(
    registry: &RegistryState,
    storage: &StorageState,
    branch: &str,
    imei: &str,
    today: NaiveDate,
) -> Result<Saved<UnitCard>, ApiError> {
    let (branch, imei) = (normalize(branch), normalize(imei));
    debug!(branch = %branch, imei = %imei, "move_to_diagnostic command");

    registry.with_registry_mut(|r| {
        let card = UnitCard::new(Pool::UnderDiagnostic, r.move_to_diagnostic(&branch, &imei)?, today);
        info!(branch = %branch, imei = %imei, "Unit sent to diagnostics");
        Ok::<_, ApiError>(Saved {
            value: card,
            save_error: autosave(r, storage),
        })
    })
}

/// Moves an active unit to Faulty (`неисправен`, back at `склад`).
pub fn move_to_faulty(
    registry: &RegistryState,
    storage: &StorageState,
    branch: &str,
    imei: &str,
    today: NaiveDate,
) -> Result<Saved<UnitCard>, ApiError> {
    let (branch, imei) = (normalize(branch), normalize(imei));
    debug!(branch = %branch, imei = %imei, "move_to_faulty command");

    registry.with_registry_mut(|r| {
        let card = UnitCard::new(Pool::Faulty, r.move_to_faulty(&branch, &imei)?, today);
        info!(branch = %branch, imei = %imei, "Unit marked faulty");
        Ok::<_, ApiError>(Saved {
            value: card,
            save_error: autosave(r, storage),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use equip_core::{Condition, Location, Status, WarrantyStatus};
    use equip_store::{MemoryStore, Storage, StoreConfig};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn storage(store: MemoryStore) -> StorageState {
        StorageState::new(Storage::new(StoreConfig::new("unused"), Box::new(store)))
    }

    fn raw(branch: &str, imei: &str) -> RawUnitFields {
        RawUnitFields {
            branch: branch.into(),
            imei: imei.into(),
            brand: "самсунг".into(),
            model: "4567".into(),
            status: "неисправен".into(),
            condition: "ремонт".into(),
            location: "тс".into(),
            date: "2022-01-01".into(),
        }
    }

    #[test]
    fn test_add_then_find() {
        let registry = RegistryState::default();
        let storage = storage(MemoryStore::new());

        let saved = add_unit(&registry, &storage, &raw(" Альфа ", "123456789012"), today()).unwrap();
        assert!(saved.save_error.is_none());
        assert_eq!(saved.value.status, Status::Operational);
        assert_eq!(saved.value.condition, Condition::Installed);
        assert_eq!(saved.value.location, Location::Vehicle);

        let card = find_unit(&registry, "альфа", "123456789012", today()).unwrap();
        assert_eq!(card.branch, "альфа");
        assert_eq!(card.first_seen.as_deref(), Some("2022-01-01"));
        assert_eq!(card.warranty, WarrantyStatus::UnderWarranty);
    }

    #[test]
    fn test_add_autosaves() {
        let registry = RegistryState::default();
        let store = MemoryStore::new();
        let storage = storage(store);

        add_unit(&registry, &storage, &raw("альфа", "111"), today()).unwrap();
        let snapshot = storage.inner().hydrate().registry;
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_add_invalid_and_duplicate() {
        let registry = RegistryState::default();
        let storage = storage(MemoryStore::new());

        let err = add_unit(&registry, &storage, &raw("alpha", "111"), today()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        add_unit(&registry, &storage, &raw("альфа", "111"), today()).unwrap();
        let err = add_unit(&registry, &storage, &raw("бета", "111"), today()).unwrap_err();
        assert_eq!(err.code, ErrorCode::Duplicate);
        assert_eq!(registry.with_registry(|r| r.len()), 1);
    }

    #[test]
    fn test_failed_autosave_keeps_change() {
        let registry = RegistryState::default();
        let storage = storage(MemoryStore::failing());

        let saved = add_unit(&registry, &storage, &raw("альфа", "111"), today()).unwrap();
        assert_eq!(saved.save_error.map(|e| e.code), Some(ErrorCode::StorageError));
        assert!(find_unit(&registry, "альфа", "111", today()).is_ok());
    }

    #[test]
    fn test_move_to_faulty_then_diagnostic() {
        let registry = RegistryState::default();
        let storage = storage(MemoryStore::new());
        add_unit(&registry, &storage, &raw("альфа", "123456789012"), today()).unwrap();

        let moved = move_to_faulty(&registry, &storage, "альфа", "123456789012", today()).unwrap();
        assert_eq!(moved.value.pool, Pool::Faulty);
        assert_eq!(moved.value.status, Status::Faulty);
        assert_eq!(moved.value.location, Location::Warehouse);

        let err = find_unit(&registry, "альфа", "123456789012", today()).unwrap_err();
        assert!(err.is_not_found());

        let err =
            move_to_diagnostic(&registry, &storage, "альфа", "123456789012", today()).unwrap_err();
        assert!(err.is_not_found());

        let found = locate_unit(&registry, "123456789012", today());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].pool, Pool::Faulty);
    }

    #[test]
    fn test_move_to_diagnostic() {
        let registry = RegistryState::default();
        let storage = storage(MemoryStore::new());
        add_unit(&registry, &storage, &raw("альфа", "555"), today()).unwrap();

        let moved = move_to_diagnostic(&registry, &storage, "альфа", "555", today()).unwrap();
        assert_eq!(moved.value.pool, Pool::UnderDiagnostic);
        assert_eq!(moved.value.condition, Condition::DiagnosticReview);
        assert_eq!(moved.value.location, Location::Vehicle);
    }

    #[test]
    fn test_edit_partial() {
        let registry = RegistryState::default();
        let storage = storage(MemoryStore::new());
        add_unit(&registry, &storage, &raw("альфа", "777"), today()).unwrap();

        let edit = UnitEdit {
            status: Some("  ".into()),
            condition: Some("ремонт".into()),
            location: Some("гараж".into()),
        };
        let saved = edit_unit(&registry, &storage, "альфа", "777", &edit, today()).unwrap();

        assert_eq!(saved.value.applied, ["condition"]);
        assert_eq!(saved.value.rejected.len(), 1);
        assert_eq!(saved.value.unit.condition, Condition::Repair);
        assert_eq!(saved.value.unit.location, Location::Vehicle);
        assert_eq!(saved.value.unit.status, Status::Operational);
    }

    #[test]
    fn test_edit_missing_unit() {
        let registry = RegistryState::default();
        let storage = storage(MemoryStore::new());
        let err = edit_unit(&registry, &storage, "альфа", "1", &UnitEdit::default(), today())
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
