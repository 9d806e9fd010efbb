//! # Equipment Registry
//!
//! The in-memory classification engine: three disjoint pools plus the
//! first-seen date ledger.
//!
//! ## Pool Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Unit Lifecycle                                       │
//! │                                                                         │
//! │   validate(raw) ──► add_unit ──► ┌──────────────┐                       │
//! │                                  │    Active    │                       │
//! │                                  │ исправен     │                       │
//! │                                  │ установлен   │                       │
//! │                                  └──────┬───────┘                       │
//! │                     move_to_diagnostic  │  move_to_faulty               │
//! │                  ┌──────────────────────┴─────────────────┐             │
//! │                  ▼                                        ▼             │
//! │  ┌──────────────────────────┐          ┌──────────────────────────┐    │
//! │  │     UnderDiagnostic      │          │          Faulty          │    │
//! │  │ status    = неисправен   │          │ status    = неисправен   │    │
//! │  │ condition = диагностика  │          │ location  = склад        │    │
//! │  │ location, date kept      │          │ condition, date kept     │    │
//! │  └──────────────────────────┘          └──────────────────────────┘    │
//! │                                                                         │
//! │  One-way: there is no transition back to Active.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - An IMEI lives in at most one pool (checked through `index`)
//! - Failed operations leave every pool and the ledger untouched
//! - Each pool keeps insertion order; reports rely on it for tie-breaks

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, Field, ValidationError};
use crate::ledger::DateLedger;
use crate::types::{Condition, Location, NormalizedUnit, Pool, Status, Unit};
use crate::validation::{validate_condition, validate_location, validate_status};

// =============================================================================
// Supporting Types
// =============================================================================

/// Where an IMEI was found by [`Registry::locate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement<'a> {
    pub pool: Pool,
    pub unit: &'a Unit,
}

/// Unit counts per pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolCounts {
    pub active: usize,
    pub faulty: usize,
    pub under_diagnostic: usize,
}

impl PoolCounts {
    pub fn total(&self) -> usize {
        self.active + self.faulty + self.under_diagnostic
    }
}

/// Requested changes to a unit's mutable attributes, as raw operator input.
///
/// `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitEdit {
    pub status: Option<String>,
    pub condition: Option<String>,
    pub location: Option<String>,
}

/// What an edit did. Fields are validated one by one, so an edit can be
/// partly applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditOutcome {
    pub applied: Vec<Field>,
    pub rejected: Vec<ValidationError>,
}

impl EditOutcome {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Applies an edit to a unit in place.
///
/// Each present value goes through the script and enumeration checks on its
/// own; an invalid value keeps the old attribute and lands in `rejected`.
pub fn apply_edit(unit: &mut Unit, edit: &UnitEdit) -> EditOutcome {
    let mut outcome = EditOutcome::default();

    if let Some(raw) = &edit.status {
        match validate_status(raw) {
            Ok(status) => {
                unit.status = status;
                outcome.applied.push(Field::Status);
            }
            Err(err) => outcome.rejected.push(err),
        }
    }

    if let Some(raw) = &edit.condition {
        match validate_condition(raw) {
            Ok(condition) => {
                unit.condition = condition;
                outcome.applied.push(Field::Condition);
            }
            Err(err) => outcome.rejected.push(err),
        }
    }

    if let Some(raw) = &edit.location {
        match validate_location(raw) {
            Ok(location) => {
                unit.location = location;
                outcome.applied.push(Field::Location);
            }
            Err(err) => outcome.rejected.push(err),
        }
    }

    outcome
}

// =============================================================================
// Registry
// =============================================================================

/// Owns the three pools and the date ledger.
///
/// ## Usage
/// ```rust
/// use equip_core::{validation::validate, Pool, RawUnitFields, Registry};
///
/// let raw = RawUnitFields {
///     branch: "альфа".into(),
///     imei: "123456789012".into(),
///     brand: "самсунг".into(),
///     model: "4567".into(),
///     status: "исправен".into(),
///     condition: "установлен".into(),
///     location: "тс".into(),
///     date: "2022-01-01".into(),
/// };
///
/// let mut registry = Registry::new();
/// registry.add_unit(validate(&raw).unwrap()).unwrap();
/// registry.move_to_faulty("альфа", "123456789012").unwrap();
///
/// assert!(registry.find_unit("альфа", "123456789012").is_none());
/// assert_eq!(registry.locate("123456789012")[0].pool, Pool::Faulty);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    active: Vec<Unit>,
    faulty: Vec<Unit>,
    under_diagnostic: Vec<Unit>,
    /// IMEI → pool currently holding it.
    index: HashMap<String, Pool>,
    ledger: DateLedger,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    /// Units of one pool in insertion order.
    pub fn pool(&self, pool: Pool) -> &[Unit] {
        match pool {
            Pool::Active => &self.active,
            Pool::Faulty => &self.faulty,
            Pool::UnderDiagnostic => &self.under_diagnostic,
        }
    }

    /// Every unit with its pool: Active, then Faulty, then UnderDiagnostic.
    pub fn placed_units(&self) -> impl Iterator<Item = Placement<'_>> {
        Pool::ALL.into_iter().flat_map(move |pool| {
            self.pool(pool)
                .iter()
                .map(move |unit| Placement { pool, unit })
        })
    }

    /// Every unit, in the same order as [`Registry::placed_units`].
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.placed_units().map(|placement| placement.unit)
    }

    pub fn counts(&self) -> PoolCounts {
        PoolCounts {
            active: self.active.len(),
            faulty: self.faulty.len(),
            under_diagnostic: self.under_diagnostic.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn ledger(&self) -> &DateLedger {
        &self.ledger
    }

    /// Looks a unit up in Active only.
    ///
    /// Warranty checks and edits work on active units; use
    /// [`Registry::locate`] to find an IMEI in any pool.
    pub fn find_unit(&self, branch: &str, imei: &str) -> Option<&Unit> {
        self.find_in(Pool::Active, branch, imei)
    }

    /// Looks a unit up in the given pool.
    pub fn find_in(&self, pool: Pool, branch: &str, imei: &str) -> Option<&Unit> {
        self.pool(pool).iter().find(|unit| unit.is(branch, imei))
    }

    /// Finds an IMEI in all three pools, whatever its branch.
    ///
    /// With the disjointness invariant intact this yields at most one
    /// placement; the scan still covers every pool so a caller can tell the
    /// operator exactly where the IMEI sits.
    pub fn locate(&self, imei: &str) -> Vec<Placement<'_>> {
        self.placed_units()
            .filter(|placement| placement.unit.imei == imei)
            .collect()
    }

    /// The pool currently holding this IMEI.
    pub fn pool_of(&self, imei: &str) -> Option<Pool> {
        self.index.get(imei).copied()
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Adds a validated unit to Active.
    ///
    /// The new unit is always `исправен` / `установлен`, whatever status and
    /// condition the form carried. The date is recorded in the ledger unless
    /// the ledger already knows this IMEI.
    ///
    /// ## Errors
    /// [`CoreError::DuplicateImei`] if the IMEI is in any pool. Nothing is
    /// changed in that case.
    pub fn add_unit(&mut self, fields: NormalizedUnit) -> CoreResult<&Unit> {
        self.ensure_unique(&fields.imei)?;

        self.ledger.record(&fields.imei, fields.date);
        let unit = Unit {
            branch: fields.branch,
            imei: fields.imei,
            brand: fields.brand,
            model: fields.model,
            status: Status::Operational,
            condition: Condition::Installed,
            location: fields.location,
            first_seen: Some(fields.date),
        };
        Ok(self.push(Pool::Active, unit))
    }

    /// Moves an active unit to UnderDiagnostic.
    ///
    /// Forces `неисправен` / `диагностика`; location and date are kept.
    pub fn move_to_diagnostic(&mut self, branch: &str, imei: &str) -> CoreResult<&Unit> {
        let mut unit = self.take_active(branch, imei)?;
        unit.status = Status::Faulty;
        unit.condition = Condition::DiagnosticReview;
        Ok(self.push(Pool::UnderDiagnostic, unit))
    }

    /// Moves an active unit to Faulty.
    ///
    /// Forces `неисправен` and `склад` (the unit is physically pulled back to
    /// the warehouse); condition and date are kept.
    pub fn move_to_faulty(&mut self, branch: &str, imei: &str) -> CoreResult<&Unit> {
        let mut unit = self.take_active(branch, imei)?;
        unit.status = Status::Faulty;
        unit.location = Location::Warehouse;
        Ok(self.push(Pool::Faulty, unit))
    }

    /// Edits status, condition and location of an active unit.
    ///
    /// See [`apply_edit`] for the partial-update rules.
    pub fn edit_unit(&mut self, branch: &str, imei: &str, edit: &UnitEdit) -> CoreResult<EditOutcome> {
        let unit = self
            .active
            .iter_mut()
            .find(|unit| unit.is(branch, imei))
            .ok_or_else(|| CoreError::not_found(branch, imei, Pool::Active))?;
        Ok(apply_edit(unit, edit))
    }

    // -------------------------------------------------------------------------
    // Snapshot support
    // -------------------------------------------------------------------------

    /// Inserts a unit loaded from a snapshot, as-is, into the given pool.
    pub(crate) fn restore(&mut self, pool: Pool, unit: Unit) -> Result<(), Pool> {
        if let Some(existing) = self.pool_of(&unit.imei) {
            return Err(existing);
        }
        self.push(pool, unit);
        Ok(())
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut DateLedger {
        &mut self.ledger
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn pool_mut(&mut self, pool: Pool) -> &mut Vec<Unit> {
        match pool {
            Pool::Active => &mut self.active,
            Pool::Faulty => &mut self.faulty,
            Pool::UnderDiagnostic => &mut self.under_diagnostic,
        }
    }

    fn ensure_unique(&self, imei: &str) -> CoreResult<()> {
        let Some(pool) = self.pool_of(imei) else {
            return Ok(());
        };
        let branch = self
            .pool(pool)
            .iter()
            .find(|unit| unit.imei == imei)
            .map(|unit| unit.branch.clone())
            .unwrap_or_default();
        Err(CoreError::DuplicateImei {
            imei: imei.to_string(),
            branch,
            pool,
        })
    }

    fn take_active(&mut self, branch: &str, imei: &str) -> CoreResult<Unit> {
        let position = self
            .active
            .iter()
            .position(|unit| unit.is(branch, imei))
            .ok_or_else(|| CoreError::not_found(branch, imei, Pool::Active))?;
        let unit = self.active.remove(position);
        self.index.remove(&unit.imei);
        Ok(unit)
    }

    fn push(&mut self, pool: Pool, unit: Unit) -> &Unit {
        self.index.insert(unit.imei.clone(), pool);
        let units = self.pool_mut(pool);
        units.push(unit);
        &units[units.len() - 1]
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawUnitFields;
    use crate::validation::validate;
    use chrono::NaiveDate;

    fn fields(branch: &str, imei: &str) -> NormalizedUnit {
        validate(&RawUnitFields {
            branch: branch.into(),
            imei: imei.into(),
            brand: "самсунг".into(),
            model: "4567".into(),
            status: "неисправен".into(),
            condition: "ремонт".into(),
            location: "тс".into(),
            date: "2022-01-01".into(),
        })
        .unwrap()
    }

    fn jan_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()
    }

    #[test]
    fn test_add_then_find_uses_defaults() {
        let mut registry = Registry::new();
        registry.add_unit(fields("альфа", "123456789012")).unwrap();

        let unit = registry.find_unit("альфа", "123456789012").unwrap();
        assert_eq!(unit.status, Status::Operational);
        assert_eq!(unit.condition, Condition::Installed);
        assert_eq!(unit.location, Location::Vehicle);
        assert_eq!(unit.first_seen, Some(jan_first()));
        assert_eq!(registry.ledger().get("123456789012"), Some(jan_first()));
    }

    #[test]
    fn test_find_is_scoped_to_branch() {
        let mut registry = Registry::new();
        registry.add_unit(fields("альфа", "111")).unwrap();
        assert!(registry.find_unit("бета", "111").is_none());
    }

    #[test]
    fn test_duplicate_imei_rejected_in_every_pool() {
        let mut registry = Registry::new();
        registry.add_unit(fields("альфа", "111")).unwrap();
        registry.add_unit(fields("альфа", "222")).unwrap();
        registry.add_unit(fields("альфа", "333")).unwrap();
        registry.move_to_faulty("альфа", "222").unwrap();
        registry.move_to_diagnostic("альфа", "333").unwrap();

        for (imei, pool) in [
            ("111", Pool::Active),
            ("222", Pool::Faulty),
            ("333", Pool::UnderDiagnostic),
        ] {
            let before = registry.clone();
            let err = registry.add_unit(fields("бета", imei)).unwrap_err();
            assert!(
                matches!(err, CoreError::DuplicateImei { pool: p, ref branch, .. } if p == pool && branch == "альфа"),
                "imei {imei}"
            );
            assert_eq!(registry, before);
        }
    }

    #[test]
    fn test_ledger_keeps_first_date() {
        let mut registry = Registry::new();
        registry.ledger_mut().record("111", NaiveDate::from_ymd_opt(2019, 1, 1).unwrap());
        registry.add_unit(fields("альфа", "111")).unwrap();
        assert_eq!(
            registry.ledger().get("111"),
            NaiveDate::from_ymd_opt(2019, 1, 1)
        );
        // The unit keeps the date it was entered with.
        assert_eq!(
            registry.find_unit("альфа", "111").unwrap().first_seen,
            Some(jan_first())
        );
    }

    #[test]
    fn test_move_to_diagnostic() {
        let mut registry = Registry::new();
        registry.add_unit(fields("альфа", "111")).unwrap();

        let unit = registry.move_to_diagnostic("альфа", "111").unwrap().clone();
        assert_eq!(unit.status, Status::Faulty);
        assert_eq!(unit.condition, Condition::DiagnosticReview);
        assert_eq!(unit.location, Location::Vehicle);
        assert_eq!(unit.first_seen, Some(jan_first()));

        assert!(registry.find_unit("альфа", "111").is_none());
        assert_eq!(registry.pool_of("111"), Some(Pool::UnderDiagnostic));
    }

    #[test]
    fn test_move_to_faulty_forces_warehouse() {
        let mut registry = Registry::new();
        registry.add_unit(fields("альфа", "123456789012")).unwrap();
        registry
            .edit_unit(
                "альфа",
                "123456789012",
                &UnitEdit {
                    condition: Some("ремонт".into()),
                    ..UnitEdit::default()
                },
            )
            .unwrap();

        let unit = registry.move_to_faulty("альфа", "123456789012").unwrap().clone();
        assert_eq!(unit.status, Status::Faulty);
        assert_eq!(unit.location, Location::Warehouse);
        assert_eq!(unit.condition, Condition::Repair);
        assert_eq!(unit.first_seen, Some(jan_first()));
        assert!(registry.find_unit("альфа", "123456789012").is_none());
        assert_eq!(registry.counts().faulty, 1);
    }

    #[test]
    fn test_second_transition_fails_and_pools_stay_disjoint() {
        let mut registry = Registry::new();
        registry.add_unit(fields("альфа", "111")).unwrap();
        registry.move_to_diagnostic("альфа", "111").unwrap();

        let before = registry.clone();
        let err = registry.move_to_faulty("альфа", "111").unwrap_err();
        assert!(matches!(err, CoreError::UnitNotFound { pool: Pool::Active, .. }));
        assert_eq!(registry, before);

        let placements = registry.locate("111");
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].pool, Pool::UnderDiagnostic);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_move_requires_matching_branch() {
        let mut registry = Registry::new();
        registry.add_unit(fields("альфа", "111")).unwrap();
        assert!(registry.move_to_faulty("бета", "111").is_err());
        assert_eq!(registry.pool_of("111"), Some(Pool::Active));
    }

    #[test]
    fn test_edit_is_partial() {
        let mut registry = Registry::new();
        registry.add_unit(fields("альфа", "111")).unwrap();

        let outcome = registry
            .edit_unit(
                "альфа",
                "111",
                &UnitEdit {
                    status: Some("Неисправен".into()),
                    condition: Some("сломан".into()),
                    location: Some("склад".into()),
                },
            )
            .unwrap();

        assert_eq!(outcome.applied, vec![Field::Status, Field::Location]);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].field(), Some(Field::Condition));
        assert!(!outcome.is_clean());

        let unit = registry.find_unit("альфа", "111").unwrap();
        assert_eq!(unit.status, Status::Faulty);
        assert_eq!(unit.condition, Condition::Installed);
        assert_eq!(unit.location, Location::Warehouse);
    }

    #[test]
    fn test_edit_missing_unit() {
        let mut registry = Registry::new();
        let err = registry
            .edit_unit("альфа", "404", &UnitEdit::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::UnitNotFound { .. }));
    }

    #[test]
    fn test_iteration_order_is_pool_then_insertion() {
        let mut registry = Registry::new();
        for imei in ["111", "222", "333", "444"] {
            registry.add_unit(fields("альфа", imei)).unwrap();
        }
        registry.move_to_diagnostic("альфа", "111").unwrap();
        registry.move_to_faulty("альфа", "333").unwrap();

        let order: Vec<&str> = registry.units().map(|u| u.imei.as_str()).collect();
        assert_eq!(order, vec!["222", "444", "333", "111"]);
        assert_eq!(registry.counts().total(), 4);
    }
}
