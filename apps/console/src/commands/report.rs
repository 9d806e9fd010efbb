//! # Report Commands
//!
//! Read-only views over the whole registry. Nothing here mutates or saves.

use chrono::NaiveDate;
use equip_core::report::{
    self, default_distribution_start, BranchCount, SortKey, StackedCounts,
};
use tracing::debug;

use super::UnitCard;
use crate::state::RegistryState;

/// Every unit, all pools, in the requested order.
///
/// `SortKey::Condition` orders by the Russian condition word as plain text.
pub fn sort_units(registry: &RegistryState, key: SortKey, today: NaiveDate) -> Vec<UnitCard> {
    debug!(?key, "sort_units command");
    registry.with_registry(|r| {
        report::sort_placed(r.placed_units(), key)
            .into_iter()
            .map(|placement| UnitCard::new(placement.pool, placement.unit, today))
            .collect()
    })
}

/// Branches with the most `неисправен` units, across all pools.
pub fn top_faulty(registry: &RegistryState, top_n: usize) -> Vec<BranchCount> {
    debug!(top_n, "top_faulty command");
    registry.with_registry(|r| report::top_faulty_branches(r.units(), top_n))
}

/// Brand × condition counts for units first seen on or after 2000-01-01.
pub fn condition_distribution(registry: &RegistryState) -> StackedCounts {
    registry.with_registry(|r| {
        report::condition_distribution(r.units(), Some(default_distribution_start()))
    })
}

/// Brand × location counts over every unit.
pub fn location_distribution(registry: &RegistryState) -> StackedCounts {
    registry.with_registry(|r| report::location_distribution(r.units()))
}
