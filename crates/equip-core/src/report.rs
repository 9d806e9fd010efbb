//! # Sort & Report Helpers
//!
//! Read-only orderings and aggregations over units, for display and charts.
//! Everything here takes an iterator of `&Unit` and returns new data; the
//! registry is never touched.
//!
//! ## Ordering Quirks
//! These are kept on purpose and covered by tests:
//! - [`SortKey::Condition`] sorts by the persisted Russian word, in plain
//!   string order, not by any severity ranking
//! - [`top_faulty_branches`] breaks ties by first appearance in the input,
//!   which for [`crate::Registry::units`] is pool then load order

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::registry::Placement;
use crate::types::{Status, Unit, Vocabulary};

// =============================================================================
// Sorting
// =============================================================================

/// Sort keys offered by the sort menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Ascending first-seen date; unknown dates first.
    Date,
    /// Ascending condition string.
    Condition,
}

/// Returns the units in the requested order. The sort is stable.
///
/// ## Example
/// ```rust
/// use equip_core::report::{sort_units, SortKey};
/// use equip_core::Registry;
///
/// let registry = Registry::new();
/// assert!(sort_units(registry.units(), SortKey::Date).is_empty());
/// ```
pub fn sort_units<'a>(units: impl IntoIterator<Item = &'a Unit>, key: SortKey) -> Vec<&'a Unit> {
    let mut sorted: Vec<&Unit> = units.into_iter().collect();
    sort_by(&mut sorted, key, |unit| *unit);
    sorted
}

/// Same ordering as [`sort_units`], keeping each unit's pool.
pub fn sort_placed<'a>(
    placed: impl IntoIterator<Item = Placement<'a>>,
    key: SortKey,
) -> Vec<Placement<'a>> {
    let mut sorted: Vec<Placement<'a>> = placed.into_iter().collect();
    sort_by(&mut sorted, key, |placement| placement.unit);
    sorted
}

fn sort_by<'a, T>(items: &mut [T], key: SortKey, unit: impl Fn(&T) -> &'a Unit) {
    match key {
        // None < Some(_), so unknown dates come first.
        SortKey::Date => items.sort_by_key(|item| unit(item).first_seen),
        SortKey::Condition => items.sort_by_key(|item| unit(item).condition.as_str()),
    }
}

// =============================================================================
// Faulty Branch Ranking
// =============================================================================

/// Default length of the faulty-branch ranking.
pub const DEFAULT_TOP_N: usize = 10;

/// A branch and its number of faulty units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BranchCount {
    pub branch: String,
    pub count: usize,
}

/// Branches ranked by number of units with status `неисправен`.
///
/// Highest count first; equal counts keep the order in which each branch
/// first appeared among the faulty units. At most `top_n` entries.
pub fn top_faulty_branches<'a>(
    units: impl IntoIterator<Item = &'a Unit>,
    top_n: usize,
) -> Vec<BranchCount> {
    let mut ranking: Vec<BranchCount> = Vec::new();
    for unit in units.into_iter().filter(|unit| unit.status == Status::Faulty) {
        match ranking.iter_mut().find(|entry| entry.branch == unit.branch) {
            Some(entry) => entry.count += 1,
            None => ranking.push(BranchCount {
                branch: unit.branch.clone(),
                count: 1,
            }),
        }
    }
    ranking.sort_by(|a, b| b.count.cmp(&a.count));
    ranking.truncate(top_n);
    ranking
}

// =============================================================================
// Distributions
// =============================================================================

/// First date included in the condition distribution chart.
pub fn default_distribution_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// A dense brand × category count table for stacked bar charts.
///
/// Brands and categories are sorted; every cell is present (zero-filled).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StackedCounts {
    pub brands: Vec<String>,
    pub categories: Vec<String>,
    /// `counts[b][c]` is the count for `brands[b]` and `categories[c]`.
    pub counts: Vec<Vec<usize>>,
}

impl StackedCounts {
    fn from_pairs(pairs: impl IntoIterator<Item = (String, &'static str)>) -> Self {
        let mut cells: BTreeMap<(String, &'static str), usize> = BTreeMap::new();
        let mut brands = BTreeSet::new();
        let mut categories = BTreeSet::new();
        for (brand, category) in pairs {
            brands.insert(brand.clone());
            categories.insert(category);
            *cells.entry((brand, category)).or_insert(0) += 1;
        }

        let counts = brands
            .iter()
            .map(|brand| {
                categories
                    .iter()
                    .map(|category| cells.get(&(brand.clone(), *category)).copied().unwrap_or(0))
                    .collect()
            })
            .collect();

        StackedCounts {
            brands: brands.into_iter().collect(),
            categories: categories.into_iter().map(str::to_string).collect(),
            counts,
        }
    }

    /// Count for one cell; zero if either label is absent.
    pub fn get(&self, brand: &str, category: &str) -> usize {
        let b = self.brands.iter().position(|x| x == brand);
        let c = self.categories.iter().position(|x| x == category);
        match (b, c) {
            (Some(b), Some(c)) => self.counts[b][c],
            _ => 0,
        }
    }

    /// Sum over all cells.
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }
}

/// Units per (brand, condition).
///
/// With `since`, units dated before it or with an unknown date are left out.
pub fn condition_distribution<'a>(
    units: impl IntoIterator<Item = &'a Unit>,
    since: Option<NaiveDate>,
) -> StackedCounts {
    StackedCounts::from_pairs(
        units
            .into_iter()
            .filter(|unit| match since {
                Some(start) => unit.first_seen.is_some_and(|date| date >= start),
                None => true,
            })
            .map(|unit| (unit.brand.clone(), unit.condition.as_str())),
    )
}

/// Units per (brand, location): the status distribution view, bucketed by
/// where the units are.
pub fn location_distribution<'a>(units: impl IntoIterator<Item = &'a Unit>) -> StackedCounts {
    StackedCounts::from_pairs(
        units
            .into_iter()
            .map(|unit| (unit.brand.clone(), unit.location.as_str())),
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Condition, Location};

    fn unit(branch: &str, brand: &str, status: Status, condition: Condition, date: Option<&str>) -> Unit {
        Unit {
            branch: branch.into(),
            imei: format!("{branch}{brand}{}", date.unwrap_or("-")),
            brand: brand.into(),
            model: "1".into(),
            status,
            condition,
            location: Location::Vehicle,
            first_seen: date.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
        }
    }

    #[test]
    fn test_sort_by_date_unknown_first() {
        let units = vec![
            unit("а", "х", Status::Operational, Condition::Installed, Some("2023-01-01")),
            unit("б", "х", Status::Operational, Condition::Installed, None),
            unit("в", "х", Status::Operational, Condition::Installed, Some("2021-01-01")),
        ];
        let sorted = sort_units(&units, SortKey::Date);
        let branches: Vec<&str> = sorted.iter().map(|u| u.branch.as_str()).collect();
        assert_eq!(branches, vec!["б", "в", "а"]);
    }

    #[test]
    fn test_sort_placed_keeps_pools() {
        use crate::types::Pool;

        let units = vec![
            unit("а", "х", Status::Faulty, Condition::Repair, Some("2023-01-01")),
            unit("б", "х", Status::Operational, Condition::Installed, Some("2020-01-01")),
        ];
        let placed = vec![
            Placement { pool: Pool::Faulty, unit: &units[0] },
            Placement { pool: Pool::Active, unit: &units[1] },
        ];

        let sorted = sort_placed(placed, SortKey::Date);
        assert_eq!(sorted[0].pool, Pool::Active);
        assert_eq!(sorted[0].unit.branch, "б");
        assert_eq!(sorted[1].pool, Pool::Faulty);
    }

    #[test]
    fn test_sort_by_condition_is_lexical() {
        let units = vec![
            unit("а", "х", Status::Operational, Condition::Installed, None),
            unit("б", "х", Status::Operational, Condition::Repair, None),
            unit("в", "х", Status::Operational, Condition::Decommissioned, None),
            unit("г", "х", Status::Operational, Condition::DiagnosticReview, None),
            unit("д", "х", Status::Operational, Condition::NotInstalled, None),
        ];
        let sorted = sort_units(&units, SortKey::Condition);
        let conditions: Vec<&str> = sorted.iter().map(|u| u.condition.as_str()).collect();
        assert_eq!(
            conditions,
            vec!["демонтирован", "диагностика", "неустановлен", "ремонт", "установлен"]
        );
    }

    #[test]
    fn test_top_faulty_branches() {
        let units = vec![
            unit("бета", "х", Status::Faulty, Condition::Repair, None),
            unit("альфа", "х", Status::Faulty, Condition::Repair, None),
            unit("гамма", "х", Status::Operational, Condition::Installed, None),
            unit("альфа", "у", Status::Faulty, Condition::Repair, None),
            unit("дельта", "х", Status::Faulty, Condition::Repair, None),
        ];
        let ranking = top_faulty_branches(&units, DEFAULT_TOP_N);
        assert_eq!(
            ranking,
            vec![
                BranchCount { branch: "альфа".into(), count: 2 },
                // tie: бета appeared before дельта
                BranchCount { branch: "бета".into(), count: 1 },
                BranchCount { branch: "дельта".into(), count: 1 },
            ]
        );
        assert_eq!(top_faulty_branches(&units, 1).len(), 1);
        assert!(top_faulty_branches(&units[2..3], 10).is_empty());
    }

    #[test]
    fn test_condition_distribution_with_cutoff() {
        let units = vec![
            unit("а", "самсунг", Status::Operational, Condition::Installed, Some("2022-01-01")),
            unit("б", "самсунг", Status::Operational, Condition::Repair, Some("2023-01-01")),
            unit("в", "нокиа", Status::Operational, Condition::Installed, Some("2024-01-01")),
            unit("г", "нокиа", Status::Operational, Condition::Installed, Some("1999-12-31")),
            unit("д", "нокиа", Status::Operational, Condition::Installed, None),
        ];
        let table = condition_distribution(&units, Some(default_distribution_start()));
        assert_eq!(table.brands, vec!["нокиа", "самсунг"]);
        assert_eq!(table.categories, vec!["ремонт", "установлен"]);
        assert_eq!(table.counts, vec![vec![0, 1], vec![1, 1]]);
        assert_eq!(table.get("самсунг", "ремонт"), 1);
        assert_eq!(table.get("нокиа", "ремонт"), 0);
        assert_eq!(table.total(), 3);

        let all = condition_distribution(&units, None);
        assert_eq!(all.total(), 5);
    }

    #[test]
    fn test_location_distribution() {
        let mut units = vec![
            unit("а", "самсунг", Status::Faulty, Condition::Repair, None),
            unit("б", "самсунг", Status::Operational, Condition::Installed, None),
        ];
        units[0].location = Location::Warehouse;
        let table = location_distribution(&units);
        assert_eq!(table.categories, vec!["склад", "тс"]);
        assert_eq!(table.get("самсунг", "склад"), 1);
        assert_eq!(table.get("самсунг", "тс"), 1);
        assert!(location_distribution(&[]).is_empty());
    }
}
