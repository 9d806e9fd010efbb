//! # Date Ledger
//!
//! IMEI → first-seen date, kept apart from the pools.
//!
//! The ledger is write-once per IMEI: the first date recorded wins and later
//! dates for the same IMEI are ignored. Its only job is to fill in units
//! whose own date is unknown.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::types::Unit;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateLedger {
    dates: BTreeMap<String, NaiveDate>,
}

impl DateLedger {
    pub fn new() -> Self {
        DateLedger::default()
    }

    pub fn get(&self, imei: &str) -> Option<NaiveDate> {
        self.dates.get(imei).copied()
    }

    pub fn contains(&self, imei: &str) -> bool {
        self.dates.contains_key(imei)
    }

    /// Records a date unless one is already known for this IMEI.
    ///
    /// Returns `true` if the date was stored.
    pub fn record(&mut self, imei: &str, date: NaiveDate) -> bool {
        if self.dates.contains_key(imei) {
            return false;
        }
        self.dates.insert(imei.to_string(), date);
        true
    }

    /// Fills `unit.first_seen` from the ledger if the unit has no date.
    ///
    /// A unit that already has a date is left alone even if the ledger
    /// disagrees. Returns `true` if a date was filled in.
    pub fn backfill(&self, unit: &mut Unit) -> bool {
        if unit.first_seen.is_some() {
            return false;
        }
        match self.get(&unit.imei) {
            Some(date) => {
                unit.first_seen = Some(date);
                true
            }
            None => false,
        }
    }

    /// Entries in IMEI order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, NaiveDate)> {
        self.dates.iter().map(|(imei, date)| (imei.as_str(), *date))
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
