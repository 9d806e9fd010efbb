//! # Warranty
//!
//! A unit is under warranty for [`WARRANTY_PERIOD_DAYS`] days after its
//! first-seen date. The period is a flat day count, not calendar years.
//!
//! ```text
//!   first_seen                                   first_seen + 1095
//!       │◄──────────── under warranty ────────────►│◄── expired ──►
//!       day 0                                  day 1094 │ day 1095
//! ```
//!
//! The caller supplies `today`; this module never reads the clock.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::WARRANTY_PERIOD_DAYS;

/// Warranty state of one unit on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum WarrantyStatus {
    UnderWarranty,
    Expired,
    /// The first-seen date is not known. Render as "date unknown".
    Unknown,
}

impl WarrantyStatus {
    /// Evaluates the warranty rule.
    pub fn evaluate(first_seen: Option<NaiveDate>, today: NaiveDate) -> Self {
        match is_under_warranty(first_seen, today) {
            Some(true) => WarrantyStatus::UnderWarranty,
            Some(false) => WarrantyStatus::Expired,
            None => WarrantyStatus::Unknown,
        }
    }

    /// Operator-facing label.
    pub const fn label(&self) -> &'static str {
        match self {
            WarrantyStatus::UnderWarranty => "under warranty",
            WarrantyStatus::Expired => "warranty expired",
            WarrantyStatus::Unknown => "date unknown",
        }
    }
}

/// Days between the first-seen date and `today`; negative for future dates.
pub fn days_elapsed(first_seen: NaiveDate, today: NaiveDate) -> i64 {
    (today - first_seen).num_days()
}

/// `Some(true)` while fewer than 1095 days have passed, `None` when the
/// date is unknown.
///
/// ## Example
/// ```rust
/// use chrono::{Duration, NaiveDate};
/// use equip_core::warranty::is_under_warranty;
///
/// let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
/// assert_eq!(is_under_warranty(Some(today - Duration::days(1094)), today), Some(true));
/// assert_eq!(is_under_warranty(Some(today - Duration::days(1095)), today), Some(false));
/// assert_eq!(is_under_warranty(None, today), None);
/// ```
pub fn is_under_warranty(first_seen: Option<NaiveDate>, today: NaiveDate) -> Option<bool> {
    first_seen.map(|date| days_elapsed(date, today) < WARRANTY_PERIOD_DAYS)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    #[test]
    fn test_boundary() {
        let today = today();
        assert_eq!(
            is_under_warranty(Some(today - Duration::days(1094)), today),
            Some(true)
        );
        assert_eq!(
            is_under_warranty(Some(today - Duration::days(1095)), today),
            Some(false)
        );
        assert_eq!(
            is_under_warranty(Some(today - Duration::days(4000)), today),
            Some(false)
        );
    }

    #[test]
    fn test_unknown_date() {
        assert_eq!(is_under_warranty(None, today()), None);
        assert_eq!(WarrantyStatus::evaluate(None, today()), WarrantyStatus::Unknown);
        assert_eq!(WarrantyStatus::Unknown.label(), "date unknown");
    }

    #[test]
    fn test_future_date_is_under_warranty() {
        let today = today();
        assert_eq!(
            WarrantyStatus::evaluate(Some(today + Duration::days(10)), today),
            WarrantyStatus::UnderWarranty
        );
        assert_eq!(days_elapsed(today + Duration::days(10), today), -10);
    }

    #[test]
    fn test_leap_years_are_not_adjusted() {
        // 2020-02-29 + 1095 days = 2023-02-28
        let first_seen = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2023, 2, 28).unwrap();
        assert_eq!(days_elapsed(first_seen, expiry), 1095);
        assert_eq!(
            WarrantyStatus::evaluate(Some(first_seen), expiry),
            WarrantyStatus::Expired
        );
    }
}
