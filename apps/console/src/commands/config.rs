//! # Config Commands
//!
//! `about` and `help`.

use equip_core::{PoolCounts, IMEI_MAX_LEN, IMEI_MIN_LEN, WARRANTY_PERIOD_DAYS};
use serde::Serialize;

use crate::state::{ConfigState, RegistryState, StorageState};

/// Program and session summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub data_dir: String,
    pub store: String,
    pub counts: PoolCounts,
    pub warranty_days: i64,
    pub imei_digits: (usize, usize),
}

pub fn about(config: &ConfigState, registry: &RegistryState, storage: &StorageState) -> AboutInfo {
    AboutInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        data_dir: config.data_dir.display().to_string(),
        store: storage.inner().describe(),
        counts: registry.with_registry(|r| r.counts()),
        warranty_days: WARRANTY_PERIOD_DAYS,
        imei_digits: (IMEI_MIN_LEN, IMEI_MAX_LEN),
    }
}

/// Command names and one-line descriptions, in menu order.
pub const HELP: &[(&str, &str)] = &[
    ("add", "register a new unit (8 fields)"),
    ("find", "show an active unit and its warranty; offers edit"),
    ("edit", "change status, condition, location (blank keeps the value)"),
    ("diag", "send an active unit to diagnostics"),
    ("faulty", "mark an active unit faulty"),
    ("sort date|condition", "list every unit in order"),
    ("top [n]", "branches with the most faulty units"),
    ("dist", "brand x condition counts since 2000-01-01"),
    ("loc", "brand x location counts"),
    ("save", "save now"),
    ("load csv|json", "replace the registry with a saved file"),
    ("about", "program and data summary"),
    ("help", "this list"),
    ("quit", "save and exit"),
];
