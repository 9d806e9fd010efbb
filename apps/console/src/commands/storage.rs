//! # Storage Commands
//!
//! Explicit save and reload. Autosave after each change lives in
//! [`super::autosave`].

use equip_store::SnapshotFormat;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{RegistryState, StorageState};

/// What a save wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReport {
    pub units: usize,
    /// Store description, e.g. `json:/data/equipment.json + csv:/data/equipment.csv`.
    pub target: String,
}

/// Saves the whole registry to every configured store.
pub fn save(registry: &RegistryState, storage: &StorageState) -> Result<SaveReport, ApiError> {
    debug!("save command");
    let units = registry.with_registry(|r| storage.inner().persist(r).map(|()| r.len()))?;
    let target = storage.inner().describe();
    info!(units, target = %target, "Registry saved");
    Ok(SaveReport { units, target })
}

/// Moves unloadable snapshot files to `*.bak` so saving is allowed again.
///
/// Returns the backup paths for display.
pub fn release(storage: &StorageState) -> Result<Vec<String>, ApiError> {
    debug!("release command");
    let backups = storage.inner().release()?;
    Ok(backups.iter().map(|path| path.display().to_string()).collect())
}

/// What a reload brought in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub format: SnapshotFormat,
    pub units: usize,
    /// Units whose unknown date was filled from the date ledger.
    pub backfilled: usize,
}

/// Replaces the in-memory registry with the one saved in `format`.
///
/// On any failure, including a missing file, the current registry is kept
/// untouched and the error returned.
pub fn load(
    registry: &RegistryState,
    storage: &StorageState,
    format: SnapshotFormat,
) -> Result<LoadReport, ApiError> {
    debug!(%format, "load command");
    let restored = storage.inner().reload_from(format)?;
    let report = LoadReport {
        format,
        units: restored.registry.len(),
        backfilled: restored.backfilled,
    };
    registry.replace(restored.registry);
    Ok(report)
}
