//! # Storage
//!
//! The front end's single handle on persistence.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  startup ──► hydrate() ──► Registry (possibly empty, never an error)    │
//! │                  │                                                      │
//! │                  └─ unusable files ──► protected: persist() refuses     │
//! │                                                                         │
//! │  add / diag / faulty / edit / quit ──► persist(&Registry)               │
//! │                                                                         │
//! │  "load csv" / "load json" ──► reload_from(format) ──► Restored or Err   │
//! │                               (caller keeps its registry on Err)        │
//! │                                                                         │
//! │  protected ──► successful reload_from ──► writable                      │
//! │            └─► release() (files renamed to *.bak) ──► writable          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use equip_core::{Registry, Restored, Snapshot};
use tracing::{debug, info, warn};

use crate::config::{SnapshotFormat, StoreConfig};
use crate::error::{StoreError, StoreResult};
use crate::store::{back_up, SnapshotStore};

/// Outcome of a startup load.
#[derive(Debug)]
pub struct Hydration {
    pub registry: Registry,
    /// Why the registry is empty, when the saved snapshot was unusable.
    /// `None` both on success and on a first start with no files.
    pub degraded: Option<StoreError>,
    /// Unit rows whose date was filled from the ledger.
    pub backfilled: usize,
}

/// Loads a registry, degrading to an empty one on any failure.
///
/// A missing snapshot is a normal first start and logged at info level.
/// Anything else is warned once and returned in [`Hydration::degraded`].
pub fn load_or_empty(store: &dyn SnapshotStore) -> Hydration {
    let loaded = store
        .load()
        .and_then(|snapshot| snapshot.restore().map_err(StoreError::from));

    match loaded {
        Ok(Restored {
            registry,
            backfilled,
        }) => {
            let counts = registry.counts();
            info!(
                store = %store.describe(),
                active = counts.active,
                faulty = counts.faulty,
                under_diagnostic = counts.under_diagnostic,
                backfilled,
                "Registry loaded"
            );
            Hydration {
                registry,
                degraded: None,
                backfilled,
            }
        }
        Err(err) if err.is_not_found() => {
            info!(store = %store.describe(), "No saved registry, starting empty");
            Hydration {
                registry: Registry::new(),
                degraded: None,
                backfilled: 0,
            }
        }
        Err(err) => {
            warn!(store = %store.describe(), error = %err, "Saved registry unusable, starting empty");
            Hydration {
                registry: Registry::new(),
                degraded: Some(err),
                backfilled: 0,
            }
        }
    }
}

/// Configured store plus the operations the front end needs.
#[derive(Debug)]
pub struct Storage {
    config: StoreConfig,
    store: Box<dyn SnapshotStore>,
    /// Why the files on disk could not be loaded. While set, saving is
    /// refused so the empty registry never replaces them.
    protected: Mutex<Option<String>>,
}

impl Storage {
    /// Storage over an explicit store. Reloads still use `config` paths.
    pub fn new(config: StoreConfig, store: Box<dyn SnapshotStore>) -> Self {
        Storage {
            config,
            store,
            protected: Mutex::new(None),
        }
    }

    /// Storage over the store described by `config`.
    pub fn open(config: StoreConfig) -> Self {
        let store = config.build();
        debug!(store = %store.describe(), "Storage opened");
        Storage::new(config, store)
    }

    fn protection(&self) -> MutexGuard<'_, Option<String>> {
        self.protected
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// True while saving is refused after an unusable startup load.
    pub fn is_protected(&self) -> bool {
        self.protection().is_some()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn describe(&self) -> String {
        self.store.describe()
    }

    /// Startup load. Never fails.
    ///
    /// When the saved data is unusable the storage becomes protected: see
    /// [`Storage::persist`].
    pub fn hydrate(&self) -> Hydration {
        let hydration = load_or_empty(self.store.as_ref());
        if let Some(err) = &hydration.degraded {
            *self.protection() = Some(err.to_string());
        }
        hydration
    }

    /// Saves the whole registry.
    ///
    /// ## Errors
    /// [`StoreError::Protected`] while the files from an unusable startup
    /// load are still in place. Nothing is written in that case.
    pub fn persist(&self, registry: &Registry) -> StoreResult<()> {
        if let Some(reason) = self.protection().clone() {
            return Err(StoreError::Protected {
                location: self.describe(),
                reason,
            });
        }
        self.store.save(&Snapshot::of(registry))
    }

    /// Moves the unusable snapshot files aside and allows saving again.
    ///
    /// Each existing file in the data directory is renamed to `<name>.bak`.
    /// Returns the backup paths.
    pub fn release(&self) -> StoreResult<Vec<PathBuf>> {
        let mut backups = Vec::new();
        for path in self.config.snapshot_files() {
            if let Some(bak) = back_up(&path)? {
                backups.push(bak);
            }
        }
        *self.protection() = None;
        warn!(backups = ?backups, "Unusable snapshot moved aside, saving allowed");
        Ok(backups)
    }

    /// Reads one encoding from the data directory and rebuilds a registry.
    ///
    /// Unlike [`Storage::hydrate`] every failure, including a missing file,
    /// is returned to the caller.
    pub fn reload_from(&self, format: SnapshotFormat) -> StoreResult<Restored> {
        let store = self.config.store_for(format);
        let snapshot = store.load()?;
        let restored = snapshot.restore()?;
        *self.protection() = None;
        info!(
            store = %store.describe(),
            units = restored.registry.len(),
            backfilled = restored.backfilled,
            "Registry reloaded"
        );
        Ok(restored)
    }
}
