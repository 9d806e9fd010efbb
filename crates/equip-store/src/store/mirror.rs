//! # Mirrored Store
//!
//! Saves the same snapshot to a primary store and any number of mirrors.
//!
//! ```text
//! load ──► primary
//!
//! save ──► primary ──► mirror 1 ──► mirror 2 ...
//!             │            │
//!             └── every store is attempted; the first failure is returned
//! ```

use equip_core::Snapshot;
use tracing::{debug, warn};

use super::SnapshotStore;
use crate::error::StoreResult;

/// Primary store plus mirrors written on every save.
#[derive(Debug)]
pub struct MirroredStore {
    primary: Box<dyn SnapshotStore>,
    mirrors: Vec<Box<dyn SnapshotStore>>,
}

impl MirroredStore {
    pub fn new(primary: Box<dyn SnapshotStore>, mirrors: Vec<Box<dyn SnapshotStore>>) -> Self {
        MirroredStore { primary, mirrors }
    }

    pub fn primary(&self) -> &dyn SnapshotStore {
        self.primary.as_ref()
    }
}

impl SnapshotStore for MirroredStore {
    fn load(&self) -> StoreResult<Snapshot> {
        self.primary.load()
    }

    fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let mut first_error = None;

        for store in std::iter::once(&self.primary).chain(self.mirrors.iter()) {
            match store.save(snapshot) {
                Ok(()) => debug!(store = %store.describe(), "Snapshot saved"),
                Err(err) => {
                    warn!(store = %store.describe(), error = %err, "Snapshot save failed");
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn describe(&self) -> String {
        std::iter::once(&self.primary)
            .chain(self.mirrors.iter())
            .map(|store| store.describe())
            .collect::<Vec<_>>()
            .join(" + ")
    }
}
