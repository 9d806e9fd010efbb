//! In-process store for tests and dry runs.

use std::io;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use equip_core::Snapshot;

use super::SnapshotStore;
use crate::error::{StoreError, StoreResult};

/// Keeps the last saved snapshot in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<Option<Snapshot>>,
    saves: Mutex<usize>,
    fail_saves: bool,
}

impl MemoryStore {
    /// An empty store; `load` reports not found until the first save.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds a snapshot.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        MemoryStore {
            snapshot: Mutex::new(Some(snapshot)),
            ..Self::default()
        }
    }

    /// A store whose saves always fail with an I/O error.
    pub fn failing() -> Self {
        MemoryStore {
            fail_saves: true,
            ..Self::default()
        }
    }

    /// The last saved snapshot, if any.
    pub fn snapshot(&self) -> Option<Snapshot> {
        lock(&self.snapshot).clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        *lock(&self.saves)
    }
}

// A poisoned lock still holds a usable snapshot.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> StoreResult<Snapshot> {
        lock(&self.snapshot)
            .clone()
            .ok_or_else(|| StoreError::not_found(self.describe()))
    }

    fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        if self.fail_saves {
            return Err(StoreError::io(
                Path::new("memory"),
                io::Error::new(io::ErrorKind::Other, "store is read-only"),
            ));
        }
        *lock(&self.snapshot) = Some(snapshot.clone());
        *lock(&self.saves) += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_is_not_found() {
        assert!(MemoryStore::new().load().unwrap_err().is_not_found());
    }

    #[test]
    fn test_save_replaces_snapshot() {
        let store = MemoryStore::with_snapshot(Snapshot::default());
        store.save(&Snapshot::default()).unwrap();
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load().unwrap(), Snapshot::default());
    }

    #[test]
    fn test_failing_store() {
        let store = MemoryStore::failing();
        assert!(store.save(&Snapshot::default()).is_err());
        assert_eq!(store.save_count(), 0);
        assert!(store.snapshot().is_none());
    }
}
