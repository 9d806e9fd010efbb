//! # Storage State
//!
//! Wraps the configured `Storage` for use in commands.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! pub fn save(registry: &RegistryState, storage: &StorageState) -> Result<SaveReport, ApiError> {
//!     registry.with_registry(|r| storage.inner().persist(r))?;
//!     ...
//! }
//! ```

use equip_store::Storage;

/// Wrapper around `Storage` for console state management.
#[derive(Debug)]
pub struct StorageState {
    storage: Storage,
}

impl StorageState {
    pub fn new(storage: Storage) -> Self {
        StorageState { storage }
    }

    /// Returns a reference to the inner Storage.
    pub fn inner(&self) -> &Storage {
        &self.storage
    }
}
