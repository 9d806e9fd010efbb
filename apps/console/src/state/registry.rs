//! # Registry State
//!
//! The in-memory registry shared by every command.
//!
//! ## Registry Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operator Action        Command                 Registry Change         │
//! │  ───────────────        ───────                 ───────────────         │
//! │                                                                         │
//! │  add ─────────────────► add_unit() ───────────► Active.push(unit)      │
//! │  diag ────────────────► move_to_diagnostic() ─► Active → UnderDiag     │
//! │  faulty ──────────────► move_to_faulty() ─────► Active → Faulty        │
//! │  edit ────────────────► edit_unit() ──────────► unit fields in place   │
//! │  load csv|json ───────► load() ───────────────► whole registry swapped │
//! │  find, sort, top ... ─► (read only)                                    │
//! │                                                                         │
//! │  All operations, reads included, take the Mutex lock.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use equip_core::Registry;

/// Shared registry state.
///
/// `Arc` so a future second front end can hold the same registry;
/// `Mutex` so mutating operations are serialized.
#[derive(Debug, Clone, Default)]
pub struct RegistryState {
    registry: Arc<Mutex<Registry>>,
}

impl RegistryState {
    /// Wraps a loaded registry.
    pub fn new(registry: Registry) -> Self {
        RegistryState {
            registry: Arc::new(Mutex::new(registry)),
        }
    }

    // A panic while holding the lock cannot leave a pool half-moved: every
    // registry operation validates before it mutates.
    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Executes a function with read access to the registry.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let counts = registry_state.with_registry(|r| r.counts());
    /// ```
    pub fn with_registry<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Registry) -> R,
    {
        let registry = self.lock();
        f(&registry)
    }

    /// Executes a function with write access to the registry.
    pub fn with_registry_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Registry) -> R,
    {
        let mut registry = self.lock();
        f(&mut registry)
    }

    /// Swaps in a whole new registry.
    pub fn replace(&self, registry: Registry) {
        *self.lock() = registry;
    }
}
