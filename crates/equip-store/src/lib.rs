//! # equip-store: Snapshot Persistence for the Equipment Tracker
//!
//! This crate provides every file the tracker reads or writes.
//! The registry is saved whole, as CSV tables and/or a JSON document.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Equipment Tracker Data Flow                         │
//! │                                                                         │
//! │  Console command (add / diag / faulty / edit / save / quit)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   equip-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Storage     │    │    Stores     │    │   Config     │  │   │
//! │  │   │ (storage.rs)  │    │  (store/*.rs) │    │ (config.rs)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ hydrate       │    │ JsonStore     │    │ data_dir     │  │   │
//! │  │   │ persist       │◄───│ CsvStore      │    │ format       │  │   │
//! │  │   │ reload_from   │    │ MirroredStore │    │ mirror       │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                        Data directory                           │   │
//! │  │        equipment.json  •  equipment.csv  •  dates.csv           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Data directory, primary format, mirroring
//! - [`store`] - [`SnapshotStore`] and its implementations
//! - [`storage`] - Startup hydration, autosave and explicit reload
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use equip_store::{Storage, StoreConfig};
//!
//! let storage = Storage::open(StoreConfig::new("./data"));
//!
//! // Never fails: a broken snapshot yields an empty registry.
//! let hydration = storage.hydrate();
//! let registry = hydration.registry;
//!
//! // Writes equipment.json, equipment.csv and dates.csv.
//! storage.persist(&registry)?;
//! # Ok::<(), equip_store::StoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod storage;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{SnapshotFormat, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use storage::{load_or_empty, Hydration, Storage};

// Store re-exports for convenience
pub use store::{CsvStore, JsonStore, MemoryStore, MirroredStore, SnapshotStore};
