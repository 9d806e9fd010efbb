//! # State Module
//!
//! Application state for the console.
//!
//! Instead of a single `AppState` struct containing everything, each concern
//! has its own state type and commands take only the ones they need.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │  RegistryState   │  │  StorageState    │  │   ConfigState        │  │
//! │  │                  │  │                  │  │                      │  │
//! │  │  Arc<Mutex<      │  │  Storage         │  │  data_dir            │  │
//! │  │    Registry      │  │  (primary +      │  │  format, mirror      │  │
//! │  │  >>              │  │   mirrors)       │  │  top_n               │  │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • RegistryState: every command holds the lock for its whole call      │
//! │  • StorageState: stores are Send + Sync, whole-file writes             │
//! │  • ConfigState: read-only after startup                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod registry;
mod storage;

pub use config::{default_data_dir, ConfigState};
pub use registry::RegistryState;
pub use storage::StorageState;
