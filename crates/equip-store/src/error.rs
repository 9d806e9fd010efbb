//! # Store Error Types
//!
//! Error types for snapshot load/save.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io / csv / serde_json / SnapshotError                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds the file path                         │
//! │       │                                                                 │
//! │       ├── on startup load ──► empty registry, warned once              │
//! │       │                                                                 │
//! │       └── on save ──► ApiError in the console, state kept              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};

use equip_core::SnapshotError;
use thiserror::Error;

/// Snapshot persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Nothing has been saved at this location yet.
    ///
    /// ## When This Occurs
    /// - First start with a fresh data directory
    /// - An empty in-memory store
    #[error("No snapshot at {location}")]
    NotFound { location: String },

    /// File system failure.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV file could not be read or written.
    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// JSON document could not be read or written.
    #[error("JSON error in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Rows were readable but do not form a valid registry.
    #[error("Invalid snapshot: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Saving refused: the snapshot on disk could not be loaded at startup
    /// and would be overwritten.
    ///
    /// Cleared by a successful reload or by [`crate::Storage::release`].
    #[error("Saved data in {location} was not loaded ({reason}); refusing to overwrite it")]
    Protected { location: String, reason: String },
}

impl StoreError {
    pub fn not_found(location: impl Into<String>) -> Self {
        StoreError::NotFound {
            location: location.into(),
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn csv(path: &Path, source: csv::Error) -> Self {
        StoreError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn json(path: &Path, source: serde_json::Error) -> Self {
        StoreError::Json {
            path: path.to_path_buf(),
            source,
        }
    }

    /// True for "no data yet", as opposed to a broken file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, StoreError::Protected { .. })
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
