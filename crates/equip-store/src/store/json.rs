//! # JSON Store
//!
//! One document with the unit rows and the date ledger:
//!
//! ```text
//! {
//!     "units": [ { "pool": "active", "branch": "альфа", ... } ],
//!     "dates": [ { "imei": "123456789012", "date": "2022-01-01" } ]
//! }
//! ```

use std::path::PathBuf;

use equip_core::Snapshot;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use super::{read_text, write_atomic, SnapshotStore};
use crate::error::{StoreError, StoreResult};

/// Snapshot as a single pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonStore { path: path.into() }
    }

    fn encode(&self, snapshot: &Snapshot) -> StoreResult<Vec<u8>> {
        let mut bytes = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut bytes, PrettyFormatter::with_indent(b"    "));
        snapshot
            .serialize(&mut serializer)
            .map_err(|err| StoreError::json(&self.path, err))?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

impl SnapshotStore for JsonStore {
    fn load(&self) -> StoreResult<Snapshot> {
        let text = read_text(&self.path)?;
        let snapshot: Snapshot =
            serde_json::from_str(&text).map_err(|err| StoreError::json(&self.path, err))?;
        debug!(units = snapshot.units.len(), dates = snapshot.dates.len(), "Loaded JSON snapshot");
        Ok(snapshot)
    }

    fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let bytes = self.encode(snapshot)?;
        write_atomic(&self.path, &bytes)?;
        debug!(units = snapshot.units.len(), path = %self.path.display(), "Saved JSON snapshot");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}
