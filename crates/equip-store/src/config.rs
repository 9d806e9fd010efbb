//! # Store Configuration
//!
//! Where snapshots live and in which encodings.
//!
//! ## Data Directory Layout
//! ```text
//! <data_dir>/
//! ├── equipment.json   ◄─── JsonStore (primary by default)
//! ├── equipment.csv    ◄─── CsvStore units table
//! └── dates.csv        ◄─── CsvStore date ledger table
//! ```
//!
//! With mirroring on (the default) every save writes both encodings, and
//! loads read the primary one.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::store::{CsvStore, JsonStore, MirroredStore, SnapshotStore};

/// JSON document file name.
pub const JSON_FILE: &str = "equipment.json";

/// CSV units table file name.
pub const UNITS_CSV: &str = "equipment.csv";

/// CSV date ledger table file name.
pub const DATES_CSV: &str = "dates.csv";

// =============================================================================
// Snapshot Format
// =============================================================================

/// A concrete snapshot encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    /// One pretty-printed JSON document.
    #[default]
    Json,
    /// Two CSV tables with header rows.
    Csv,
}

impl SnapshotFormat {
    pub const ALL: [SnapshotFormat; 2] = [SnapshotFormat::Json, SnapshotFormat::Csv];

    pub const fn as_str(&self) -> &'static str {
        match self {
            SnapshotFormat::Json => "json",
            SnapshotFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for SnapshotFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnapshotFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(SnapshotFormat::Json),
            "csv" => Ok(SnapshotFormat::Csv),
            other => Err(format!("unknown snapshot format '{other}' (expected json or csv)")),
        }
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Store configuration.
///
/// ## Example
/// ```rust
/// use equip_store::{SnapshotFormat, StoreConfig};
///
/// let config = StoreConfig::new("./data")
///     .format(SnapshotFormat::Csv)
///     .mirror(false);
/// assert_eq!(config.format, SnapshotFormat::Csv);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding the snapshot files. Created on first save.
    pub data_dir: PathBuf,

    /// Encoding loaded at startup and saved first.
    /// Default: JSON
    pub format: SnapshotFormat,

    /// Also save every other encoding on each save.
    /// Default: true
    pub mirror: bool,
}

impl StoreConfig {
    /// Creates a configuration for the given data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        StoreConfig {
            data_dir: data_dir.into(),
            format: SnapshotFormat::default(),
            mirror: true,
        }
    }

    /// Sets the primary format.
    pub fn format(mut self, format: SnapshotFormat) -> Self {
        self.format = format;
        self
    }

    /// Turns mirrored saves on or off.
    pub fn mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// A store for one encoding in the data directory.
    pub fn store_for(&self, format: SnapshotFormat) -> Box<dyn SnapshotStore> {
        match format {
            SnapshotFormat::Json => Box::new(JsonStore::new(self.data_dir.join(JSON_FILE))),
            SnapshotFormat::Csv => Box::new(CsvStore::new(
                self.data_dir.join(UNITS_CSV),
                self.data_dir.join(DATES_CSV),
            )),
        }
    }

    /// Every snapshot file this configuration may read or write.
    pub fn snapshot_files(&self) -> [PathBuf; 3] {
        [JSON_FILE, UNITS_CSV, DATES_CSV].map(|name| self.data_dir.join(name))
    }

    /// The store described by this configuration.
    pub fn build(&self) -> Box<dyn SnapshotStore> {
        let primary = self.store_for(self.format);
        if !self.mirror {
            return primary;
        }
        let mirrors = SnapshotFormat::ALL
            .into_iter()
            .filter(|format| *format != self.format)
            .map(|format| self.store_for(format))
            .collect();
        Box::new(MirroredStore::new(primary, mirrors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = StoreConfig::new("/tmp/equip")
            .format(SnapshotFormat::Csv)
            .mirror(false);

        assert_eq!(config.data_dir, PathBuf::from("/tmp/equip"));
        assert_eq!(config.format, SnapshotFormat::Csv);
        assert!(!config.mirror);
    }

    #[test]
    fn test_defaults() {
        let config = StoreConfig::new("/tmp/equip");
        assert_eq!(config.format, SnapshotFormat::Json);
        assert!(config.mirror);
        assert!(config.build().describe().contains(JSON_FILE));
        assert!(config.build().describe().contains(UNITS_CSV));
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(" CSV ".parse::<SnapshotFormat>(), Ok(SnapshotFormat::Csv));
        assert!("xlsx".parse::<SnapshotFormat>().is_err());
    }
}
