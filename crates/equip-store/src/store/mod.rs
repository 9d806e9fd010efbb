//! # Snapshot Stores
//!
//! Implementations of the persistence boundary.
//!
//! ## Store Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    SnapshotStore                                        │
//! │                                                                         │
//! │  Registry ──Snapshot::of──► Snapshot ──save──► file(s)                  │
//! │  Registry ◄──restore────── Snapshot ◄──load─── file(s)                  │
//! │                                                                         │
//! │  ┌────────────┐  ┌────────────┐  ┌─────────────┐  ┌────────────────┐   │
//! │  │ JsonStore  │  │  CsvStore  │  │ MemoryStore │  │ MirroredStore  │   │
//! │  │ 1 document │  │ 2 tables   │  │ tests       │  │ primary + N    │   │
//! │  └────────────┘  └────────────┘  └─────────────┘  └────────────────┘   │
//! │                                                                         │
//! │  Whole-snapshot only: no incremental writes, no write-ahead log.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Stores
//!
//! - [`JsonStore`] - Pretty JSON document
//! - [`CsvStore`] - Units table plus date ledger table
//! - [`MemoryStore`] - In-process, for tests and dry runs
//! - [`MirroredStore`] - Autosave to several stores at once

pub mod csv;
pub mod json;
pub mod memory;
pub mod mirror;

pub use self::csv::CsvStore;
pub use self::json::JsonStore;
pub use self::memory::MemoryStore;
pub use self::mirror::MirroredStore;

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use equip_core::Snapshot;

use crate::error::{StoreError, StoreResult};

/// Loads and saves whole snapshots.
pub trait SnapshotStore: fmt::Debug + Send + Sync {
    /// Reads the last saved snapshot.
    ///
    /// Returns [`StoreError::NotFound`] when nothing was saved yet.
    fn load(&self) -> StoreResult<Snapshot>;

    /// Replaces the saved snapshot.
    fn save(&self, snapshot: &Snapshot) -> StoreResult<()>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// Reads a UTF-8 text file, dropping a leading byte-order mark.
///
/// Spreadsheet tools often save CSV with a BOM.
pub(crate) fn read_text(path: &Path) -> StoreResult<String> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            Err(StoreError::not_found(path.display().to_string()))
        }
        Err(err) => Err(StoreError::io(path, err)),
    }
}

/// Writes a file through a sibling temp file and a rename, so a crash
/// mid-write leaves the previous file intact.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = Path::new(&tmp_name);

    let mut file = fs::File::create(tmp).map_err(|err| StoreError::io(tmp, err))?;
    file.write_all(bytes).map_err(|err| StoreError::io(tmp, err))?;
    file.sync_all().map_err(|err| StoreError::io(tmp, err))?;
    drop(file);

    fs::rename(tmp, path).map_err(|err| StoreError::io(path, err))
}

/// Renames an existing file to `<path>.bak`, replacing an older backup.
///
/// Returns the backup path, or `None` when there was nothing to move.
pub(crate) fn back_up(path: &Path) -> StoreResult<Option<PathBuf>> {
    let mut bak_name = path.as_os_str().to_owned();
    bak_name.push(".bak");
    let bak = PathBuf::from(bak_name);

    match fs::rename(path, &bak) {
        Ok(()) => Ok(Some(bak)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(StoreError::io(path, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_text_strips_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bom.csv");
        fs::write(&path, "\u{feff}imei,date\n").unwrap();
        assert_eq!(read_text(&path).unwrap(), "imei,date\n");
    }

    #[test]
    fn test_read_text_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_text(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_back_up_moves_file_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("equipment.json");
        fs::write(&path, "old").unwrap();

        let bak = back_up(&path).unwrap().unwrap();
        assert_eq!(bak, dir.path().join("equipment.json.bak"));
        assert_eq!(fs::read_to_string(&bak).unwrap(), "old");
        assert!(!path.exists());
        assert_eq!(back_up(&path).unwrap(), None);
    }

    #[test]
    fn test_write_atomic_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.json");
        write_atomic(&path, b"{}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
        assert!(!dir.path().join("nested/deeper/out.json.tmp").exists());
    }
}
