//! # CSV Store
//!
//! Two delimited tables, each with a header row:
//!
//! ```text
//! equipment.csv
//! pool,branch,imei,brand,model,status,condition,location,date
//! active,альфа,123456789012,самсунг,4567,исправен,установлен,склад,2022-01-01
//!
//! dates.csv
//! imei,date
//! 123456789012,2022-01-01
//! ```
//!
//! Columns are matched by header name, so column order in hand-edited files
//! does not matter. A missing `date` column reads as unknown dates; a
//! missing `dates.csv` reads as an empty ledger.

use std::path::PathBuf;

use equip_core::{LedgerRow, Snapshot, SnapshotRow};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::{read_text, write_atomic, SnapshotStore};
use crate::error::{StoreError, StoreResult};

const UNIT_COLUMNS: [&str; 9] = [
    "pool",
    "branch",
    "imei",
    "brand",
    "model",
    "status",
    "condition",
    "location",
    "date",
];

const LEDGER_COLUMNS: [&str; 2] = ["imei", "date"];

/// Snapshot as a units CSV plus a date ledger CSV.
#[derive(Debug, Clone)]
pub struct CsvStore {
    units_path: PathBuf,
    dates_path: PathBuf,
}

impl CsvStore {
    pub fn new(units_path: impl Into<PathBuf>, dates_path: impl Into<PathBuf>) -> Self {
        CsvStore {
            units_path: units_path.into(),
            dates_path: dates_path.into(),
        }
    }

    fn read_table<T: DeserializeOwned>(path: &std::path::Path) -> StoreResult<Vec<T>> {
        let text = read_text(path)?;
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());
        reader
            .deserialize()
            .collect::<Result<Vec<T>, _>>()
            .map_err(|err| StoreError::csv(path, err))
    }

    fn write_table<T: Serialize>(
        path: &std::path::Path,
        header: &[&str],
        rows: &[T],
    ) -> StoreResult<()> {
        // Header written by hand so an empty table still has one.
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer
            .write_record(header)
            .map_err(|err| StoreError::csv(path, err))?;
        for row in rows {
            writer
                .serialize(row)
                .map_err(|err| StoreError::csv(path, err))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| StoreError::io(path, err.into_error()))?;
        write_atomic(path, &bytes)
    }
}

impl SnapshotStore for CsvStore {
    fn load(&self) -> StoreResult<Snapshot> {
        let units: Vec<SnapshotRow> = Self::read_table(&self.units_path)?;
        let dates: Vec<LedgerRow> = match Self::read_table(&self.dates_path) {
            Ok(dates) => dates,
            Err(err) if err.is_not_found() => {
                debug!(path = %self.dates_path.display(), "No date ledger file, starting with empty ledger");
                Vec::new()
            }
            Err(err) => return Err(err),
        };

        debug!(units = units.len(), dates = dates.len(), "Loaded CSV snapshot");
        Ok(Snapshot { units, dates })
    }

    fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        Self::write_table(&self.units_path, &UNIT_COLUMNS, &snapshot.units)?;
        Self::write_table(&self.dates_path, &LEDGER_COLUMNS, &snapshot.dates)?;
        debug!(units = snapshot.units.len(), path = %self.units_path.display(), "Saved CSV snapshot");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.units_path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn store(dir: &tempfile::TempDir) -> CsvStore {
        CsvStore::new(dir.path().join("equipment.csv"), dir.path().join("dates.csv"))
    }

    fn sample() -> Snapshot {
        Snapshot {
            units: vec![
                SnapshotRow {
                    pool: "active".into(),
                    branch: "альфа".into(),
                    imei: "123456789012".into(),
                    brand: "самсунг".into(),
                    model: "4567".into(),
                    status: "исправен".into(),
                    condition: "установлен".into(),
                    location: "склад".into(),
                    date: "2022-01-01".into(),
                },
                SnapshotRow {
                    pool: "faulty".into(),
                    branch: "бета".into(),
                    imei: "0042".into(),
                    brand: "нокиа".into(),
                    model: "3310".into(),
                    status: "неисправен".into(),
                    condition: "ремонт".into(),
                    location: "склад".into(),
                    date: String::new(),
                },
            ],
            dates: vec![LedgerRow {
                imei: "123456789012".into(),
                date: "2022-01-01".into(),
            }],
        }
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        store.save(&sample()).unwrap();

        let text = fs::read_to_string(dir.path().join("equipment.csv")).unwrap();
        assert!(text.starts_with("pool,branch,imei,brand,model,status,condition,location,date\n"));
        assert!(text.contains("faulty,бета,0042,нокиа,3310,неисправен,ремонт,склад,\n"));

        assert_eq!(store.load().unwrap(), sample());
    }

    #[test]
    fn test_empty_snapshot_keeps_headers() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        store.save(&Snapshot::default()).unwrap();

        let text = fs::read_to_string(dir.path().join("dates.csv")).unwrap();
        assert_eq!(text, "imei,date\n");
        assert_eq!(store.load().unwrap(), Snapshot::default());
    }

    #[test]
    fn test_missing_units_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store(&dir).load().unwrap_err().is_not_found());
    }

    #[test]
    fn test_missing_dates_file_is_empty_ledger() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("equipment.csv"),
            "branch,imei,brand,model,status,condition,location,pool\n\
             альфа,111,самсунг,1,исправен,установлен,тс,active\n",
        )
        .unwrap();

        let snapshot = store(&dir).load().unwrap();
        assert!(snapshot.dates.is_empty());
        assert_eq!(snapshot.units.len(), 1);
        assert_eq!(snapshot.units[0].location, "тс");
        assert_eq!(snapshot.units[0].date, "");
    }

    #[test]
    fn test_malformed_file_is_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("equipment.csv"), "pool,branch\nactive\n").unwrap();
        let err = store(&dir).load().unwrap_err();
        assert!(matches!(err, StoreError::Csv { .. }));
    }
}
