//! Command line flags.

use std::path::PathBuf;

use clap::Parser;
use equip_store::SnapshotFormat;

/// Interactive equipment tracker.
///
/// Flags override `EQUIP_*` environment variables, which override defaults.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "equip", author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding equipment.json, equipment.csv and dates.csv
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Encoding loaded at startup and saved first (json or csv)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<SnapshotFormat>,

    /// Save only the primary encoding
    #[arg(long)]
    pub no_mirror: bool,

    /// Length of the faulty-branch ranking
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "equip",
            "--data-dir",
            "/srv/equip",
            "--format",
            "csv",
            "--no-mirror",
            "--top",
            "5",
        ])
        .unwrap();

        assert_eq!(args.data_dir, Some(PathBuf::from("/srv/equip")));
        assert_eq!(args.format, Some(SnapshotFormat::Csv));
        assert!(args.no_mirror);
        assert_eq!(args.top, Some(5));
    }

    #[test]
    fn test_no_flags() {
        let args = Args::try_parse_from(["equip"]).unwrap();
        assert!(args.data_dir.is_none());
        assert!(!args.no_mirror);
    }

    #[test]
    fn test_bad_format_rejected() {
        assert!(Args::try_parse_from(["equip", "--format", "xml"]).is_err());
    }
}
