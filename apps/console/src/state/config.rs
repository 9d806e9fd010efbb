//! # Configuration State
//!
//! Stores application configuration resolved at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command line flags (`--data-dir`, `--format`, `--no-mirror`, `--top`)
//! 2. Environment variables (`EQUIP_*`)
//! 3. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::PathBuf;

use directories::ProjectDirs;
use equip_core::report::DEFAULT_TOP_N;
use equip_store::{SnapshotFormat, StoreConfig};
use serde::Serialize;
use tracing::warn;

use crate::cli::Args;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Where snapshot files live.
    /// Default: the platform data directory
    pub data_dir: PathBuf,

    /// Encoding loaded at startup.
    /// Default: json
    pub format: SnapshotFormat,

    /// Save every encoding on each change.
    /// Default: true
    pub mirror: bool,

    /// Entries in the faulty-branch ranking when `top` has no argument.
    /// Default: 10
    pub top_n: usize,
}

/// Platform data directory, or `./data` when the platform has none.
///
/// ## Platform-Specific Paths
/// - **Linux**: `~/.local/share/equip-tracker`
/// - **macOS**: `~/Library/Application Support/com.equip.tracker`
/// - **Windows**: `%APPDATA%\equip\tracker\data`
pub fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "equip", "tracker")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("data"))
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            data_dir: default_data_dir(),
            format: SnapshotFormat::default(),
            mirror: true,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl ConfigState {
    /// Defaults overridden by the process environment.
    ///
    /// ## Environment Variables
    /// - `EQUIP_DATA_DIR`: data directory
    /// - `EQUIP_FORMAT`: `json` or `csv`
    /// - `EQUIP_MIRROR`: `true`/`false` (also `1`/`0`, `yes`/`no`, `on`/`off`)
    /// - `EQUIP_TOP_N`: positive integer
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();

        if let Some(dir) = lookup("EQUIP_DATA_DIR").filter(|dir| !dir.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup("EQUIP_FORMAT") {
            match raw.parse() {
                Ok(format) => config.format = format,
                Err(err) => warn!(value = %raw, error = %err, "Ignoring EQUIP_FORMAT"),
            }
        }

        if let Some(raw) = lookup("EQUIP_MIRROR") {
            match parse_flag(&raw) {
                Some(mirror) => config.mirror = mirror,
                None => warn!(value = %raw, "Ignoring EQUIP_MIRROR, expected true or false"),
            }
        }

        if let Some(raw) = lookup("EQUIP_TOP_N") {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.top_n = n,
                _ => warn!(value = %raw, "Ignoring EQUIP_TOP_N, expected a positive integer"),
            }
        }

        config
    }

    /// Applies command line flags on top.
    pub fn with_args(mut self, args: &Args) -> Self {
        if let Some(dir) = &args.data_dir {
            self.data_dir = dir.clone();
        }
        if let Some(format) = args.format {
            self.format = format;
        }
        if args.no_mirror {
            self.mirror = false;
        }
        if let Some(n) = args.top.filter(|n| *n > 0) {
            self.top_n = n;
        }
        self
    }

    /// Store configuration for `equip-store`.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(&self.data_dir)
            .format(self.format)
            .mirror(self.mirror)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
