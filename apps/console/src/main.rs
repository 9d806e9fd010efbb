//! # Equipment Tracker Console Entry Point
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Equipment Tracker Console                        │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Terminal                                    │  │
//! │  │   command: find                                                  │  │
//! │  │   branch: альфа                                                  │  │
//! │  │   imei: 123456789012                                             │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    Rust Backend (this crate)                     │  │
//! │  │                                                                  │  │
//! │  │  main.rs ────► Parses flags, hands over to lib.rs               │  │
//! │  │                                                                  │  │
//! │  │  lib.rs ─────► Logging, config, storage, state                  │  │
//! │  │                                                                  │  │
//! │  │  shell.rs ───► Command loop and interactive flows               │  │
//! │  │                                                                  │  │
//! │  │  commands/ ──► add, find, edit, move, reports, save/load        │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                         Data directory                           │  │
//! │  │  equipment.json • equipment.csv • dates.csv                      │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let args = equip_console::cli::Args::parse();
    equip_console::run(args)
}
