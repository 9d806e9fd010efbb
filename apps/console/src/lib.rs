//! # Equipment Console Library
//!
//! Interactive console for the equipment tracker. `main.rs` parses the
//! command line and hands over to [`run`].
//!
//! ## Module Organization
//! ```text
//! equip_console/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── cli.rs          ◄─── Command-line flags
//! ├── shell.rs        ◄─── Command loop and interactive flows
//! ├── prompt.rs       ◄─── Terminal and scripted prompts
//! ├── render.rs       ◄─── Plain-text output
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── registry.rs ◄─── Shared registry
//! │   ├── storage.rs  ◄─── Snapshot storage wrapper
//! │   └── config.rs   ◄─── Environment and flag configuration
//! ├── commands/
//! │   ├── mod.rs      ◄─── UnitCard, Saved, autosave
//! │   ├── unit.rs     ◄─── add / find / edit / move commands
//! │   ├── report.rs   ◄─── sort, top, distributions
//! │   ├── storage.rs  ◄─── save / load
//! │   └── config.rs   ◄─── about / help
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## State
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐    │
//! │  │  RegistryState   │ │  StorageState    │ │    ConfigState       │    │
//! │  │                  │ │                  │ │                      │    │
//! │  │  • Three pools   │ │  • Primary store │ │  • Data directory    │    │
//! │  │  • Date ledger   │ │  • Mirror store  │ │  • Format, mirror    │    │
//! │  │                  │ │                  │ │  • Ranking length    │    │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘    │
//! │                                                                         │
//! │  Each command takes only the state it reads.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod prompt;
pub mod render;
pub mod shell;
pub mod state;

use std::io;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::Args;
use equip_store::{Storage, StoreError};
use prompt::ConsolePrompt;
use shell::Shell;
use state::{ConfigState, RegistryState, StorageState};

/// Runs the console until `quit` or end of input.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Initialize Logging (stderr, RUST_LOG overrides the default)         │
/// │                                                                         │
/// │  2. Resolve Configuration                                               │
/// │     • defaults ◄── EQUIP_* environment ◄── command-line flags           │
/// │                                                                         │
/// │  3. Hydrate the Registry                                                │
/// │     • no saved data: start empty                                        │
/// │     • unreadable or invalid data: start empty, tell the operator once  │
/// │                                                                         │
/// │  4. Run the Shell on stdin/stdout                                       │
/// │                                                                         │
/// │  5. Exit: failure only when the final save failed                       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run(args: Args) -> ExitCode {
    init_tracing();

    let config = ConfigState::from_env().with_args(&args);
    info!(
        data_dir = %config.data_dir.display(),
        format = %config.format,
        mirror = config.mirror,
        "Starting equipment console"
    );

    let storage = Storage::open(config.store_config());
    let hydration = storage.hydrate();
    info!(
        units = hydration.registry.len(),
        backfilled = hydration.backfilled,
        store = %storage.describe(),
        "Registry ready"
    );

    let notice = hydration.degraded.as_ref().map(startup_notice);
    let registry = RegistryState::new(hydration.registry);
    let prompt = ConsolePrompt::new(io::stdin().lock(), io::stdout());
    let today = chrono::Local::now().date_naive();

    let mut shell = Shell::new(registry, StorageState::new(storage), config, prompt, today);
    if let Some(notice) = notice {
        shell.notify(&notice);
    }

    match shell.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Exiting without a final save");
            ExitCode::FAILURE
        }
    }
}

/// Operator message for a startup load that fell back to an empty registry.
///
/// `load_or_empty` has already logged the failure; this only formats it.
pub fn startup_notice(degraded: &StoreError) -> String {
    format!(
        "Saved data could not be loaded ({degraded}). Starting with an empty registry; \
         the saved files are not overwritten until you load or confirm a save."
    )
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so they never mix with the prompt on stdout.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=equip_store=trace` - Trace the storage crate only
/// - Default: INFO, DEBUG for the equip crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,equip=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
