//! # Shell
//!
//! The command loop and the interactive flows. Flows only sequence prompts
//! and command calls; every rule lives in `equip-core`.
//!
//! ## Flows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add     ask 8 fields ──► add_unit ──► card                             │
//! │                                                                         │
//! │  find    ask branch, imei ──► find_unit                                 │
//! │             ├─ found ──► card ──► "Edit?" ──► edit flow                 │
//! │             └─ not found ──► locate_unit ──► "Show that record?"        │
//! │                                                                         │
//! │  edit    ask branch, imei ──► ask status, condition, location           │
//! │          (blank keeps the current value)                                │
//! │                                                                         │
//! │  diag / faulty   ask branch, imei ──► move ──► card                     │
//! │                                                                         │
//! │  quit / end of input ──► save ──► exit                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::str::FromStr;

use chrono::NaiveDate;
use equip_core::report::SortKey;
use equip_core::{Field, RawUnitFields, UnitEdit, UserPrompt};
use equip_store::SnapshotFormat;
use tracing::{debug, error};

use crate::commands::storage::SaveReport;
use crate::commands::{self, Saved, UnitCard};
use crate::error::ApiError;
use crate::render;
use crate::state::{ConfigState, RegistryState, StorageState};

/// One parsed command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Add,
    Find,
    Edit,
    Diag,
    Faulty,
    Sort(SortKey),
    /// Ranking length; `None` uses the configured default.
    Top(Option<usize>),
    Dist,
    Loc,
    Save,
    Load(SnapshotFormat),
    About,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = ApiError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let lowered = line.trim().to_lowercase();
        let mut words = lowered.split_whitespace();
        let name = words.next().unwrap_or_default();
        let arg = words.next();
        if words.next().is_some() {
            return Err(ApiError::validation(format!("Too many arguments: '{}'", line.trim())));
        }

        let command = match (name, arg) {
            ("add", None) => Command::Add,
            ("find", None) => Command::Find,
            ("edit", None) => Command::Edit,
            ("diag", None) => Command::Diag,
            ("faulty", None) => Command::Faulty,
            ("sort", Some("date")) => Command::Sort(SortKey::Date),
            ("sort", Some("condition")) => Command::Sort(SortKey::Condition),
            ("sort", _) => return Err(ApiError::validation("Usage: sort date|condition")),
            ("top", None) => Command::Top(None),
            ("top", Some(n)) => match n.parse::<usize>() {
                Ok(n) if n > 0 => Command::Top(Some(n)),
                _ => return Err(ApiError::validation("Usage: top [n], n a positive number")),
            },
            ("dist", None) => Command::Dist,
            ("loc", None) => Command::Loc,
            ("save", None) => Command::Save,
            ("load", Some(format)) => Command::Load(
                format
                    .parse()
                    .map_err(|_| ApiError::validation("Usage: load csv|json"))?,
            ),
            ("load", None) => return Err(ApiError::validation("Usage: load csv|json")),
            ("about", None) => Command::About,
            ("help", None) | ("?", None) => Command::Help,
            ("quit", None) | ("exit", None) => Command::Quit,
            _ => {
                return Err(ApiError::validation(format!(
                    "Unknown command '{}'. Type help for the list.",
                    line.trim()
                )))
            }
        };
        Ok(command)
    }
}

/// Whether the loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interactive session over one registry.
#[derive(Debug)]
pub struct Shell<P> {
    registry: RegistryState,
    storage: StorageState,
    config: ConfigState,
    prompt: P,
    today: NaiveDate,
}

impl<P: UserPrompt> Shell<P> {
    pub fn new(
        registry: RegistryState,
        storage: StorageState,
        config: ConfigState,
        prompt: P,
        today: NaiveDate,
    ) -> Self {
        Shell {
            registry,
            storage,
            config,
            prompt,
            today,
        }
    }

    pub fn registry(&self) -> &RegistryState {
        &self.registry
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    /// Shows a message outside any command.
    pub fn notify(&mut self, message: &str) {
        self.prompt.notify(message);
    }

    /// Reads and runs commands until `quit` or end of input.
    ///
    /// Both endings save. The final save's error, if any, is returned.
    pub fn run(&mut self) -> Result<(), ApiError> {
        self.prompt.notify("Type help for the list of commands.");
        loop {
            let Some(line) = self.prompt.ask_field("command") else {
                return self.quit();
            };
            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<Command>() {
                Ok(Command::Quit) => return self.quit(),
                Ok(command) => {
                    if self.execute(command) == Flow::Quit {
                        return Ok(());
                    }
                }
                Err(err) => self.show_error(&err),
            }
        }
    }

    /// Runs a single command.
    pub fn execute(&mut self, command: Command) -> Flow {
        debug!(?command, "Executing");
        match command {
            Command::Add => self.add_flow(),
            Command::Find => self.find_flow(),
            Command::Edit => self.edit_flow(),
            Command::Diag => self.move_flow(commands::unit::move_to_diagnostic, "diagnostics"),
            Command::Faulty => self.move_flow(commands::unit::move_to_faulty, "the faulty pool"),
            Command::Sort(key) => {
                let cards = commands::report::sort_units(&self.registry, key, self.today);
                self.prompt.notify(&render::unit_table(&cards));
            }
            Command::Top(n) => {
                let ranking =
                    commands::report::top_faulty(&self.registry, n.unwrap_or(self.config.top_n));
                self.prompt.notify(&render::ranking(&ranking));
            }
            Command::Dist => {
                let counts = commands::report::condition_distribution(&self.registry);
                self.prompt.notify(&render::pivot(&counts));
            }
            Command::Loc => {
                let counts = commands::report::location_distribution(&self.registry);
                self.prompt.notify(&render::pivot(&counts));
            }
            Command::Save => match self.save_now() {
                Ok(Some(report)) => self
                    .prompt
                    .notify(&format!("Saved {} units to {}.", report.units, report.target)),
                Ok(None) => {}
                Err(err) => self.show_error(&err),
            },
            Command::Load(format) => {
                match commands::storage::load(&self.registry, &self.storage, format) {
                    Ok(report) => self.prompt.notify(&format!(
                        "Loaded {} units from {} ({} dates filled from the ledger).",
                        report.units, report.format, report.backfilled
                    )),
                    Err(err) => {
                        self.show_error(&err);
                        self.prompt.notify("The current registry was kept.");
                    }
                }
            }
            Command::About => {
                let info = commands::config::about(&self.config, &self.registry, &self.storage);
                self.prompt.notify(&render::about(&info));
            }
            Command::Help => self.prompt.notify(&render::help()),
            Command::Quit => {
                if let Err(err) = self.quit() {
                    error!(error = %err, "Final save failed");
                }
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    fn quit(&mut self) -> Result<(), ApiError> {
        let result = self.save_now().map(|_| ());
        if let Err(err) = &result {
            self.show_error(err);
        }
        self.prompt.notify("Bye.");
        result
    }

    /// Saves, asking before replacing files that failed to load at startup.
    ///
    /// `Ok(None)` means the operator chose to leave those files alone.
    fn save_now(&mut self) -> Result<Option<SaveReport>, ApiError> {
        match commands::storage::save(&self.registry, &self.storage) {
            Err(err) if err.is_protected() => {
                self.show_error(&err);
                if !self
                    .prompt
                    .confirm("Move the saved files to .bak and save the current registry?")
                {
                    self.prompt.notify("Saved files left untouched.");
                    return Ok(None);
                }
                for backup in commands::storage::release(&self.storage)? {
                    self.prompt.notify(&format!("Moved aside: {backup}"));
                }
                commands::storage::save(&self.registry, &self.storage).map(Some)
            }
            result => result.map(Some),
        }
    }

    // -------------------------------------------------------------------------
    // Flows
    // -------------------------------------------------------------------------

    fn add_flow(&mut self) {
        let mut raw = RawUnitFields::default();
        for field in Field::ALL {
            let Some(value) = self.prompt.ask_field(field.as_str()) else {
                self.prompt.notify("Cancelled.");
                return;
            };
            raw.set(field, value);
        }

        match commands::unit::add_unit(&self.registry, &self.storage, &raw, self.today) {
            Ok(saved) => self.show_saved("Unit added.", saved, render::unit_card),
            Err(err) => self.show_error(&err),
        }
    }

    fn find_flow(&mut self) {
        let Some((branch, imei)) = self.ask_identity() else {
            return;
        };

        match commands::unit::find_unit(&self.registry, &branch, &imei, self.today) {
            Ok(card) => {
                self.prompt.notify(&render::unit_card(&card));
                if self.prompt.confirm("Edit this unit?") {
                    self.edit_fields(&card);
                }
            }
            Err(err) if err.is_not_found() => {
                self.show_error(&err);
                self.offer_other_pools(&imei);
            }
            Err(err) => self.show_error(&err),
        }
    }

    fn offer_other_pools(&mut self, imei: &str) {
        let found = commands::unit::locate_unit(&self.registry, imei, self.today);
        if found.is_empty() {
            self.prompt.notify("This IMEI is not tracked in any pool.");
            return;
        }
        for card in found {
            let question = format!(
                "IMEI {} is in the {} pool (branch {}). Show that record?",
                card.imei, card.pool, card.branch
            );
            if self.prompt.confirm(&question) {
                self.prompt.notify(&render::unit_card(&card));
            }
        }
    }

    fn edit_flow(&mut self) {
        let Some((branch, imei)) = self.ask_identity() else {
            return;
        };
        match commands::unit::find_unit(&self.registry, &branch, &imei, self.today) {
            Ok(card) => self.edit_fields(&card),
            Err(err) => self.show_error(&err),
        }
    }

    fn edit_fields(&mut self, card: &UnitCard) {
        let mut edit = UnitEdit::default();
        for (field, current) in [
            (Field::Status, card.status.to_string()),
            (Field::Condition, card.condition.to_string()),
            (Field::Location, card.location.to_string()),
        ] {
            let Some(value) = self.prompt.ask_field(&format!("{field} [{current}]")) else {
                self.prompt.notify("Cancelled.");
                return;
            };
            match field {
                Field::Status => edit.status = Some(value),
                Field::Condition => edit.condition = Some(value),
                _ => edit.location = Some(value),
            }
        }

        match commands::unit::edit_unit(
            &self.registry,
            &self.storage,
            &card.branch,
            &card.imei,
            &edit,
            self.today,
        ) {
            Ok(saved) => self.show_saved("", saved, render::edit_report),
            Err(err) => self.show_error(&err),
        }
    }

    fn move_flow(
        &mut self,
        command: fn(
            &RegistryState,
            &StorageState,
            &str,
            &str,
            NaiveDate,
        ) -> Result<Saved<UnitCard>, ApiError>,
        destination: &str,
    ) {
        let Some((branch, imei)) = self.ask_identity() else {
            return;
        };

        match command(&self.registry, &self.storage, &branch, &imei, self.today) {
            Ok(saved) => {
                let heading = format!("Unit moved to {destination}.");
                self.show_saved(&heading, saved, render::unit_card);
            }
            Err(err) if err.is_not_found() => {
                self.show_error(&err);
                for card in commands::unit::locate_unit(&self.registry, &imei, self.today) {
                    self.prompt.notify(&format!(
                        "IMEI {} is already in the {} pool (branch {}).",
                        card.imei, card.pool, card.branch
                    ));
                }
            }
            Err(err) => self.show_error(&err),
        }
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn ask_identity(&mut self) -> Option<(String, String)> {
        let identity = self
            .prompt
            .ask_field(Field::Branch.as_str())
            .and_then(|branch| Some((branch, self.prompt.ask_field(Field::Imei.as_str())?)));
        if identity.is_none() {
            self.prompt.notify("Cancelled.");
        }
        identity
    }

    fn show_saved<T>(&mut self, heading: &str, saved: Saved<T>, view: impl Fn(&T) -> String) {
        let body = view(&saved.value);
        if heading.is_empty() {
            self.prompt.notify(&body);
        } else {
            self.prompt.notify(&format!("{heading}\n{body}"));
        }
        if let Some(err) = saved.save_error {
            self.prompt.notify(&format!(
                "Warning: the change is kept in memory but was not saved: {}",
                err.message
            ));
        }
    }

    fn show_error(&mut self, err: &ApiError) {
        self.prompt.notify(&err.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompt;
    use equip_core::{Condition, Location, Pool, Status};
    use equip_store::{MemoryStore, Storage, StoreConfig};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn shell(prompt: ScriptedPrompt) -> Shell<ScriptedPrompt> {
        Shell::new(
            RegistryState::default(),
            StorageState::new(Storage::new(StoreConfig::new("unused"), Box::new(MemoryStore::new()))),
            ConfigState::from_lookup(|_| None),
            prompt,
            today(),
        )
    }

    const UNIT: [&str; 8] = [
        "альфа",
        "123456789012",
        "самсунг",
        "4567",
        "исправен",
        "установлен",
        "склад",
        "2022-01-01",
    ];

    fn script(lines: &[&[&str]]) -> ScriptedPrompt {
        ScriptedPrompt::new(lines.iter().flat_map(|chunk| chunk.iter().copied()))
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("add".parse::<Command>().unwrap(), Command::Add);
        assert_eq!(" SORT condition ".parse::<Command>().unwrap(), Command::Sort(SortKey::Condition));
        assert_eq!("top".parse::<Command>().unwrap(), Command::Top(None));
        assert_eq!("top 3".parse::<Command>().unwrap(), Command::Top(Some(3)));
        assert_eq!("load csv".parse::<Command>().unwrap(), Command::Load(SnapshotFormat::Csv));
        assert!("top 0".parse::<Command>().is_err());
        assert!("sort".parse::<Command>().is_err());
        assert!("load xml".parse::<Command>().is_err());
        assert!("add now".parse::<Command>().is_err());
        assert!("dance".parse::<Command>().is_err());
    }

    #[test]
    fn test_add_then_faulty_scenario() {
        let prompt = script(&[
            &["add"],
            &UNIT,
            &["faulty", "альфа", "123456789012"],
            &["find", "альфа", "123456789012"],
            &["quit"],
        ])
        .with_confirmations([false]);
        let mut shell = shell(prompt);

        shell.run().unwrap();

        let transcript = shell.prompt().transcript();
        assert!(transcript.contains("Unit added."));
        assert!(transcript.contains("Unit moved to the faulty pool."));
        assert!(transcript.contains("No active unit 123456789012 in branch альфа"));
        assert!(!transcript.contains("Show that record?"));
        assert!(transcript.ends_with("Bye."));

        shell.registry().with_registry(|r| {
            assert!(r.find_unit("альфа", "123456789012").is_none());
            let unit = r.find_in(Pool::Faulty, "альфа", "123456789012").unwrap();
            assert_eq!(unit.status, Status::Faulty);
            assert_eq!(unit.location, Location::Warehouse);
        });
        assert!(shell
            .prompt()
            .asked
            .iter()
            .any(|q| q.contains("is in the faulty pool")));
    }

    #[test]
    fn test_find_offers_edit() {
        let prompt = script(&[
            &["add"],
            &UNIT,
            &["find", "альфа", "123456789012"],
            &["", "ремонт", "тс"],
        ])
        .with_confirmations([true]);
        let mut shell = shell(prompt);

        shell.run().unwrap();

        assert!(shell.prompt().transcript().contains("Updated: condition, location"));
        shell.registry().with_registry(|r| {
            let unit = r.find_unit("альфа", "123456789012").unwrap();
            assert_eq!(unit.condition, Condition::Repair);
            assert_eq!(unit.location, Location::Vehicle);
            assert_eq!(unit.status, Status::Operational);
        });
    }

    #[test]
    fn test_add_validation_error_is_shown() {
        let mut bad = UNIT;
        bad[1] = "12";
        let prompt = script(&[&["add"], &bad]);
        let mut shell = shell(prompt);

        shell.run().unwrap();

        assert!(shell
            .prompt()
            .transcript()
            .contains("imei must be between 3 and 15 digits long"));
        assert!(shell.registry().with_registry(|r| r.is_empty()));
    }

    #[test]
    fn test_cancelled_add_changes_nothing() {
        let prompt = script(&[&["add"], &UNIT[..3]]);
        let mut shell = shell(prompt);

        shell.run().unwrap();

        assert!(shell.prompt().transcript().contains("Cancelled."));
        assert!(shell.registry().with_registry(|r| r.is_empty()));
    }

    #[test]
    fn test_unknown_command_keeps_running() {
        let prompt = script(&[&["dance", "help", "quit"]]);
        let mut shell = shell(prompt);

        shell.run().unwrap();

        let transcript = shell.prompt().transcript();
        assert!(transcript.contains("Unknown command 'dance'"));
        assert!(transcript.contains("sort date|condition"));
    }

    #[test]
    fn test_reports_render() {
        let prompt = script(&[
            &["add"],
            &UNIT,
            &["diag", "альфа", "123456789012"],
            &["top", "dist", "loc", "sort date"],
        ]);
        let mut shell = shell(prompt);

        shell.run().unwrap();

        let transcript = shell.prompt().transcript();
        assert!(transcript.contains(" 1. альфа  1"));
        assert!(transcript.contains("диагностика"));
        assert!(transcript.contains("under_diagnostic"));
    }

    fn unusable_data_dir() -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let text = r#"{
    "units": [
        {"pool": "active", "branch": "альфа", "imei": "123", "brand": "самсунг", "model": "1",
         "status": "исправен", "condition": "установлен", "location": "склад", "date": "2022-01-01"},
        {"pool": "active", "branch": "альфа", "imei": "456", "brand": "самсунг", "model": "1",
         "status": "исправен", "condition": "сломан", "location": "склад", "date": "2022-01-01"}
    ],
    "dates": []
}
"#;
        std::fs::write(dir.path().join("equipment.json"), text).unwrap();
        (dir, text.to_string())
    }

    fn file_backed_shell(dir: &std::path::Path, prompt: ScriptedPrompt) -> Shell<ScriptedPrompt> {
        let storage = Storage::open(StoreConfig::new(dir));
        let hydration = storage.hydrate();
        assert!(hydration.degraded.is_some());
        Shell::new(
            RegistryState::new(hydration.registry),
            StorageState::new(storage),
            ConfigState::from_lookup(|_| None),
            prompt,
            today(),
        )
    }

    #[test]
    fn test_unloadable_data_survives_session() {
        let (dir, original) = unusable_data_dir();
        let prompt = script(&[&["add"], &UNIT, &["save", "quit"]]);
        let mut shell = file_backed_shell(dir.path(), prompt);

        shell.run().unwrap();

        let after = std::fs::read_to_string(dir.path().join("equipment.json")).unwrap();
        assert_eq!(after, original);
        assert!(!dir.path().join("equipment.csv").exists());
        let transcript = shell.prompt().transcript();
        assert!(transcript.contains("could not be loaded at startup"));
        assert!(transcript.contains("Saved files left untouched."));
    }

    #[test]
    fn test_confirmed_overwrite_keeps_backup() {
        let (dir, original) = unusable_data_dir();
        let prompt = script(&[&["add"], &UNIT, &["quit"]]).with_confirmations([true]);
        let mut shell = file_backed_shell(dir.path(), prompt);

        shell.run().unwrap();

        let backup = std::fs::read_to_string(dir.path().join("equipment.json.bak")).unwrap();
        assert_eq!(backup, original);
        let saved = std::fs::read_to_string(dir.path().join("equipment.json")).unwrap();
        assert!(saved.contains("123456789012"));
        assert!(shell.prompt().transcript().contains("Moved aside:"));
    }

    #[test]
    fn test_quit_reports_failed_save() {
        let mut shell = Shell::new(
            RegistryState::default(),
            StorageState::new(Storage::new(
                StoreConfig::new("unused"),
                Box::new(MemoryStore::failing()),
            )),
            ConfigState::from_lookup(|_| None),
            script(&[&["quit"]]),
            today(),
        );

        assert!(shell.run().is_err());
        assert!(shell.prompt().transcript().contains("Could not access memory"));
    }
}
