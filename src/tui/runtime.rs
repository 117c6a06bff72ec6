//! TUI application state and the actions bound to keys.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::clock::{Clock, MonotonicClock};
use crate::config::TrackerConfig;
use crate::cost::Tariff;
use crate::devices::{Device, DeviceId, DeviceSpec};
use crate::error::RegistryError;
use crate::io::export::export_csv;
use crate::registry::{DeviceRegistry, UndoOutcome};
use crate::report::EnergyReport;

/// What keystrokes currently edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Keys are commands.
    Normal,
    /// Typing the new device's name.
    Name,
    /// Typing the new device's wattage.
    Wattage,
    /// Typing the tariff.
    Rate,
    /// Waiting for y/n before removing a device.
    ConfirmRemove(DeviceId),
}

/// Severity of the footer message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// One-line feedback shown in the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl StatusMessage {
    fn info(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Info,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }
}

/// TUI application state.
///
/// Rendering reads only [`App::report`], a snapshot refreshed after every
/// action and on every tick, never the live registry.
pub struct App<C: Clock = MonotonicClock> {
    /// Tracked devices and undo log.
    registry: DeviceRegistry,
    /// Time source for device timers.
    clock: C,
    /// Snapshot the screen is drawn from.
    pub report: EnergyReport,
    /// Index of the highlighted row in `report.devices`.
    pub selected: usize,
    /// Current input mode.
    pub mode: InputMode,
    /// Name field of the add form.
    pub name_input: String,
    /// Wattage field of the add form.
    pub wattage_input: String,
    /// Tariff field, kept as typed.
    pub rate_input: String,
    /// Latest feedback line.
    pub message: Option<StatusMessage>,
    /// Currency symbol for cost display.
    pub currency: String,
    /// Rate used whenever `rate_input` is not a usable number.
    fallback_tariff: Tariff,
    /// CSV destination.
    export_path: PathBuf,
    /// Snapshot refresh interval.
    refresh_interval: Duration,
    /// When the snapshot was last refreshed.
    pub last_tick: Instant,
    /// Whether the user has requested quit.
    pub quit: bool,
}

impl<C: Clock> App<C> {
    /// Creates the app around an existing registry.
    pub fn new(config: &TrackerConfig, registry: DeviceRegistry, clock: C) -> Self {
        let fallback_tariff = config.tariff();
        let report = EnergyReport::capture(&registry, clock.now(), fallback_tariff);
        Self {
            registry,
            clock,
            report,
            selected: 0,
            mode: InputMode::Normal,
            name_input: String::new(),
            wattage_input: String::new(),
            rate_input: fallback_tariff.rate_per_kwh().to_string(),
            message: None,
            currency: config.tariff.currency.clone(),
            fallback_tariff,
            export_path: config.export.path.clone(),
            refresh_interval: Duration::from_millis(config.display.refresh_interval_ms),
            last_tick: Instant::now(),
            quit: false,
        }
    }

    /// Retakes the snapshot at the current clock reading.
    pub fn refresh(&mut self) {
        self.report = EnergyReport::capture(&self.registry, self.clock.now(), self.tariff());
        let len = self.report.devices.len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Periodic refresh, driven by the event loop.
    pub fn tick(&mut self) {
        self.refresh();
        self.last_tick = Instant::now();
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// The tariff in effect: the typed rate if usable, the configured one
    /// otherwise.
    pub fn tariff(&self) -> Tariff {
        Tariff::parse(&self.rate_input).unwrap_or(self.fallback_tariff)
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Id of the highlighted device, if any.
    pub fn selected_id(&self) -> Option<DeviceId> {
        self.report.devices.get(self.selected).map(|d| d.id)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.report.devices.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Opens the add form with empty fields.
    pub fn begin_add(&mut self) {
        self.name_input.clear();
        self.wattage_input.clear();
        self.mode = InputMode::Name;
    }

    /// Opens the tariff field for editing.
    pub fn begin_rate_edit(&mut self) {
        self.mode = InputMode::Rate;
    }

    /// Appends a character to the active field.
    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.active_field() {
            field.push(c);
        }
    }

    /// Deletes the last character of the active field.
    pub fn pop_char(&mut self) {
        if let Some(field) = self.active_field() {
            field.pop();
        }
    }

    /// Moves between the name and wattage fields.
    pub fn next_field(&mut self) {
        self.mode = match self.mode {
            InputMode::Name => InputMode::Wattage,
            InputMode::Wattage => InputMode::Name,
            other => other,
        };
    }

    /// Enter in an input field: advance the form or apply it.
    pub fn submit(&mut self) {
        match self.mode {
            InputMode::Name => self.mode = InputMode::Wattage,
            InputMode::Wattage => self.add_from_inputs(),
            InputMode::Rate => self.apply_rate(),
            InputMode::Normal | InputMode::ConfirmRemove(_) => {}
        }
    }

    /// Leaves any input mode without applying it.
    pub fn cancel(&mut self) {
        if matches!(self.mode, InputMode::ConfirmRemove(_)) {
            self.message = Some(StatusMessage::info("Removal cancelled."));
        }
        self.mode = InputMode::Normal;
    }

    /// Validates the add form and registers the device.
    ///
    /// On invalid input the form stays open with an error message.
    pub fn add_from_inputs(&mut self) {
        match DeviceSpec::parse(&self.name_input, &self.wattage_input) {
            Ok(spec) => {
                let name = spec.name.clone();
                self.registry.add_device(Device::from_spec(spec));
                self.name_input.clear();
                self.wattage_input.clear();
                self.mode = InputMode::Normal;
                self.refresh();
                self.selected = self.report.devices.len().saturating_sub(1);
                self.message = Some(StatusMessage::info(format!("Added {name}.")));
            }
            Err(e) => {
                warn!(%e, "device input rejected");
                self.mode = InputMode::Name;
                self.message = Some(StatusMessage::error(format!("Invalid device: {e}")));
            }
        }
    }

    /// Toggles the highlighted device.
    pub fn toggle_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        if let Err(e) = self.registry.toggle(id, &self.clock) {
            self.message = Some(StatusMessage::error(e.to_string()));
        }
        self.refresh();
    }

    /// Asks for confirmation before removing the highlighted device.
    pub fn request_remove(&mut self) {
        let Some(reading) = self.report.devices.get(self.selected) else {
            return;
        };
        self.message = Some(StatusMessage::info(format!(
            "Remove {}? (y/n)",
            reading.name
        )));
        self.mode = InputMode::ConfirmRemove(reading.id);
    }

    /// Stops and removes the device awaiting confirmation.
    pub fn confirm_remove(&mut self) {
        let InputMode::ConfirmRemove(id) = self.mode else {
            return;
        };
        self.mode = InputMode::Normal;
        let name = self
            .registry
            .get(id)
            .map(|d| d.name().to_string())
            .unwrap_or_default();
        self.message = Some(match self.registry.retire_device(id, &self.clock) {
            Ok(()) => StatusMessage::info(format!("Removed {name}. Press u to undo.")),
            Err(e) => StatusMessage::error(e.to_string()),
        });
        self.refresh();
    }

    /// Reverts the most recent add or removal.
    pub fn undo(&mut self) {
        self.message = Some(match self.registry.undo() {
            Ok(UndoOutcome::Add { .. }) => StatusMessage::info("Undid add."),
            Ok(UndoOutcome::Remove { .. }) => StatusMessage::info("Undid removal."),
            Err(RegistryError::NothingToUndo) => StatusMessage::info("Nothing to undo."),
            Err(e) => StatusMessage::error(e.to_string()),
        });
        self.refresh();
    }

    /// Applies the typed tariff, reverting the field to the fallback rate if
    /// it is unusable.
    pub fn apply_rate(&mut self) {
        self.mode = InputMode::Normal;
        match Tariff::parse(&self.rate_input) {
            Ok(tariff) => {
                self.message = Some(StatusMessage::info(format!("Tariff set to {tariff}.")));
            }
            Err(e) => {
                warn!(%e, fallback = self.fallback_tariff.rate_per_kwh(), "rate rejected");
                self.rate_input = self.fallback_tariff.rate_per_kwh().to_string();
                self.message = Some(StatusMessage::error(format!(
                    "Invalid rate ({e}); using {}.",
                    self.fallback_tariff
                )));
            }
        }
        self.refresh();
    }

    /// Writes the current snapshot to the configured CSV path.
    pub fn export(&mut self) {
        self.refresh();
        self.message = Some(match export_csv(&self.report.devices, &self.export_path) {
            Ok(()) => {
                info!(path = %self.export_path.display(), "export requested from TUI");
                StatusMessage::info(format!("Report saved: {}", self.export_path.display()))
            }
            Err(e) => StatusMessage::error(format!("Export failed: {e}")),
        });
    }

    fn active_field(&mut self) -> Option<&mut String> {
        match self.mode {
            InputMode::Name => Some(&mut self.name_input),
            InputMode::Wattage => Some(&mut self.wattage_input),
            InputMode::Rate => Some(&mut self.rate_input),
            InputMode::Normal | InputMode::ConfirmRemove(_) => None,
        }
    }
}
