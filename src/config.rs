//! TOML-based tracker configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::cost::{DEFAULT_RATE_PER_KWH, Tariff};
use crate::devices::{Device, DeviceSpec};
use crate::registry::DeviceRegistry;

/// Log levels accepted by `logging.level`.
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Top-level tracker configuration parsed from TOML.
///
/// All fields have defaults matching the `empty` preset. Load from TOML with
/// [`TrackerConfig::from_toml_file`] or start from a preset with
/// [`TrackerConfig::from_preset`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackerConfig {
    /// Electricity price.
    #[serde(default)]
    pub tariff: TariffConfig,
    /// Screen refresh parameters.
    #[serde(default)]
    pub display: DisplayConfig,
    /// CSV export destination.
    #[serde(default)]
    pub export: ExportConfig,
    /// Log verbosity and destination.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Devices registered at startup, in display order.
    #[serde(default)]
    pub devices: Vec<DeviceSpec>,
}

/// Electricity price.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TariffConfig {
    /// Price per kWh (must be finite and >= 0).
    pub rate_per_kwh: f64,
    /// Currency symbol shown before amounts.
    pub currency: String,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            rate_per_kwh: DEFAULT_RATE_PER_KWH,
            currency: "Rp".to_string(),
        }
    }
}

/// Screen refresh parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Interval between snapshot refreshes in milliseconds (must be > 0).
    pub refresh_interval_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 1000,
        }
    }
}

/// CSV export destination.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Default output path for the CSV report.
    pub path: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("energy_report.csv"),
        }
    }
}

/// Log verbosity and destination.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// One of `trace`, `debug`, `info`, `warn`, `error`.
    pub level: String,
    /// Log file; stderr when unset.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"tariff.rate_per_kwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl TrackerConfig {
    /// Returns the household preset: a handful of common appliances.
    pub fn household() -> Self {
        let devices = [
            ("Lamp", 10.0),
            ("Fan", 50.0),
            ("Refrigerator", 150.0),
            ("Television", 100.0),
        ]
        .into_iter()
        .map(|(name, wattage_w)| DeviceSpec {
            name: name.to_string(),
            wattage_w,
        })
        .collect();
        Self {
            devices,
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["empty", "household"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "empty" => Ok(Self::default()),
            "household" => Ok(Self::household()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Err(e) = Tariff::new(self.tariff.rate_per_kwh) {
            errors.push(ConfigError {
                field: "tariff.rate_per_kwh".into(),
                message: e.to_string(),
            });
        }

        if self.display.refresh_interval_ms == 0 {
            errors.push(ConfigError {
                field: "display.refresh_interval_ms".into(),
                message: "must be > 0".into(),
            });
        }

        if self.export.path.as_os_str().is_empty() {
            errors.push(ConfigError {
                field: "export.path".into(),
                message: "must not be empty".into(),
            });
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ConfigError {
                field: "logging.level".into(),
                message: format!(
                    "must be one of {}, got \"{}\"",
                    LOG_LEVELS.join(", "),
                    self.logging.level
                ),
            });
        }

        for (i, spec) in self.devices.iter().enumerate() {
            if let Err(e) = spec.validate() {
                errors.push(ConfigError {
                    field: format!("devices[{i}]"),
                    message: e.to_string(),
                });
            }
        }

        errors
    }

    /// Returns the configured tariff, or the default one if the configured
    /// rate is unusable. Call [`TrackerConfig::validate`] first to report it.
    pub fn tariff(&self) -> Tariff {
        Tariff::new(self.tariff.rate_per_kwh).unwrap_or_default()
    }

    /// Builds a registry holding the configured devices, all OFF.
    ///
    /// Names are trimmed the same way as interactive input. Entries that fail
    /// validation are skipped; [`TrackerConfig::validate`] reports them. The
    /// adds are part of the undo log like any other.
    pub fn build_registry(&self) -> DeviceRegistry {
        let mut registry = DeviceRegistry::new();
        for (i, entry) in self.devices.iter().enumerate() {
            match DeviceSpec::new(&entry.name, entry.wattage_w) {
                Ok(spec) => {
                    registry.add_device(Device::from_spec(spec));
                }
                Err(e) => warn!(index = i, %e, "skipping invalid configured device"),
            }
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_valid() {
        let cfg = TrackerConfig::default();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "default should be valid: {errors:?}");
        assert_eq!(cfg.tariff.rate_per_kwh, 1500.0);
        assert!(cfg.devices.is_empty());
    }

    #[test]
    fn from_preset_household() {
        let cfg = TrackerConfig::from_preset("household");
        assert!(cfg.is_ok());
        assert_eq!(cfg.map(|c| c.devices.len()).ok(), Some(4));
    }

    #[test]
    fn build_registry_trims_configured_names() {
        let toml = r#"
[[devices]]
name = "  Lamp "
wattage_w = 10.0

[[devices]]
name = "   "
wattage_w = 5.0
"#;
        let cfg = TrackerConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(cfg.validate().len(), 1);

        let registry = cfg.build_registry();
        let names: Vec<&str> = registry
            .devices()
            .iter()
            .map(|e| e.device().name())
            .collect();
        assert_eq!(names, ["Lamp"]);
    }

    #[test]
    fn from_preset_unknown() {
        let err = TrackerConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[tariff]
rate_per_kwh = 1444.7
currency = "IDR"

[display]
refresh_interval_ms = 500

[export]
path = "out/report.csv"

[logging]
level = "debug"
file = "tracker.log"

[[devices]]
name = "Lamp"
wattage_w = 10.0

[[devices]]
name = "Fan"
wattage_w = 50
"#;
        let cfg = TrackerConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.tariff.rate_per_kwh), Some(1444.7));
        assert_eq!(cfg.as_ref().map(|c| &*c.tariff.currency), Some("IDR"));
        assert_eq!(cfg.as_ref().map(|c| c.display.refresh_interval_ms), Some(500));
        assert_eq!(cfg.as_ref().map(|c| c.devices.len()), Some(2));
        assert_eq!(
            cfg.as_ref().and_then(|c| c.logging.file.clone()),
            Some(PathBuf::from("tracker.log"))
        );
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[tariff]
rate_per_kwh = 1500
bogus_field = true
"#;
        let result = TrackerConfig::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn validation_catches_negative_rate() {
        let mut cfg = TrackerConfig::default();
        cfg.tariff.rate_per_kwh = -1.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "tariff.rate_per_kwh"));
        assert_eq!(cfg.tariff(), Tariff::default());
    }

    #[test]
    fn validation_catches_zero_refresh() {
        let mut cfg = TrackerConfig::default();
        cfg.display.refresh_interval_ms = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "display.refresh_interval_ms"));
    }

    #[test]
    fn validation_catches_bad_log_level() {
        let mut cfg = TrackerConfig::default();
        cfg.logging.level = "loud".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "logging.level"));
    }

    #[test]
    fn validation_catches_bad_devices() {
        let toml = r#"
[[devices]]
name = ""
wattage_w = 10

[[devices]]
name = "Heater"
wattage_w = -100
"#;
        let cfg = TrackerConfig::from_toml_str(toml).unwrap_or_default();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "devices[0]"));
        assert!(errors.iter().any(|e| e.field == "devices[1]"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in TrackerConfig::PRESETS {
            let cfg = TrackerConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[tariff]
rate_per_kwh = 2000
"#;
        let cfg = TrackerConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.tariff.rate_per_kwh), Some(2000.0));
        // currency kept default
        assert_eq!(cfg.as_ref().map(|c| &*c.tariff.currency), Some("Rp"));
        assert_eq!(cfg.as_ref().map(|c| c.display.refresh_interval_ms), Some(1000));
    }

    #[test]
    fn build_registry_adds_devices_in_order() {
        let registry = TrackerConfig::household().build_registry();
        let names: Vec<&str> = registry
            .devices()
            .iter()
            .map(|e| e.device().name())
            .collect();
        assert_eq!(names, vec!["Lamp", "Fan", "Refrigerator", "Television"]);
        assert_eq!(registry.undo_depth(), 4);
    }
}
