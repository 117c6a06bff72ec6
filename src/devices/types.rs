//! Common types for tracked devices: identity, status, and validated input.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Registry-assigned device identity.
///
/// Names are not unique, so the registry hands out one of these per
/// [`crate::registry::DeviceRegistry::add_device`] call. An id is never reused
/// and stays attached to its device across removal and undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(u64);

impl DeviceId {
    /// Wraps a raw id, e.g. one parsed from a request path.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Power state of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceStatus {
    #[default]
    Off,
    On,
}

impl DeviceStatus {
    /// Returns the export spelling, `"ON"` or `"OFF"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Validated parameters for a new device.
///
/// Callers build one of these from raw user input before constructing a
/// [`super::Device`], which assumes its inputs are already valid.
///
/// # Examples
///
/// ```
/// use energy_tracker::devices::DeviceSpec;
///
/// let spec = DeviceSpec::parse("  Lamp ", "10").unwrap();
/// assert_eq!(spec.name, "Lamp");
/// assert_eq!(spec.wattage_w, 10.0);
///
/// assert!(DeviceSpec::parse("Lamp", "-5").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceSpec {
    /// Display name, non-empty.
    pub name: String,
    /// Rated power draw in watts, positive.
    pub wattage_w: f64,
}

impl DeviceSpec {
    /// Validates an already-numeric wattage.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the trimmed name is empty or the wattage
    /// is not a finite positive number.
    pub fn new(name: &str, wattage_w: f64) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if !wattage_w.is_finite() || wattage_w <= 0.0 {
            return Err(ValidationError::NonPositiveWattage(wattage_w));
        }
        Ok(Self {
            name: name.to_string(),
            wattage_w,
        })
    }

    /// Validates raw text input as typed into a form.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` describing the first problem found: empty
    /// name, missing wattage, unparsable wattage, or non-positive wattage.
    pub fn parse(name: &str, wattage: &str) -> Result<Self, ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let wattage = wattage.trim();
        if wattage.is_empty() {
            return Err(ValidationError::MissingWattage);
        }
        let wattage_w: f64 = wattage
            .parse()
            .map_err(|_| ValidationError::InvalidWattage(wattage.to_string()))?;
        Self::new(name, wattage_w)
    }

    /// Re-checks a spec that bypassed the constructors, e.g. one deserialized
    /// from a config file.
    ///
    /// # Errors
    ///
    /// Same conditions as [`DeviceSpec::new`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        Self::new(&self.name, self.wattage_w).map(|_| ())
    }
}
