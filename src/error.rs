//! Error types shared across the tracker.

use thiserror::Error;

use crate::devices::DeviceId;

/// Failures reported by [`crate::registry::DeviceRegistry`].
///
/// Neither variant is fatal; callers inspect them and carry on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The device is not currently in the registry.
    #[error("device {0} is not in the registry")]
    NotFound(DeviceId),

    /// The undo log is empty.
    #[error("nothing to undo")]
    NothingToUndo,
}

/// Rejected user input for a device or a tariff.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("device name must not be empty")]
    EmptyName,

    #[error("wattage is required")]
    MissingWattage,

    #[error("wattage \"{0}\" is not a number")]
    InvalidWattage(String),

    #[error("wattage must be a positive number, got {0}")]
    NonPositiveWattage(f64),

    #[error("rate \"{0}\" is not a number")]
    InvalidRate(String),

    #[error("rate must be a finite non-negative number, got {0}")]
    OutOfRangeRate(f64),
}

/// Failure to install the tracing subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot open log file: {0}")]
    File(#[from] std::io::Error),

    #[error("cannot install subscriber: {0}")]
    Init(String),
}
