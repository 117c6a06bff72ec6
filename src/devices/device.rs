use std::time::{Duration, Instant};

use tracing::debug;

use super::types::{DeviceSpec, DeviceStatus};
use crate::clock::Clock;

/// Seconds per hour, for watt-seconds to watt-hours.
const SECS_PER_HOUR: f64 = 3600.0;

/// An appliance with an ON/OFF running timer.
///
/// The device is OFF while `running_since` is `None` and ON otherwise, so the
/// timestamp exists exactly when the device is running. Closed ON intervals
/// are folded into `accumulated`, which never decreases.
///
/// # Examples
///
/// ```
/// use energy_tracker::clock::{Clock, ManualClock};
/// use energy_tracker::devices::{Device, DeviceStatus};
///
/// let clock = ManualClock::new();
/// let mut lamp = Device::new("Lamp", 10.0);
///
/// lamp.start(&clock);
/// clock.advance_secs(3600);
/// lamp.stop(&clock);
///
/// assert_eq!(lamp.status(), DeviceStatus::Off);
/// assert_eq!(lamp.running_seconds(clock.now()), 3600.0);
/// assert_eq!(lamp.energy_wh(clock.now()), 10.0);
/// ```
#[derive(Debug, Clone)]
pub struct Device {
    /// Display name, not required to be unique.
    name: String,
    /// Rated power draw in watts.
    wattage_w: f64,
    /// Total time spent ON, excluding the currently open interval.
    accumulated: Duration,
    /// Start of the currently open ON interval.
    running_since: Option<Instant>,
}

impl Device {
    /// Creates a device in the OFF state with no accumulated time.
    ///
    /// Inputs are assumed validated; use [`DeviceSpec::parse`] on raw input.
    pub fn new(name: impl Into<String>, wattage_w: f64) -> Self {
        Self {
            name: name.into(),
            wattage_w,
            accumulated: Duration::ZERO,
            running_since: None,
        }
    }

    /// Creates a device from a validated spec.
    pub fn from_spec(spec: DeviceSpec) -> Self {
        Self::new(spec.name, spec.wattage_w)
    }

    /// Turns the device ON. No-op if it is already ON.
    ///
    /// Returns `true` if the status changed.
    pub fn start<C: Clock + ?Sized>(&mut self, clock: &C) -> bool {
        if self.running_since.is_some() {
            return false;
        }
        self.running_since = Some(clock.now());
        debug!(device = %self.name, "device on");
        true
    }

    /// Turns the device OFF, folding the open interval into the accumulated
    /// time. No-op if it is already OFF.
    ///
    /// Returns `true` if the status changed.
    pub fn stop<C: Clock + ?Sized>(&mut self, clock: &C) -> bool {
        let Some(since) = self.running_since.take() else {
            return false;
        };
        let interval = clock.now().saturating_duration_since(since);
        self.accumulated += interval;
        debug!(
            device = %self.name,
            interval_s = interval.as_secs_f64(),
            total_s = self.accumulated.as_secs_f64(),
            "device off"
        );
        true
    }

    /// Starts the device if it is OFF, stops it otherwise.
    ///
    /// Returns the new status.
    pub fn toggle<C: Clock + ?Sized>(&mut self, clock: &C) -> DeviceStatus {
        match self.status() {
            DeviceStatus::Off => self.start(clock),
            DeviceStatus::On => self.stop(clock),
        };
        self.status()
    }

    /// Total ON time up to `now`, including any open interval.
    pub fn running_time(&self, now: Instant) -> Duration {
        match self.running_since {
            Some(since) => self.accumulated + now.saturating_duration_since(since),
            None => self.accumulated,
        }
    }

    /// Total ON time up to `now`, in seconds.
    pub fn running_seconds(&self, now: Instant) -> f64 {
        self.running_time(now).as_secs_f64()
    }

    /// Energy consumed up to `now`, in watt-hours.
    pub fn energy_wh(&self, now: Instant) -> f64 {
        self.wattage_w * self.running_seconds(now) / SECS_PER_HOUR
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn wattage_w(&self) -> f64 {
        self.wattage_w
    }

    pub fn status(&self) -> DeviceStatus {
        if self.running_since.is_some() {
            DeviceStatus::On
        } else {
            DeviceStatus::Off
        }
    }

    /// Start of the open ON interval, present exactly when the device is ON.
    pub fn running_since(&self) -> Option<Instant> {
        self.running_since
    }

    /// Closed ON time in seconds, excluding any open interval.
    pub fn accumulated_seconds(&self) -> f64 {
        self.accumulated.as_secs_f64()
    }
}
