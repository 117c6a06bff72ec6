//! Point-in-time snapshots of the registry for display and export.

use std::fmt;
use std::time::Instant;

use serde::Serialize;

use crate::cost::Tariff;
use crate::devices::{DeviceId, DeviceStatus};
use crate::registry::{DeviceEntry, DeviceRegistry};

/// One device's figures at the snapshot instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceReading {
    pub id: DeviceId,
    pub name: String,
    pub wattage_w: f64,
    pub status: DeviceStatus,
    /// Total ON time in seconds, open interval included.
    pub running_seconds: f64,
    pub energy_wh: f64,
}

impl DeviceReading {
    /// Reads one registry entry at `now`.
    pub fn capture(entry: &DeviceEntry, now: Instant) -> Self {
        let device = entry.device();
        Self {
            id: entry.id(),
            name: device.name().to_string(),
            wattage_w: device.wattage_w(),
            status: device.status(),
            running_seconds: device.running_seconds(now),
            energy_wh: device.energy_wh(now),
        }
    }
}

/// Immutable snapshot of every device plus totals.
///
/// Later registry mutations do not affect a captured report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyReport {
    /// Devices in registry order.
    pub devices: Vec<DeviceReading>,
    pub total_energy_wh: f64,
    pub rate_per_kwh: f64,
    pub estimated_cost: f64,
}

impl EnergyReport {
    /// Captures the registry at `now`, pricing the total at `tariff`.
    pub fn capture(registry: &DeviceRegistry, now: Instant, tariff: Tariff) -> Self {
        let devices: Vec<DeviceReading> = registry
            .devices()
            .iter()
            .map(|e| DeviceReading::capture(e, now))
            .collect();
        let total_energy_wh = registry.total_energy_wh(now);
        Self {
            devices,
            total_energy_wh,
            rate_per_kwh: tariff.rate_per_kwh(),
            estimated_cost: tariff.estimate(total_energy_wh),
        }
    }

    /// Number of devices currently ON.
    pub fn active_count(&self) -> usize {
        self.devices
            .iter()
            .filter(|d| d.status == DeviceStatus::On)
            .count()
    }
}

impl fmt::Display for EnergyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Energy Report ---")?;
        writeln!(
            f,
            "{:<20} {:>10} {:>6} {:>8} {:>14}",
            "Device", "Power", "Status", "Time", "Energy"
        )?;
        for d in &self.devices {
            writeln!(
                f,
                "{:<20} {:>8} W {:>6} {:>8} {:>11.4} Wh",
                d.name,
                d.wattage_w,
                d.status,
                format_timer(d.running_seconds),
                d.energy_wh
            )?;
        }
        writeln!(f, "Total energy:    {:.2} Wh", self.total_energy_wh)?;
        writeln!(f, "Tariff:          {} per kWh", self.rate_per_kwh)?;
        write!(f, "Estimated cost:  {:.2}", self.estimated_cost)
    }
}

/// Formats a running time as `MM:SS`, truncating fractional seconds.
///
/// Minutes are not wrapped into hours.
///
/// # Examples
///
/// ```
/// use energy_tracker::report::format_timer;
///
/// assert_eq!(format_timer(0.0), "00:00");
/// assert_eq!(format_timer(61.9), "01:01");
/// assert_eq!(format_timer(7200.0), "120:00");
/// ```
pub fn format_timer(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Formats a monetary amount as a truncated integer with `.` thousands
/// separators, prefixed by `symbol`.
///
/// # Examples
///
/// ```
/// use energy_tracker::report::format_currency;
///
/// assert_eq!(format_currency(1500.0, "Rp"), "Rp 1.500");
/// assert_eq!(format_currency(1234567.89, "Rp"), "Rp 1.234.567");
/// ```
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let whole = amount.trunc() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let sign = if whole < 0 { "-" } else { "" };
    if symbol.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{symbol} {sign}{grouped}")
    }
}
