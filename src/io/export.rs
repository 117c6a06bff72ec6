//! CSV export of device readings.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use crate::report::DeviceReading;

/// Column header for the CSV report.
const HEADER: &str = "device,wattage_w,status,running_s,energy_wh";

/// Exports device readings to a CSV file at the given path.
///
/// Writes a header row followed by one row per device, in the order given.
///
/// # Arguments
///
/// * `readings` - Device readings, usually [`crate::report::EnergyReport::devices`]
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(readings: &[DeviceReading], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(readings, buf)?;
    info!(path = %path.display(), rows = readings.len(), "report exported");
    Ok(())
}

/// Writes device readings as CSV to any writer.
///
/// Running time is truncated to whole seconds and energy is written with four
/// decimal places.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(readings: &[DeviceReading], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for r in readings {
        wtr.write_record(&[
            r.name.clone(),
            r.wattage_w.to_string(),
            r.status.as_str().to_string(),
            (r.running_seconds.max(0.0) as u64).to_string(),
            format!("{:.4}", r.energy_wh),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Renders device readings as a CSV string.
///
/// # Errors
///
/// Returns an `io::Error` if serialization fails.
pub fn to_csv_string(readings: &[DeviceReading]) -> io::Result<String> {
    let mut buf = Vec::new();
    write_csv(readings, &mut buf)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
