//! API request, query and response types.
//!
//! Device and summary bodies reuse [`crate::report`] snapshots so the JSON
//! carries the same field names as the CSV export.

use serde::{Deserialize, Serialize};

use crate::devices::{DeviceId, DeviceStatus};

/// Body of `POST /devices`.
///
/// `wattage_w` is taken as a JSON number; the usual name and positivity
/// checks run in the handler.
#[derive(Debug, Deserialize)]
pub struct AddDeviceRequest {
    pub name: String,
    pub wattage_w: f64,
}

/// Result of a start, stop or toggle.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub id: DeviceId,
    /// Status after the request was applied.
    pub status: DeviceStatus,
}

/// Optional tariff override for the summary endpoint.
///
/// Parsed by the handler; an unparseable value yields a 400 with the rate
/// validation message.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    pub rate: Option<String>,
}

/// Error response body for 4xx/5xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
