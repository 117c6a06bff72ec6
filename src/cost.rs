//! Energy-to-money conversion.

use std::fmt;

use serde::Serialize;

use crate::error::ValidationError;

/// Tariff used when the caller has nothing better, in currency per kWh.
pub const DEFAULT_RATE_PER_KWH: f64 = 1500.0;

/// Watt-hours per kilowatt-hour.
pub const WH_PER_KWH: f64 = 1000.0;

/// Estimated cost of `total_wh` watt-hours at `rate_per_kwh`.
///
/// Pure arithmetic; the rate is not checked. Callers holding unvalidated
/// input should go through [`Tariff`].
///
/// # Examples
///
/// ```
/// use energy_tracker::cost::estimate_cost;
///
/// assert_eq!(estimate_cost(2000.0, 1500.0), 3000.0);
/// ```
pub fn estimate_cost(total_wh: f64, rate_per_kwh: f64) -> f64 {
    (total_wh / WH_PER_KWH) * rate_per_kwh
}

/// A validated rate in currency per kWh: finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Tariff {
    rate_per_kwh: f64,
}

impl Tariff {
    /// # Errors
    ///
    /// Returns `ValidationError::OutOfRangeRate` for negative or non-finite
    /// rates.
    pub fn new(rate_per_kwh: f64) -> Result<Self, ValidationError> {
        if !rate_per_kwh.is_finite() || rate_per_kwh < 0.0 {
            return Err(ValidationError::OutOfRangeRate(rate_per_kwh));
        }
        Ok(Self { rate_per_kwh })
    }

    /// Parses a rate typed into a form field.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidRate` if the text is not a number, or
    /// `ValidationError::OutOfRangeRate` if the number is unusable.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        let rate: f64 = input
            .parse()
            .map_err(|_| ValidationError::InvalidRate(input.to_string()))?;
        Self::new(rate)
    }

    pub fn rate_per_kwh(self) -> f64 {
        self.rate_per_kwh
    }

    /// Estimated cost of `total_wh` watt-hours at this rate.
    pub fn estimate(self, total_wh: f64) -> f64 {
        estimate_cost(total_wh, self.rate_per_kwh)
    }
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            rate_per_kwh: DEFAULT_RATE_PER_KWH,
        }
    }
}

impl fmt::Display for Tariff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/kWh", self.rate_per_kwh)
    }
}
