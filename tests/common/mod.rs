//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use energy_tracker::clock::ManualClock;
use energy_tracker::devices::{Device, DeviceId};
use energy_tracker::registry::DeviceRegistry;

/// Floating-point tolerance for energy and cost assertions.
pub const EPS: f64 = 1e-9;

/// Registry holding a 10 W lamp and a 50 W fan, in that order.
///
/// Returns `(registry, lamp, fan)`.
pub fn lamp_and_fan() -> (DeviceRegistry, DeviceId, DeviceId) {
    let mut registry = DeviceRegistry::new();
    let lamp = registry.add_device(Device::new("Lamp", 10.0));
    let fan = registry.add_device(Device::new("Fan", 50.0));
    (registry, lamp, fan)
}

/// Fresh manual clock at offset zero.
pub fn clock() -> ManualClock {
    ManualClock::new()
}

/// Names in registry order.
pub fn names(registry: &DeviceRegistry) -> Vec<&str> {
    registry
        .devices()
        .iter()
        .map(|e| e.device().name())
        .collect()
}

/// Asserts two floats agree within [`EPS`].
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}
