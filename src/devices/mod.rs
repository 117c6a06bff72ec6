//! Tracked appliances and their ON/OFF timers.

/// Per-device timer state machine and energy computation.
pub mod device;
pub mod types;

pub use device::Device;
pub use types::{DeviceId, DeviceSpec, DeviceStatus};
