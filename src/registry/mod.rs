//! Ordered device collection with single-step undo of adds and removals.

mod shared;
mod undo;

pub use shared::SharedRegistry;
pub use undo::{UndoAction, UndoOutcome};

use std::time::Instant;

use tracing::debug;

use crate::clock::Clock;
use crate::devices::{Device, DeviceId, DeviceStatus};
use crate::error::RegistryError;

/// A device together with the id the registry assigned to it.
#[derive(Debug, Clone)]
pub struct DeviceEntry {
    id: DeviceId,
    device: Device,
}

impl DeviceEntry {
    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn device(&self) -> &Device {
        &self.device
    }
}

/// Owns the tracked devices in display order and the undo log.
///
/// Every device appears at most once. Removed devices live on inside their
/// [`UndoAction::Removed`] entry until that entry is undone or the registry is
/// dropped. Undoing a removal appends the device at the end rather than at its
/// former position.
///
/// # Examples
///
/// ```
/// use energy_tracker::clock::ManualClock;
/// use energy_tracker::devices::Device;
/// use energy_tracker::registry::DeviceRegistry;
///
/// let clock = ManualClock::new();
/// let mut registry = DeviceRegistry::new();
/// let lamp = registry.add_device(Device::new("Lamp", 10.0));
///
/// registry.retire_device(lamp, &clock).unwrap();
/// assert!(registry.is_empty());
///
/// registry.undo().unwrap();
/// assert!(registry.contains(lamp));
/// ```
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: Vec<DeviceEntry>,
    undo_log: Vec<UndoAction>,
    next_id: u64,
}

impl DeviceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a device and records the add in the undo log.
    ///
    /// Returns the id assigned to the device.
    pub fn add_device(&mut self, device: Device) -> DeviceId {
        let id = DeviceId::from_raw(self.next_id);
        self.next_id += 1;
        debug!(%id, device = %device.name(), wattage_w = device.wattage_w(), "device added");
        self.devices.push(DeviceEntry { id, device });
        self.undo_log.push(UndoAction::Added(id));
        id
    }

    /// Removes a device and records the removal in the undo log.
    ///
    /// The device keeps whatever timer state it had; callers retiring a
    /// device for good should stop it first or use
    /// [`DeviceRegistry::retire_device`].
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if the device is absent. The undo log
    /// is left untouched in that case.
    pub fn remove_device(&mut self, id: DeviceId) -> Result<(), RegistryError> {
        let entry = self.take(id).ok_or(RegistryError::NotFound(id))?;
        debug!(%id, device = %entry.device.name(), "device removed");
        self.undo_log.push(UndoAction::Removed(entry));
        Ok(())
    }

    /// Stops a device, then removes it.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if the device is absent.
    pub fn retire_device<C: Clock + ?Sized>(
        &mut self,
        id: DeviceId,
        clock: &C,
    ) -> Result<(), RegistryError> {
        self.get_mut(id).ok_or(RegistryError::NotFound(id))?.stop(clock);
        self.remove_device(id)
    }

    /// Reverts the most recent add or removal.
    ///
    /// Each call consumes one log entry; there is no redo.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NothingToUndo` if the log is empty.
    pub fn undo(&mut self) -> Result<UndoOutcome, RegistryError> {
        let action = self.undo_log.pop().ok_or(RegistryError::NothingToUndo)?;
        let outcome = match action {
            UndoAction::Added(id) => {
                let was_present = self.take(id).is_some();
                UndoOutcome::Add { id, was_present }
            }
            UndoAction::Removed(entry) => {
                let id = entry.id;
                self.devices.push(entry);
                UndoOutcome::Remove { id }
            }
        };
        debug!(?outcome, remaining = self.undo_log.len(), "undo applied");
        Ok(outcome)
    }

    /// Starts the device with the given id.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if the device is absent.
    pub fn start<C: Clock + ?Sized>(
        &mut self,
        id: DeviceId,
        clock: &C,
    ) -> Result<DeviceStatus, RegistryError> {
        let device = self.get_mut(id).ok_or(RegistryError::NotFound(id))?;
        device.start(clock);
        Ok(device.status())
    }

    /// Stops the device with the given id.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if the device is absent.
    pub fn stop<C: Clock + ?Sized>(
        &mut self,
        id: DeviceId,
        clock: &C,
    ) -> Result<DeviceStatus, RegistryError> {
        let device = self.get_mut(id).ok_or(RegistryError::NotFound(id))?;
        device.stop(clock);
        Ok(device.status())
    }

    /// Toggles the device with the given id.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if the device is absent.
    pub fn toggle<C: Clock + ?Sized>(
        &mut self,
        id: DeviceId,
        clock: &C,
    ) -> Result<DeviceStatus, RegistryError> {
        self.get_mut(id)
            .map(|device| device.toggle(clock))
            .ok_or(RegistryError::NotFound(id))
    }

    /// Sum of every present device's energy up to `now`, in watt-hours.
    pub fn total_energy_wh(&self, now: Instant) -> f64 {
        self.devices.iter().map(|e| e.device.energy_wh(now)).sum()
    }

    /// Present devices in display order.
    pub fn devices(&self) -> &[DeviceEntry] {
        &self.devices
    }

    pub fn get(&self, id: DeviceId) -> Option<&Device> {
        self.position(id).map(|i| &self.devices[i].device)
    }

    pub fn get_mut(&mut self, id: DeviceId) -> Option<&mut Device> {
        self.position(id).map(|i| &mut self.devices[i].device)
    }

    pub fn contains(&self, id: DeviceId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Pending undo entries, oldest first.
    pub fn undo_log(&self) -> &[UndoAction] {
        &self.undo_log
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_log.len()
    }

    fn position(&self, id: DeviceId) -> Option<usize> {
        self.devices.iter().position(|e| e.id == id)
    }

    fn take(&mut self, id: DeviceId) -> Option<DeviceEntry> {
        self.position(id).map(|i| self.devices.remove(i))
    }
}
