//! Undo log entries and outcomes.

use serde::Serialize;

use super::DeviceEntry;
use crate::devices::DeviceId;

/// A structural change recorded in the undo log.
#[derive(Debug, Clone)]
pub enum UndoAction {
    /// A device was added. Undoing removes it if it is still present.
    Added(DeviceId),
    /// A device was removed. The entry keeps the device, timer state
    /// included, so undoing can put it back.
    Removed(DeviceEntry),
}

/// What a successful [`super::DeviceRegistry::undo`] reverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reverted", rename_all = "snake_case")]
pub enum UndoOutcome {
    /// An add was reverted. `was_present` is `false` when the device had
    /// already left the registry by other means, in which case nothing moved.
    Add { id: DeviceId, was_present: bool },
    /// A removal was reverted; the device is back at the end of the list.
    Remove { id: DeviceId },
}
