//! Registry behind a single lock, for callers on more than one thread.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::DeviceRegistry;

/// A cloneable handle to one [`DeviceRegistry`] guarded by one mutex.
///
/// Every mutation and every total is taken under the same lock; readers never
/// see a half-applied add, removal or undo.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<DeviceRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: DeviceRegistry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Locks the registry for the duration of the returned guard.
    ///
    /// A poisoned lock is recovered; registry operations leave it consistent
    /// at every panic point.
    pub fn lock(&self) -> MutexGuard<'_, DeviceRegistry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with exclusive access to the registry.
    pub fn with<R>(&self, f: impl FnOnce(&mut DeviceRegistry) -> R) -> R {
        f(&mut self.lock())
    }
}
