//! Per-module mutual exclusion.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of one lock per module name.
///
/// Locks are created on first use and dropped by [`ModuleLocks::release`]
/// once no caller holds a handle, so the registry only tracks modules with
/// a cycle in flight.
#[derive(Debug, Default)]
pub struct ModuleLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ModuleLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock guarding `module`.
    pub fn handle(&self, module: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        Arc::clone(locks.entry(module.to_string()).or_default())
    }

    /// Forgets `module`'s lock when the registry holds the only handle.
    ///
    /// Call after dropping the handle returned by [`ModuleLocks::handle`].
    pub fn release(&self, module: &str) {
        let mut locks = self.locks.lock();
        if locks
            .get(module)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(module);
        }
    }

    /// Number of modules with a live handle.
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
