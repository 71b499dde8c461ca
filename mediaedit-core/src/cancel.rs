//! Cooperative cancellation of in-flight operations.
//!
//! Every dispatched operation gets its own `CancellationFlag`, registered in
//! the bridge's `ActiveOperations` for as long as the operation runs. Workers
//! poll the flag while draining ffmpeg events; `cancel_all` raises every flag
//! registered at that moment and leaves later operations untouched.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A shared, one-way "stop now" signal.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Registry of the flags belonging to operations that have not settled yet.
#[derive(Debug, Default)]
pub(crate) struct ActiveOperations {
    next_id: AtomicU64,
    flags: Mutex<HashMap<u64, CancellationFlag>>,
}

impl ActiveOperations {
    fn flags(&self) -> MutexGuard<'_, HashMap<u64, CancellationFlag>> {
        self.flags.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a fresh flag; it is unregistered when the guard drops.
    pub(crate) fn register(self: &Arc<Self>) -> OperationGuard {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let flag = CancellationFlag::new();
        self.flags().insert(id, flag.clone());
        OperationGuard {
            registry: Arc::clone(self),
            id,
            flag,
        }
    }

    /// Raises every registered flag, returning how many were raised.
    pub(crate) fn cancel_all(&self) -> usize {
        let flags = self.flags();
        for flag in flags.values() {
            flag.cancel();
        }
        flags.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.flags().len()
    }
}

/// Keeps an operation's flag registered until the operation settles.
#[derive(Debug)]
pub(crate) struct OperationGuard {
    registry: Arc<ActiveOperations>,
    id: u64,
    flag: CancellationFlag,
}

impl OperationGuard {
    pub(crate) fn flag(&self) -> &CancellationFlag {
        &self.flag
    }
}

impl Drop for OperationGuard {
    fn drop(&mut self) {
        self.registry.flags().remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_all_only_touches_registered_operations() {
        let registry = Arc::new(ActiveOperations::default());
        let first = registry.register();
        let second = registry.register();
        assert_eq!(registry.len(), 2);

        assert_eq!(registry.cancel_all(), 2);
        assert!(first.flag().is_cancelled());
        assert!(second.flag().is_cancelled());

        let later = registry.register();
        assert!(!later.flag().is_cancelled());
    }

    #[test]
    fn test_guard_unregisters_on_drop() {
        let registry = Arc::new(ActiveOperations::default());
        let guard = registry.register();
        let flag = guard.flag().clone();
        drop(guard);

        assert_eq!(registry.len(), 0);
        assert_eq!(registry.cancel_all(), 0);
        assert!(!flag.is_cancelled());
    }
}
