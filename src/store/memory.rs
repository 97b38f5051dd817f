use super::{Activation, ActivationStore, StoreError, StoreFuture};
use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
};

/// In-process store for handler tests.
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    keys: Mutex<HashSet<String>>,
    unreachable: AtomicBool,
    lookups: AtomicUsize,
}

impl MemoryStore {
    pub(crate) fn insert(&self, key: &str) {
        if let Ok(mut keys) = self.keys.lock() {
            keys.insert(key.to_string());
        }
    }

    pub(crate) fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub(crate) fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn check_reachable(&self) -> Result<(), StoreError> {
        if self.unreachable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

impl ActivationStore for MemoryStore {
    fn lookup<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Activation> {
        Box::pin(async move {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.check_reachable()?;
            let keys = self
                .keys
                .lock()
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            Ok(if keys.contains(key) {
                Activation::Present
            } else {
                Activation::Absent
            })
        })
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move { self.check_reachable() })
    }
}
