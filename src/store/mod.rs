//! Activation record storage.
//!
//! Records are written by an external process; this service only asks whether
//! a key exists. `ActivationStore` is the seam between the HTTP handlers and the
//! `MongoDB` driver so the handlers can be exercised without a live server.

pub mod mongo;

#[cfg(test)]
pub(crate) mod memory;

use std::{future::Future, pin::Pin};
use thiserror::Error;

pub use self::mongo::MongoStore;

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Result of a successful lookup. Absence is a normal outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Present,
    Absent,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(#[from] mongodb::error::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub trait ActivationStore: Send + Sync {
    /// Point lookup by document key.
    fn lookup<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Activation>;

    /// Liveness round trip used by the health probe.
    fn ping(&self) -> StoreFuture<'_, ()>;
}

/// Document key for a player's activation record, e.g. `360_1001`.
#[must_use]
pub fn activation_key(prefix: &str, qid: i64) -> String {
    format!("{prefix}_{qid}")
}
