//! Per-account dialogue serialization.
//!
//! The session column is read-modify-written on every webhook event
//! with no storage-level concurrency token, so two in-flight events for
//! the same account could race. This keyed mutex serializes the whole
//! load-session -> compute -> store-session sequence per account;
//! events for different accounts still run concurrently.

use std::sync::Arc;

use dashmap::DashMap;
use greenroom_types::account::AccountId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Keyed per-account mutexes. Entries are created on first contact and
/// kept for the process lifetime; one `Arc<Mutex<()>>` per account is
/// small enough that eviction is not worth the complexity.
#[derive(Default)]
pub struct AccountLocks {
    locks: DashMap<AccountId, Arc<Mutex<()>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for one account, waiting if another event for
    /// the same account is mid-dialogue.
    pub async fn acquire(&self, id: &AccountId) -> OwnedMutexGuard<()> {
        // Clone the Arc out before awaiting so the DashMap shard guard
        // is not held across the await point.
        let lock = self
            .locks
            .entry(id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}
