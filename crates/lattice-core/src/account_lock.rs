//! Per-account mutual exclusion.
//!
//! Every account's transactions form a strictly ordered chain, so the
//! sequence "read head, build at head + 1, sign, submit" must not overlap
//! for the same `(chain, account)`. Each key gets its own mutex, created on
//! first use and kept for the life of the registry.

use dashmap::DashMap;
use lattice_types::Address;
use once_cell::sync::Lazy;
use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex};
use std::fmt;
use std::sync::Arc;

static GLOBAL: Lazy<Arc<AccountSerializer>> = Lazy::new(|| Arc::new(AccountSerializer::new()));

/// Registry of per-account locks.
#[derive(Default)]
pub struct AccountSerializer {
    slots: DashMap<String, Arc<Mutex<()>>>,
}

impl AccountSerializer {
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    /// Process-wide registry.
    pub fn global() -> Arc<AccountSerializer> {
        Arc::clone(&GLOBAL)
    }

    /// Registry key of an account on a chain.
    pub fn key(chain_id: u64, address: &Address) -> String {
        format!("{}{}", chain_id, address)
    }

    fn slot(&self, key: &str) -> Arc<Mutex<()>> {
        if let Some(slot) = self.slots.get(key) {
            return Arc::clone(slot.value());
        }
        // Insert-if-absent is atomic per shard; concurrent first callers
        // end up sharing one mutex.
        Arc::clone(
            self.slots
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        )
    }

    /// Block until the account is free, then hold it until the guard is
    /// released or dropped.
    pub fn acquire(&self, chain_id: u64, address: &Address) -> AccountGuard {
        let key = Self::key(chain_id, address);
        let guard = self.slot(&key).lock_arc();
        tracing::trace!(%key, "account lock acquired");
        AccountGuard { key, _guard: guard }
    }

    /// Take the account only if nobody holds it.
    pub fn try_acquire(&self, chain_id: u64, address: &Address) -> Option<AccountGuard> {
        let key = Self::key(chain_id, address);
        let guard = self.slot(&key).try_lock_arc()?;
        Some(AccountGuard { key, _guard: guard })
    }

    /// Run `f` while holding the account.
    pub fn with_account<R>(&self, chain_id: u64, address: &Address, f: impl FnOnce() -> R) -> R {
        let _guard = self.acquire(chain_id, address);
        f()
    }

    /// Number of accounts seen so far.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Debug for AccountSerializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountSerializer")
            .field("accounts", &self.slots.len())
            .finish()
    }
}

/// Exclusive hold on one account. Released on drop.
pub struct AccountGuard {
    key: String,
    _guard: ArcMutexGuard<RawMutex, ()>,
}

impl AccountGuard {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Release explicitly, e.g. when the caller gives up waiting on a
    /// submission.
    pub fn release(self) {
        tracing::trace!(key = %self.key, "account lock released");
    }
}

impl fmt::Debug for AccountGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountGuard").field("key", &self.key).finish()
    }
}
