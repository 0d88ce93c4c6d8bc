//! Raffle storage
//!
//! The store owns the address → codes mapping. It is volatile and lives only as
//! long as the process.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Address → codes associations, as served by [`RaffleStore::get_all`].
pub type RaffleMap = BTreeMap<String, Vec<String>>;

/// Storage backend for raffles.
///
/// Implementations must tolerate concurrent calls from many request handlers.
/// `put` replaces whatever was stored for the address; there is no merge.
pub trait RaffleStore: Send + Sync {
    /// Codes stored for `address`, or `None` if nothing was submitted.
    fn get(&self, address: &str) -> Option<Vec<String>>;

    /// A snapshot of every raffle, ordered by address. Later writes do not
    /// show up in a snapshot that was already taken.
    fn get_all(&self) -> RaffleMap;

    fn put(&self, address: String, codes: Vec<String>);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `HashMap` behind a reader/writer lock.
///
/// Readers share the lock, `put` holds it exclusively for one insert. Every
/// mutation is a single insert, so a poisoned lock still guards a consistent
/// map and is recovered rather than propagated.
#[derive(Debug, Default)]
pub struct InMemoryRaffleStore {
    raffles: RwLock<HashMap<String, Vec<String>>>,
}

impl InMemoryRaffleStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Vec<String>>> {
        self.raffles.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Vec<String>>> {
        self.raffles.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RaffleStore for InMemoryRaffleStore {
    fn get(&self, address: &str) -> Option<Vec<String>> {
        self.read().get(address).cloned()
    }

    fn get_all(&self) -> RaffleMap {
        self.read()
            .iter()
            .map(|(address, codes)| (address.clone(), codes.clone()))
            .collect()
    }

    fn put(&self, address: String, codes: Vec<String>) {
        self.write().insert(address, codes);
    }

    fn len(&self) -> usize {
        self.read().len()
    }
}
