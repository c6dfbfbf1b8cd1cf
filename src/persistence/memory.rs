//! Volatile in-memory persistence managers.
//!
//! Useful for hosts that stay resident for the whole authentication
//! lifecycle and want stateful mode without a durable store.

use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::persistence::{Association, AssociationPersistence, SessionPersistence};

const CLEANUP_INTERVAL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug)]
struct AssociationTable {
    rows: Vec<Association>,
    next_cleanup: SystemTime,
}

/// In-memory association store guarded by a single lock.
#[derive(Debug)]
pub struct InMemoryAssociationManager {
    inner: Mutex<AssociationTable>,
}

impl Default for InMemoryAssociationManager {
    fn default() -> Self {
        Self {
            inner: Mutex::new(AssociationTable {
                rows: Vec::new(),
                // The first cleanup call always proceeds.
                next_cleanup: UNIX_EPOCH,
            }),
        }
    }
}

impl InMemoryAssociationManager {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl AssociationPersistence for InMemoryAssociationManager {
    fn add(&self, association: Association) {
        let mut table = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        table.rows.retain(|row| row.server != association.server);
        table.rows.push(association);
    }

    fn remove(&self, association: &Association) {
        let mut table = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        table.rows.retain(|row| row.handle != association.handle);
    }

    fn find_by_handle(&self, handle: &str) -> Option<Association> {
        let table = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        table.rows.iter().find(|row| row.handle == handle).cloned()
    }

    fn find_by_server(&self, server: &str) -> Option<Association> {
        let table = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        table.rows.iter().find(|row| row.server == server).cloned()
    }

    fn cleanup(&self) {
        let mut table = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let now = SystemTime::now();
        if now > table.next_cleanup {
            table.rows.retain(|row| row.expiration >= now);
            table.next_cleanup = now + CLEANUP_INTERVAL;
        }
    }
}

/// In-memory session store holding the nonce for a single user session.
#[derive(Debug, Default)]
pub struct InMemorySessionManager {
    nonce: Mutex<Option<i32>>,
}

impl InMemorySessionManager {
    /// Creates a store with no nonce set.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionPersistence for InMemorySessionManager {
    fn nonce(&self) -> i32 {
        self.nonce
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .unwrap_or(-1)
    }

    fn set_nonce(&self, value: i32) {
        *self.nonce.lock().unwrap_or_else(|e| e.into_inner()) = Some(value);
    }
}
