//! # Persistence Module
//! Contracts for the association and session-nonce backing stores, plus
//! in-memory implementations suitable for single-process hosts.

mod memory;

pub use memory::{InMemoryAssociationManager, InMemorySessionManager};

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::types::ProtocolVersion;

/// A shared-secret association negotiated with an OpenID Provider,
/// used to verify response signatures in stateful mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    /// Protocol version the association was negotiated under.
    pub protocol_version: ProtocolVersion,
    /// Provider endpoint URL the association belongs to.
    pub server: String,
    /// Handle issued by the provider.
    pub handle: String,
    /// Association type, e.g. `HMAC-SHA256`.
    pub association_type: String,
    /// Session type used during negotiation, e.g. `DH-SHA256`.
    pub session_type: String,
    /// Negotiated shared secret.
    pub secret: Vec<u8>,
    /// Instant after which the association must no longer be used.
    pub expiration: SystemTime,
}

impl Association {
    /// Whether the association is still usable at `now`.
    pub fn is_valid_at(&self, now: SystemTime) -> bool {
        self.expiration > now
    }
}

/// Backing store for provider associations.
///
/// Stores are shared across transactions and potentially across
/// concurrent requests; implementations must make each operation safe to
/// call concurrently (a single lock around the whole store is a correct
/// implementation).
pub trait AssociationPersistence: Send + Sync {
    /// Stores `association`, atomically superseding any existing
    /// association for the same server: once `add` returns, at most one
    /// association is visible for that server.
    fn add(&self, association: Association);

    /// Removes the association with the given handle, if present.
    fn remove(&self, association: &Association);

    /// Looks up an association by its provider-issued handle.
    fn find_by_handle(&self, handle: &str) -> Option<Association>;

    /// Looks up the current association for a provider endpoint.
    fn find_by_server(&self, server: &str) -> Option<Association>;

    /// Purges expired associations. Runs under a schedule gate so
    /// concurrent calls do not race destructively; calls inside the gate
    /// window are no-ops.
    fn cleanup(&self);
}

/// Backing store for the per-session replay-protection nonce.
///
/// Writes must be immediately durable: the response that consumes the
/// nonce may be verified by a different process instance.
pub trait SessionPersistence: Send + Sync {
    /// Current nonce, or `-1` when none has been stored.
    fn nonce(&self) -> i32;

    /// Stores a new nonce value synchronously.
    fn set_nonce(&self, value: i32);
}

#[cfg(test)]
#[path = "../tests/persistence_tests.rs"]
mod persistence_tests;
