//! Exclusive per-resource operation guard.
//!
//! # Responsibilities
//! - Prevent two workflow instances from operating on the same resource
//!   identity (or intent fingerprint, before an identity exists)
//! - Release deterministically on every exit path
//!
//! # Design Decisions
//! - `acquire` never waits: a queued second workflow could silently
//!   duplicate a chain submission once the key changes mid-flight, so a
//!   held key fails fast with `ConflictingOperation`
//! - Leases release on drop, so success, failure, and cancellation paths
//!   all release without explicit bookkeeping

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::ledger::types::ResourceIdentity;
use crate::workflow::error::WorkflowError;

/// Key a workflow instance is exclusive on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GuardKey {
    /// Pre-identity key derived from the intent.
    Fingerprint(String),
    /// Post-identity key assigned by the ledger.
    Identity(ResourceIdentity),
}

/// Process-wide registry of in-flight workflow keys.
#[derive(Clone, Default)]
pub struct IdempotencyGuard {
    held: Arc<DashMap<GuardKey, Uuid>>,
}

impl IdempotencyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire an exclusive lease on `key`, failing immediately if it is
    /// already held.
    pub fn acquire(&self, key: GuardKey) -> Result<Lease, WorkflowError> {
        let lease_id = Uuid::new_v4();
        match self.held.entry(key.clone()) {
            Entry::Occupied(_) => {
                tracing::debug!(?key, "guard already held, refusing");
                Err(WorkflowError::ConflictingOperation)
            }
            Entry::Vacant(slot) => {
                slot.insert(lease_id);
                Ok(Lease {
                    held: self.held.clone(),
                    key,
                    lease_id,
                })
            }
        }
    }

    pub fn is_held(&self, key: &GuardKey) -> bool {
        self.held.contains_key(key)
    }
}

/// Exclusive lease on one guard key. Releases on drop.
pub struct Lease {
    held: Arc<DashMap<GuardKey, Uuid>>,
    key: GuardKey,
    lease_id: Uuid,
}

impl Drop for Lease {
    fn drop(&mut self) {
        // Only remove the entry this lease inserted.
        self.held.remove_if(&self.key, |_, id| *id == self.lease_id);
    }
}

impl std::fmt::Debug for Lease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lease").field("key", &self.key).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::BucketId;

    fn identity_key() -> GuardKey {
        GuardKey::Identity(ResourceIdentity::Bucket(BucketId::from("B1")))
    }

    #[test]
    fn test_second_acquire_fails_fast() {
        let guard = IdempotencyGuard::new();
        let lease = guard.acquire(identity_key()).unwrap();

        let second = guard.acquire(identity_key());
        assert!(matches!(second, Err(WorkflowError::ConflictingOperation)));

        drop(lease);
        assert!(guard.acquire(identity_key()).is_ok());
    }

    #[test]
    fn test_release_on_drop() {
        let guard = IdempotencyGuard::new();
        {
            let _lease = guard.acquire(identity_key()).unwrap();
            assert!(guard.is_held(&identity_key()));
        }
        assert!(!guard.is_held(&identity_key()));
    }

    #[test]
    fn test_distinct_keys_are_independent() {
        let guard = IdempotencyGuard::new();
        let _a = guard.acquire(GuardKey::Fingerprint("bucket/alice/docs".into())).unwrap();
        let _b = guard.acquire(identity_key()).unwrap();
        assert!(guard.is_held(&identity_key()));
    }
}
