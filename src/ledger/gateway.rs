//! Ledger gateway contract.
//!
//! # Responsibilities
//! - Submit signed intents to the chain
//! - Report finality of accepted submissions
//! - Submit deletions
//!
//! # Design Decisions
//! - The gateway is consumed, never implemented, by the workflow core;
//!   wire formats and signing are the collaborator's concern
//! - `await_finality` may poll internally; the workflow treats it as a
//!   single bounded operation with an outer deadline
//! - Object-safe so the core can hold `Arc<dyn LedgerGateway>`

use async_trait::async_trait;
use std::time::Duration;

use crate::ledger::types::{
    FinalityError, LedgerRecord, ResourceIdentity, ResourceIntent, SubmitError,
};

/// On-chain authority the workflows drive.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Submit a creation intent. Returns the provisional identity the
    /// ledger assigned. Failures are terminal; the workflow never retries
    /// a submission.
    async fn submit(&self, intent: &ResourceIntent) -> Result<ResourceIdentity, SubmitError>;

    /// Wait for the submission behind `identity` to reach finality.
    /// `deadline` bounds the whole wait.
    async fn await_finality(
        &self,
        identity: &ResourceIdentity,
        deadline: Duration,
    ) -> Result<LedgerRecord, FinalityError>;

    /// Submit a deletion intent for an existing resource.
    async fn submit_deletion(&self, identity: &ResourceIdentity) -> Result<(), SubmitError>;

    /// Wait for the deletion of `identity` to reach finality.
    async fn await_deletion_finality(
        &self,
        identity: &ResourceIdentity,
        deadline: Duration,
    ) -> Result<(), FinalityError>;
}

/// Read-only view of the connected wallet. Only the current address is
/// needed to build intents; signing stays with the gateway.
pub trait WalletSession: Send + Sync {
    fn current_address(&self) -> Option<String>;
}
