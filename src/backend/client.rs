//! Backend index client contract.
//!
//! # Responsibilities
//! - Point queries for a single resource's indexed state
//! - Listing queries for all resources of an owner
//!
//! # Design Decisions
//! - `NotFoundYet` is a normal answer, not an error: the indexer is
//!   expected to lag the ledger
//! - Transport failures are surfaced distinctly so the retry layer can
//!   classify them

use async_trait::async_trait;

use crate::backend::types::{BackendError, BackendView, ResourceStatus};
use crate::ledger::types::ResourceIdentity;

/// Off-chain indexing backend the workflows poll.
#[async_trait]
pub trait BackendIndexClient: Send + Sync {
    /// Query the backend's current view of one resource.
    async fn get_resource(
        &self,
        identity: &ResourceIdentity,
    ) -> Result<ResourceStatus, BackendError>;

    /// List every resource the backend has indexed for `owner`.
    async fn list_resources(&self, owner: &str) -> Result<Vec<BackendView>, BackendError>;
}
