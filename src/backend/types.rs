//! Backend index types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ledger::types::{LedgerRecord, ResourceIdentity};

/// The backend's eventually-consistent copy of a resource.
///
/// Never authoritative: it may lag the ledger or transiently report a
/// stale version. The workflow only trusts a view whose root matches the
/// finalized `LedgerRecord`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendView {
    pub identity: ResourceIdentity,
    pub name: String,
    pub owner: String,
    /// Root or content hash the backend has indexed for this resource.
    pub root: String,
    pub private: bool,
}

impl BackendView {
    /// Whether this view has caught up to the finalized ledger state.
    /// A present-but-stale view is not ready.
    pub fn is_consistent_with(&self, record: &LedgerRecord) -> bool {
        self.identity == record.identity && self.root == record.root
    }
}

/// Outcome of a point query for one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceStatus {
    /// The backend has indexed the resource.
    Found(BackendView),
    /// The backend has not indexed the resource yet. Expected while the
    /// indexer catches up; retryable.
    NotFoundYet,
}

/// Errors from querying the backend index.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport-level failure (connection refused, 5xx, timeout).
    /// Retryable during polling.
    #[error("backend transport error: {0}")]
    Transport(String),

    /// The backend answered with a payload the client could not decode.
    #[error("backend returned malformed response: {0}")]
    Malformed(String),
}
