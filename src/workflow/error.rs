//! Workflow error taxonomy.
//!
//! Every exit path of a workflow yields either a complete result or one
//! of these kinds, never a generic error. Recoverable kinds mean the
//! on-chain state may be (or become) valid and the caller can retry or
//! re-check; fatal kinds require new input or a later attempt with a
//! corrected intent.

use thiserror::Error;

/// Typed failure of a provisioning or teardown workflow.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// The submission did not go through. Either the ledger refused it
    /// (bad name, missing balance, invalid signature) or the round-trip
    /// failed in transport; the message says which. Fatal for this call:
    /// submissions are never retried, since a retry after a transport
    /// failure could duplicate the chain submission.
    #[error("submission rejected: {0}")]
    SubmissionRejected(String),

    /// The transaction was included and rejected on-chain. Fatal.
    #[error("rejected on-chain: {0}")]
    OnChainRejected(String),

    /// Finality was not observed within the budget. Recoverable: the
    /// submission may still finalize; re-check later.
    #[error("finality not observed within the configured deadline")]
    FinalityTimeout,

    /// The backend index never caught up to the finalized record within
    /// the polling deadline. Recoverable: the resource is valid on-chain,
    /// only its visibility lags.
    #[error("backend index did not catch up within the configured deadline")]
    BackendIndexTimeout,

    /// The backend index could not be reached at all. Recoverable.
    #[error("backend index unavailable: {0}")]
    BackendUnavailable(String),

    /// Another workflow holds the guard for this resource. Fatal for
    /// this call; the caller should wait and retry.
    #[error("another operation is already in flight for this resource")]
    ConflictingOperation,

    /// The caller cancelled the workflow. Not an error condition per se.
    #[error("operation cancelled")]
    Cancelled,

    /// The workflow-level deadline elapsed. Recoverable.
    #[error("workflow deadline exceeded")]
    WorkflowTimeout,
}

impl WorkflowError {
    /// Whether the caller may simply retry or re-check later, as opposed
    /// to correcting the request.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            WorkflowError::FinalityTimeout
                | WorkflowError::BackendIndexTimeout
                | WorkflowError::BackendUnavailable(_)
                | WorkflowError::WorkflowTimeout
        )
    }

    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            WorkflowError::SubmissionRejected(_) => "submission_rejected",
            WorkflowError::OnChainRejected(_) => "onchain_rejected",
            WorkflowError::FinalityTimeout => "finality_timeout",
            WorkflowError::BackendIndexTimeout => "backend_index_timeout",
            WorkflowError::BackendUnavailable(_) => "backend_unavailable",
            WorkflowError::ConflictingOperation => "conflicting_operation",
            WorkflowError::Cancelled => "cancelled",
            WorkflowError::WorkflowTimeout => "workflow_timeout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverability_split() {
        assert!(WorkflowError::FinalityTimeout.is_recoverable());
        assert!(WorkflowError::BackendIndexTimeout.is_recoverable());
        assert!(WorkflowError::WorkflowTimeout.is_recoverable());
        assert!(!WorkflowError::SubmissionRejected("bad".into()).is_recoverable());
        assert!(!WorkflowError::OnChainRejected("bad".into()).is_recoverable());
        assert!(!WorkflowError::ConflictingOperation.is_recoverable());
        assert!(!WorkflowError::Cancelled.is_recoverable());
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(WorkflowError::Cancelled.kind(), "cancelled");
        assert_eq!(
            WorkflowError::BackendUnavailable("down".into()).kind(),
            "backend_unavailable"
        );
    }
}
