//! Resource provisioning workflow.
//!
//! # Phases
//! ```text
//! submitting → verifying-onchain → awaiting-backend → complete
//!      └──────────────┴───────────────┴──→ failed (typed kind)
//! ```
//!
//! # Design Decisions
//! - Submission is never retried; any rejection there is terminal
//! - Finality is one bounded wait owned by the gateway, with an outer
//!   timeout here
//! - Backend readiness means the indexed root equals the finalized
//!   ledger root; a present-but-stale view is not ready
//! - Both guard leases (fingerprint, then identity) are held for the
//!   whole run and release on drop on every exit path

use std::fmt;
use std::sync::Arc;

use crate::backend::client::BackendIndexClient;
use crate::backend::types::{BackendError, ResourceStatus};
use crate::ledger::gateway::LedgerGateway;
use crate::ledger::types::{FinalityError, ResourceIntent, SubmitError};
use crate::observability::metrics;
use crate::resilience::cancel::CancelToken;
use crate::resilience::scheduler::{self, AttemptError, RetryError};
use crate::workflow::error::WorkflowError;
use crate::workflow::guard::{GuardKey, IdempotencyGuard};
use crate::workflow::progress::{Phase, ProgressObserver, ProgressReporter};
use crate::workflow::{PhaseBudget, WorkflowResult, WorkflowSettings};

/// Why one backend poll did not succeed. Internal to the polling loop;
/// exhaustion maps to the workflow taxonomy.
pub(crate) enum PollFailure {
    NotIndexed,
    Stale { backend_root: String },
    Transport(String),
}

impl fmt::Display for PollFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollFailure::NotIndexed => write!(f, "not indexed yet"),
            PollFailure::Stale { backend_root } => {
                write!(f, "backend reports stale root {}", backend_root)
            }
            PollFailure::Transport(msg) => write!(f, "transport error: {}", msg),
        }
    }
}

/// Phased state machine driving resource creation to cross-system
/// consistency.
pub struct ProvisioningWorkflow {
    gateway: Arc<dyn LedgerGateway>,
    backend: Arc<dyn BackendIndexClient>,
    guard: IdempotencyGuard,
    settings: WorkflowSettings,
    cancel: CancelToken,
}

impl ProvisioningWorkflow {
    pub fn new(
        gateway: Arc<dyn LedgerGateway>,
        backend: Arc<dyn BackendIndexClient>,
        guard: IdempotencyGuard,
        settings: WorkflowSettings,
        cancel: CancelToken,
    ) -> Self {
        Self {
            gateway,
            backend,
            guard,
            settings,
            cancel,
        }
    }

    /// Run the workflow to completion or typed failure.
    ///
    /// The observer sees every phase transition in order, ending with
    /// either `complete` or `failed` before this call resolves.
    pub async fn run(
        &self,
        intent: ResourceIntent,
        observer: Option<ProgressObserver>,
    ) -> Result<WorkflowResult, WorkflowError> {
        let mut progress = ProgressReporter::new(observer);
        metrics::record_workflow_started("provision");

        let result = self.drive(&intent, &mut progress).await;
        match &result {
            Ok(outcome) => {
                tracing::info!(identity = %outcome.record.identity, "resource provisioned");
                metrics::record_workflow_outcome("provision", "complete");
            }
            Err(error) => {
                progress.fail(error);
                tracing::warn!(
                    kind = error.kind(),
                    error = %error,
                    intent = %intent.idempotency_fingerprint(),
                    "provisioning failed"
                );
                metrics::record_workflow_outcome("provision", error.kind());
            }
        }
        result
    }

    async fn drive(
        &self,
        intent: &ResourceIntent,
        progress: &mut ProgressReporter,
    ) -> Result<WorkflowResult, WorkflowError> {
        intent
            .validate()
            .map_err(WorkflowError::SubmissionRejected)?;

        let budget = PhaseBudget::starting_now(self.settings.overall_deadline);

        // Held for the whole run; a concurrent workflow for the same
        // intent fails fast here.
        let _intent_lease = self
            .guard
            .acquire(GuardKey::Fingerprint(intent.idempotency_fingerprint()))?;

        // Phase 1: submission. Not time-bounded beyond the gateway's own
        // behaviour, and never retried.
        progress.transition(
            Phase::Submitting,
            format!("submitting {} \"{}\"", intent.kind(), intent.name()),
        );
        let identity = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(WorkflowError::Cancelled),
            result = self.gateway.submit(intent) => result.map_err(|e| match e {
                SubmitError::Rejected(msg) => WorkflowError::SubmissionRejected(msg),
                // Not retried: a blind retry could double-provision. The
                // message marks the outcome as unknown rather than refused.
                SubmitError::Transport(msg) => WorkflowError::SubmissionRejected(format!(
                    "submission outcome unknown (transport failure): {}",
                    msg
                )),
            })?,
        };
        tracing::debug!(identity = %identity, "submission accepted");

        // The identity is now the idempotency key for everything that
        // follows; also guards against a racing teardown.
        let _identity_lease = self.guard.acquire(GuardKey::Identity(identity.clone()))?;

        // Phase 2: one bounded finality wait.
        progress.transition(
            Phase::VerifyingOnChain,
            format!("waiting for finality of {}", identity),
        );
        let (finality_budget, clamped) = budget.clamp(self.settings.finality_timeout);
        if finality_budget.is_zero() {
            return Err(WorkflowError::WorkflowTimeout);
        }
        let record = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(WorkflowError::Cancelled),
            result = tokio::time::timeout(
                finality_budget,
                self.gateway.await_finality(&identity, finality_budget),
            ) => match result {
                Ok(Ok(record)) => record,
                Ok(Err(FinalityError::Rejected(msg))) => {
                    return Err(WorkflowError::OnChainRejected(msg))
                }
                Ok(Err(FinalityError::Timeout)) => return Err(WorkflowError::FinalityTimeout),
                Ok(Err(FinalityError::Transport(msg))) => {
                    // The submission may still finalize; tell the caller
                    // to re-check rather than invent a rejection.
                    tracing::warn!(identity = %identity, error = %msg, "finality query failed");
                    return Err(WorkflowError::FinalityTimeout);
                }
                Err(_) if clamped => return Err(WorkflowError::WorkflowTimeout),
                Err(_) => return Err(WorkflowError::FinalityTimeout),
            },
        };
        tracing::debug!(identity = %identity, root = %record.root, "finalized on-chain");

        // Phase 3: poll the backend until its view matches the record.
        progress.transition(
            Phase::AwaitingBackend,
            format!("waiting for backend index to reflect {}", identity),
        );
        let (poll_budget, clamped) = budget.clamp(self.settings.polling.deadline);
        if poll_budget.is_zero() {
            return Err(WorkflowError::WorkflowTimeout);
        }
        let policy = self.settings.polling.clone().with_deadline(poll_budget);

        let backend = Arc::clone(&self.backend);
        let poll_identity = identity.clone();
        let expected = record.clone();
        let view = scheduler::execute(&policy, &self.cancel, move |attempt| {
            let backend = Arc::clone(&backend);
            let identity = poll_identity.clone();
            let expected = expected.clone();
            async move {
                metrics::record_backend_poll("provision");
                tracing::trace!(identity = %identity, attempt, "polling backend index");
                match backend.get_resource(&identity).await {
                    Ok(ResourceStatus::Found(view)) if view.is_consistent_with(&expected) => {
                        Ok(view)
                    }
                    Ok(ResourceStatus::Found(view)) => Err(AttemptError::Retryable(
                        PollFailure::Stale {
                            backend_root: view.root,
                        },
                    )),
                    Ok(ResourceStatus::NotFoundYet) => {
                        Err(AttemptError::Retryable(PollFailure::NotIndexed))
                    }
                    Err(BackendError::Transport(msg)) => {
                        Err(AttemptError::Retryable(PollFailure::Transport(msg)))
                    }
                    Err(BackendError::Malformed(msg)) => {
                        Err(AttemptError::Retryable(PollFailure::Transport(msg)))
                    }
                }
            }
        })
        .await
        .map_err(|e| match e {
            RetryError::Cancelled => WorkflowError::Cancelled,
            RetryError::Exhausted { .. } if clamped => WorkflowError::WorkflowTimeout,
            RetryError::Exhausted { attempts, last } => {
                tracing::warn!(
                    identity = %identity,
                    attempts,
                    last_failure = %last.map(|f| f.to_string()).unwrap_or_default(),
                    "backend index never caught up"
                );
                WorkflowError::BackendIndexTimeout
            }
            RetryError::Terminal(f) => WorkflowError::BackendUnavailable(f.to_string()),
        })?;

        progress.transition(Phase::Complete, format!("{} is ready", identity));
        Ok(WorkflowResult { record, view })
    }
}
