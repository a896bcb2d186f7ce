//! Resource teardown workflow.
//!
//! Mirrors provisioning: submit the deletion, await its finality, then
//! wait for the backend index to drop the resource. For resource kinds
//! where backend removal is not prompt, readiness can be configured as
//! "deletion finalized on-chain" only.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::backend::client::BackendIndexClient;
use crate::backend::types::{BackendError, ResourceStatus};
use crate::ledger::gateway::LedgerGateway;
use crate::ledger::types::{FinalityError, ResourceIdentity, ResourceKind, SubmitError};
use crate::observability::metrics;
use crate::resilience::cancel::CancelToken;
use crate::resilience::scheduler::{self, AttemptError, RetryError};
use crate::workflow::error::WorkflowError;
use crate::workflow::guard::{GuardKey, IdempotencyGuard};
use crate::workflow::progress::{Phase, ProgressObserver, ProgressReporter};
use crate::workflow::{PhaseBudget, WorkflowSettings};

/// What "deleted" means for a resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Poll the backend until the resource is no longer indexed.
    AwaitBackendRemoval,
    /// On-chain finality of the deletion is enough; backend removal is
    /// not awaited.
    ChainOnly,
}

/// Per-kind removal policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemovalPolicies {
    pub bucket: RemovalPolicy,
    pub file: RemovalPolicy,
}

impl Default for RemovalPolicies {
    fn default() -> Self {
        // File removal propagates through the provider lazily, so the
        // chain is the only authority worth waiting on.
        Self {
            bucket: RemovalPolicy::AwaitBackendRemoval,
            file: RemovalPolicy::ChainOnly,
        }
    }
}

impl RemovalPolicies {
    pub fn for_kind(&self, kind: ResourceKind) -> RemovalPolicy {
        match kind {
            ResourceKind::Bucket => self.bucket,
            ResourceKind::File => self.file,
        }
    }
}

enum RemovalPollFailure {
    StillPresent,
    Transport(String),
}

impl fmt::Display for RemovalPollFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemovalPollFailure::StillPresent => write!(f, "still indexed"),
            RemovalPollFailure::Transport(msg) => write!(f, "transport error: {}", msg),
        }
    }
}

/// Phased state machine driving resource deletion.
pub struct TeardownWorkflow {
    gateway: Arc<dyn LedgerGateway>,
    backend: Arc<dyn BackendIndexClient>,
    guard: IdempotencyGuard,
    settings: WorkflowSettings,
    removal: RemovalPolicies,
    cancel: CancelToken,
}

impl TeardownWorkflow {
    pub fn new(
        gateway: Arc<dyn LedgerGateway>,
        backend: Arc<dyn BackendIndexClient>,
        guard: IdempotencyGuard,
        settings: WorkflowSettings,
        removal: RemovalPolicies,
        cancel: CancelToken,
    ) -> Self {
        Self {
            gateway,
            backend,
            guard,
            settings,
            removal,
            cancel,
        }
    }

    /// Run the teardown to completion or typed failure. The guard is
    /// keyed by identity, so a racing provisioning or teardown on the
    /// same resource fails fast with `ConflictingOperation`.
    pub async fn run(
        &self,
        identity: ResourceIdentity,
        observer: Option<ProgressObserver>,
    ) -> Result<(), WorkflowError> {
        let mut progress = ProgressReporter::new(observer);
        metrics::record_workflow_started("teardown");

        let result = self.drive(&identity, &mut progress).await;
        match &result {
            Ok(()) => {
                tracing::info!(identity = %identity, "resource torn down");
                metrics::record_workflow_outcome("teardown", "complete");
            }
            Err(error) => {
                progress.fail(error);
                tracing::warn!(
                    kind = error.kind(),
                    error = %error,
                    identity = %identity,
                    "teardown failed"
                );
                metrics::record_workflow_outcome("teardown", error.kind());
            }
        }
        result
    }

    async fn drive(
        &self,
        identity: &ResourceIdentity,
        progress: &mut ProgressReporter,
    ) -> Result<(), WorkflowError> {
        let budget = PhaseBudget::starting_now(self.settings.overall_deadline);

        let _lease = self.guard.acquire(GuardKey::Identity(identity.clone()))?;

        progress.transition(
            Phase::Submitting,
            format!("submitting deletion of {}", identity),
        );
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(WorkflowError::Cancelled),
            result = self.gateway.submit_deletion(identity) => result.map_err(|e| match e {
                SubmitError::Rejected(msg) => WorkflowError::SubmissionRejected(msg),
                SubmitError::Transport(msg) => WorkflowError::SubmissionRejected(format!(
                    "submission outcome unknown (transport failure): {}",
                    msg
                )),
            })?,
        };

        progress.transition(
            Phase::VerifyingOnChain,
            format!("waiting for finality of {} deletion", identity),
        );
        let (finality_budget, clamped) = budget.clamp(self.settings.finality_timeout);
        if finality_budget.is_zero() {
            return Err(WorkflowError::WorkflowTimeout);
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(WorkflowError::Cancelled),
            result = tokio::time::timeout(
                finality_budget,
                self.gateway.await_deletion_finality(identity, finality_budget),
            ) => match result {
                Ok(Ok(())) => {}
                Ok(Err(FinalityError::Rejected(msg))) => {
                    return Err(WorkflowError::OnChainRejected(msg))
                }
                Ok(Err(FinalityError::Timeout)) => return Err(WorkflowError::FinalityTimeout),
                Ok(Err(FinalityError::Transport(msg))) => {
                    tracing::warn!(identity = %identity, error = %msg, "finality query failed");
                    return Err(WorkflowError::FinalityTimeout);
                }
                Err(_) if clamped => return Err(WorkflowError::WorkflowTimeout),
                Err(_) => return Err(WorkflowError::FinalityTimeout),
            },
        };

        match self.removal.for_kind(identity.kind()) {
            RemovalPolicy::ChainOnly => {
                progress.transition(
                    Phase::Complete,
                    format!("{} deletion finalized on-chain", identity),
                );
                return Ok(());
            }
            RemovalPolicy::AwaitBackendRemoval => {}
        }

        progress.transition(
            Phase::AwaitingBackend,
            format!("waiting for backend index to drop {}", identity),
        );
        let (poll_budget, clamped) = budget.clamp(self.settings.polling.deadline);
        if poll_budget.is_zero() {
            return Err(WorkflowError::WorkflowTimeout);
        }
        let policy = self.settings.polling.clone().with_deadline(poll_budget);

        let backend = Arc::clone(&self.backend);
        let poll_identity = identity.clone();
        scheduler::execute(&policy, &self.cancel, move |attempt| {
            let backend = Arc::clone(&backend);
            let identity = poll_identity.clone();
            async move {
                metrics::record_backend_poll("teardown");
                tracing::trace!(identity = %identity, attempt, "polling backend for removal");
                match backend.get_resource(&identity).await {
                    Ok(ResourceStatus::NotFoundYet) => Ok(()),
                    Ok(ResourceStatus::Found(_)) => {
                        Err(AttemptError::Retryable(RemovalPollFailure::StillPresent))
                    }
                    Err(BackendError::Transport(msg)) => {
                        Err(AttemptError::Retryable(RemovalPollFailure::Transport(msg)))
                    }
                    Err(BackendError::Malformed(msg)) => {
                        Err(AttemptError::Retryable(RemovalPollFailure::Transport(msg)))
                    }
                }
            }
        })
        .await
        .map_err(|e| match e {
            RetryError::Cancelled => WorkflowError::Cancelled,
            RetryError::Exhausted { .. } if clamped => WorkflowError::WorkflowTimeout,
            RetryError::Exhausted { attempts, .. } => {
                tracing::warn!(identity = %identity, attempts, "backend never dropped resource");
                WorkflowError::BackendIndexTimeout
            }
            RetryError::Terminal(f) => WorkflowError::BackendUnavailable(f.to_string()),
        })?;

        progress.transition(Phase::Complete, format!("{} removed", identity));
        Ok(())
    }
}
