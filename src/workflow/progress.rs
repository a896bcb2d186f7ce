//! Workflow phase tracking and progress reporting.

use std::fmt;

use crate::workflow::error::WorkflowError;

/// Phase of a provisioning or teardown workflow.
///
/// Transitions are strictly forward; `Failed` is reachable from any
/// non-terminal phase. A phase is never revisited within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Idle,
    Submitting,
    VerifyingOnChain,
    AwaitingBackend,
    Complete,
    Failed,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Complete | Phase::Failed)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Idle => "idle",
            Phase::Submitting => "submitting",
            Phase::VerifyingOnChain => "verifying-onchain",
            Phase::AwaitingBackend => "awaiting-backend",
            Phase::Complete => "complete",
            Phase::Failed => "failed",
        };
        write!(f, "{}", label)
    }
}

/// One progress event: the current phase and a human-readable message.
#[derive(Debug, Clone)]
pub struct WorkflowProgress {
    pub phase: Phase,
    pub message: String,
}

/// Callback invoked on every phase transition.
pub type ProgressObserver = Box<dyn Fn(WorkflowProgress) + Send + Sync>;

/// Enforces monotonic, duplicate-free phase transitions and forwards
/// them to the observer.
pub(crate) struct ProgressReporter {
    current: Phase,
    observer: Option<ProgressObserver>,
}

impl ProgressReporter {
    pub fn new(observer: Option<ProgressObserver>) -> Self {
        Self {
            current: Phase::Idle,
            observer,
        }
    }

    /// Move to `phase`. Backward or duplicate transitions are dropped;
    /// they indicate a workflow bug, so they trip a debug assertion.
    pub fn transition(&mut self, phase: Phase, message: impl Into<String>) {
        if self.current.is_terminal() || phase <= self.current {
            debug_assert!(
                false,
                "non-monotonic phase transition {} -> {}",
                self.current, phase
            );
            return;
        }
        self.current = phase;
        let progress = WorkflowProgress {
            phase,
            message: message.into(),
        };
        tracing::debug!(phase = %progress.phase, message = %progress.message, "workflow progress");
        if let Some(observer) = &self.observer {
            observer(progress);
        }
    }

    /// Terminal failure transition, carrying the failure kind and
    /// message. Emitted before the workflow call resolves.
    pub fn fail(&mut self, error: &WorkflowError) {
        if self.current.is_terminal() {
            return;
        }
        self.current = Phase::Failed;
        let progress = WorkflowProgress {
            phase: Phase::Failed,
            message: error.to_string(),
        };
        tracing::debug!(kind = error.kind(), message = %progress.message, "workflow failed");
        if let Some(observer) = &self.observer {
            observer(progress);
        }
    }

    #[cfg(test)]
    pub fn current(&self) -> Phase {
        self.current
    }
}
