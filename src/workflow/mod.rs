//! Provisioning and teardown workflows.
//!
//! # Data Flow
//! ```text
//! ResourceIntent / ResourceIdentity
//!     → guard.rs (exclusive lease per fingerprint/identity)
//!     → provision.rs / teardown.rs (phased state machine)
//!         → ledger gateway (submit, finality)
//!         → backend index (readiness/removal polling via resilience)
//!     → progress.rs (monotonic phase events to the observer)
//!     → error.rs (typed failure on every non-success exit)
//! ```
//!
//! # Design Decisions
//! - One workflow instance per resource; different resources run fully
//!   in parallel with independent leases and retry loops
//! - The ledger record is ground truth; the backend is polled until it
//!   agrees, never the other way around
//! - A workflow-level deadline, when set, clamps the remaining phase
//!   budgets and surfaces as `WorkflowTimeout`

pub mod error;
pub mod guard;
pub mod progress;
pub mod provision;
pub mod teardown;

use std::time::Duration;

pub use error::WorkflowError;
pub use guard::{GuardKey, IdempotencyGuard, Lease};
pub use progress::{Phase, ProgressObserver, WorkflowProgress};
pub use provision::ProvisioningWorkflow;
pub use teardown::{RemovalPolicies, RemovalPolicy, TeardownWorkflow};

use crate::backend::types::BackendView;
use crate::ledger::types::LedgerRecord;
use crate::resilience::scheduler::RetryPolicy;

/// Successful outcome of a provisioning run: the finalized ledger record
/// together with the backend view that was observed consistent with it.
#[derive(Debug, Clone)]
pub struct WorkflowResult {
    pub record: LedgerRecord,
    pub view: BackendView,
}

/// Timing knobs shared by both workflows.
#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    /// Budget for the single finality wait.
    pub finality_timeout: Duration,
    /// Backoff schedule and deadline for backend polling.
    pub polling: RetryPolicy,
    /// Optional budget for the whole workflow. When it is tighter than
    /// a phase budget, the phase is clamped and expiry surfaces as
    /// `WorkflowTimeout`.
    pub overall_deadline: Option<Duration>,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            finality_timeout: Duration::from_secs(60),
            polling: RetryPolicy::default(),
            overall_deadline: None,
        }
    }
}

/// Tracks the remaining workflow-level budget across phases.
pub(crate) struct PhaseBudget {
    overall: Option<tokio::time::Instant>,
}

impl PhaseBudget {
    pub fn starting_now(overall: Option<Duration>) -> Self {
        Self {
            overall: overall.map(|d| tokio::time::Instant::now() + d),
        }
    }

    /// Clamp a phase budget to what the workflow deadline leaves.
    /// Returns the allowed duration and whether the workflow deadline
    /// did the clamping.
    pub fn clamp(&self, phase: Duration) -> (Duration, bool) {
        match self.overall {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
                if remaining < phase {
                    (remaining, true)
                } else {
                    (phase, false)
                }
            }
            None => (phase, false),
        }
    }
}
