//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files,
//! and every field has a default so a minimal (or empty) config is
//! valid.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::resilience::scheduler::RetryPolicy;
use crate::workflow::teardown::RemovalPolicies;
use crate::workflow::WorkflowSettings;

/// Root configuration for the provisioner.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProvisionerConfig {
    /// Ledger gateway settings.
    pub ledger: LedgerConfig,

    /// Backend index settings.
    pub backend: BackendConfig,

    /// Backend polling backoff and deadline.
    pub polling: PollingConfig,

    /// Per-kind teardown readiness policies.
    pub teardown: TeardownConfig,

    /// Workflow-level limits.
    pub workflow: WorkflowLimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ProvisionerConfig {
    /// Timing knobs the workflows consume.
    pub fn workflow_settings(&self) -> WorkflowSettings {
        WorkflowSettings {
            finality_timeout: Duration::from_secs(self.ledger.finality_timeout_secs),
            polling: self.polling.retry_policy(),
            overall_deadline: self
                .workflow
                .overall_deadline_secs
                .map(Duration::from_secs),
        }
    }
}

/// Ledger gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Budget for one finality wait, in seconds.
    pub finality_timeout_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            finality_timeout_secs: 60,
        }
    }
}

/// Backend index configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend's HTTP API.
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Backend polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Delay after the first failed poll, in milliseconds.
    pub base_delay_ms: u64,

    /// Backoff growth factor per attempt.
    pub multiplier: f64,

    /// Ceiling on any single delay, in milliseconds.
    pub max_delay_ms: u64,

    /// Fraction of each delay added as random jitter (0.0..=1.0).
    pub jitter: f64,

    /// Total polling budget, in seconds.
    pub deadline_secs: u64,

    /// Optional cap on attempts; unbounded-until-deadline when absent.
    pub max_attempts: Option<u32>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 1000,
            multiplier: 1.5,
            max_delay_ms: 10_000,
            jitter: 0.1,
            deadline_secs: 60,
            max_attempts: None,
        }
    }
}

impl PollingConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.base_delay_ms),
            multiplier: self.multiplier,
            max_delay: Duration::from_millis(self.max_delay_ms),
            jitter: self.jitter,
            deadline: Duration::from_secs(self.deadline_secs),
        }
    }
}

/// Teardown readiness configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TeardownConfig {
    /// What "deleted" means per resource kind.
    pub removal: RemovalPolicies,
}

/// Workflow-level limits.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WorkflowLimitsConfig {
    /// Optional budget for a whole workflow run, in seconds.
    pub overall_deadline_secs: Option<u64>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log level when `RUST_LOG` is unset
    /// (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
