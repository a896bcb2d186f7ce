//! Metrics collection.
//!
//! # Metrics
//! - `provisioner_workflows_started_total` (counter): runs by workflow
//! - `provisioner_workflows_finished_total` (counter): runs by workflow
//!   and outcome kind
//! - `provisioner_backend_polls_total` (counter): backend poll attempts
//!   by workflow
//!
//! # Design Decisions
//! - Recorder installation is the embedding application's concern; the
//!   macros are no-ops until one is installed
//! - Low-overhead updates (atomic increments), static label sets

/// Record the start of a workflow run.
pub fn record_workflow_started(workflow: &'static str) {
    metrics::counter!("provisioner_workflows_started_total", "workflow" => workflow).increment(1);
}

/// Record a finished workflow run with its outcome kind
/// ("complete" or a failure kind label).
pub fn record_workflow_outcome(workflow: &'static str, outcome: &'static str) {
    metrics::counter!(
        "provisioner_workflows_finished_total",
        "workflow" => workflow,
        "outcome" => outcome
    )
    .increment(1);
}

/// Record one backend index poll attempt.
pub fn record_backend_poll(workflow: &'static str) {
    metrics::counter!("provisioner_backend_polls_total", "workflow" => workflow).increment(1);
}
