//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, jitter a fraction)
//! - Check the backend URL parses
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function over the config
//! - Runs before a config is accepted into the system

use std::fmt;

use crate::config::schema::ProvisionerConfig;

/// One semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn err(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Check a parsed configuration for semantic problems.
pub fn validate_config(config: &ProvisionerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.ledger.finality_timeout_secs == 0 {
        errors.push(err("ledger.finality_timeout_secs", "must be greater than 0"));
    }

    if url::Url::parse(&config.backend.base_url).is_err() {
        errors.push(err(
            "backend.base_url",
            format!("'{}' is not a valid URL", config.backend.base_url),
        ));
    }
    if config.backend.request_timeout_secs == 0 {
        errors.push(err("backend.request_timeout_secs", "must be greater than 0"));
    }

    let polling = &config.polling;
    if polling.base_delay_ms == 0 {
        errors.push(err("polling.base_delay_ms", "must be greater than 0"));
    }
    if polling.max_delay_ms < polling.base_delay_ms {
        errors.push(err(
            "polling.max_delay_ms",
            "must be at least polling.base_delay_ms",
        ));
    }
    if polling.multiplier < 1.0 {
        errors.push(err("polling.multiplier", "must be at least 1.0"));
    }
    if !(0.0..=1.0).contains(&polling.jitter) {
        errors.push(err("polling.jitter", "must be between 0.0 and 1.0"));
    }
    if polling.deadline_secs == 0 {
        errors.push(err("polling.deadline_secs", "must be greater than 0"));
    }
    if polling.max_attempts == Some(0) {
        errors.push(err("polling.max_attempts", "must be at least 1 when set"));
    }

    if config.workflow.overall_deadline_secs == Some(0) {
        errors.push(err(
            "workflow.overall_deadline_secs",
            "must be greater than 0 when set",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
