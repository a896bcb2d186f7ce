//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Polling stage:
//!     → scheduler.rs (retry loop: classify, retry or abort)
//!     → backoff.rs (exponential delay with jitter between attempts)
//!     → cancel.rs (external cancellation aborts attempt and sleep)
//! ```
//!
//! # Design Decisions
//! - Every polling loop has an overall deadline; nothing waits forever
//! - Retries only for failures the operation classifies as transient
//! - Cancellation is a first-class outcome, distinct from timeout

pub mod backoff;
pub mod cancel;
pub mod scheduler;

pub use cancel::CancelToken;
pub use scheduler::{AttemptError, RetryError, RetryPolicy};
