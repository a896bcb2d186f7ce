//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Workflows produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters by workflow and outcome)
//!
//! Consumers:
//!     → Log aggregation (stdout, file, remote)
//!     → Whatever metrics recorder the embedder installs
//! ```
//!
//! # Design Decisions
//! - Structured logging throughout; identities and phases as fields
//! - Metrics are cheap (atomic increments) and recorder-agnostic

pub mod logging;
pub mod metrics;
