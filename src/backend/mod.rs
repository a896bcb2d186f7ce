//! Off-chain backend index integration.
//!
//! # Data Flow
//! ```text
//! workflow polling
//!     → client.rs (BackendIndexClient contract)
//!     → http.rs (REST implementation)
//!     → ResourceStatus { Found(BackendView) | NotFoundYet }
//! ```
//!
//! # Design Decisions
//! - The backend is eventually consistent and never authoritative
//! - A present-but-stale view is treated as "not ready"

pub mod client;
pub mod http;
pub mod types;

pub use client::BackendIndexClient;
pub use http::HttpBackendIndexClient;
pub use types::{BackendError, BackendView, ResourceStatus};
