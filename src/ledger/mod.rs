//! On-chain ledger integration.
//!
//! # Data Flow
//! ```text
//! ResourceIntent
//!     → gateway.rs (submit, identity assignment)
//!     → gateway.rs (await_finality → LedgerRecord)
//!     → workflow validates backend state against the record
//! ```
//!
//! # Design Decisions
//! - The ledger is the single source of truth; backend state is checked
//!   against `LedgerRecord`, never the reverse
//! - Submissions are never retried (a duplicate could double-provision)
//! - Runtime bootstrap is explicit init-once state (bootstrap.rs)

pub mod bootstrap;
pub mod gateway;
pub mod types;

pub use gateway::{LedgerGateway, WalletSession};
pub use types::{
    BucketId, FileKey, FinalityError, LedgerRecord, ResourceIdentity, ResourceIntent,
    ResourceKind, SubmitError,
};
