//! Storage Provisioner
//!
//! Client library that drives user-owned storage resources (buckets,
//! files) to consistency across two independently-paced authorities: an
//! on-chain ledger (source of truth, delayed finality) and an off-chain
//! indexing backend that mirrors ledger state asynchronously.
//!
//! # Architecture Overview
//!
//! ```text
//!   caller (StorageClient)
//!        │
//!        ▼
//!   ┌──────────────────────────────────────────────────────────┐
//!   │                    workflow                              │
//!   │  guard ──▶ provision/teardown state machine ──▶ progress │
//!   └──────┬──────────────────────────┬────────────────────────┘
//!          │                          │
//!          ▼                          ▼
//!   ┌─────────────┐   resilience   ┌─────────────┐
//!   │   ledger    │  (retry loop,  │   backend   │
//!   │   gateway   │   backoff,     │    index    │
//!   │  (submit,   │   cancel)      │  (polling,  │
//!   │  finality)  │                │   listing)  │
//!   └─────────────┘                └─────────────┘
//!
//!   Cross-cutting: config, observability (logging, metrics), cache
//! ```
//!
//! A creation run moves through `submitting → verifying-onchain →
//! awaiting-backend → complete`, failing into a typed error from any
//! phase. The backend is only trusted once its indexed root matches the
//! finalized ledger record.

// Core subsystems
pub mod backend;
pub mod config;
pub mod ledger;
pub mod workflow;

// Cross-cutting concerns
pub mod cache;
pub mod observability;
pub mod resilience;

mod client;

pub use backend::{BackendIndexClient, BackendView, HttpBackendIndexClient, ResourceStatus};
pub use client::StorageClient;
pub use config::{load_config, ProvisionerConfig};
pub use ledger::{
    BucketId, FileKey, LedgerGateway, LedgerRecord, ResourceIdentity, ResourceIntent,
    ResourceKind, WalletSession,
};
pub use resilience::{CancelToken, RetryPolicy};
pub use workflow::{
    Phase, ProgressObserver, ProvisioningWorkflow, RemovalPolicy, TeardownWorkflow,
    WorkflowError, WorkflowProgress, WorkflowResult, WorkflowSettings,
};
