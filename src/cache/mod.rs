//! Shared caches.
//!
//! # Design Decisions
//! - The listing cache is the only state shared across workflow
//!   instances; everything else is per-instance
//! - Invalidation over in-place update: no reconciliation between cache
//!   writes and concurrent unrelated reads

pub mod listing;

pub use listing::ListingCache;
