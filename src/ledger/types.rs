//! Ledger-side types and error definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The two resource kinds tracked by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Bucket,
    File,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Bucket => write!(f, "bucket"),
            ResourceKind::File => write!(f, "file"),
        }
    }
}

/// Bucket identifier assigned by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BucketId(pub String);

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BucketId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// File key assigned by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileKey(pub String);

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FileKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

/// Canonical on-chain identity of a resource.
///
/// Assigned by the ledger when a submission is accepted. Stable for the
/// lifetime of the resource and used as the idempotency key for every
/// phase after submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceIdentity {
    Bucket(BucketId),
    File(FileKey),
}

impl ResourceIdentity {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceIdentity::Bucket(_) => ResourceKind::Bucket,
            ResourceIdentity::File(_) => ResourceKind::File,
        }
    }
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceIdentity::Bucket(id) => write!(f, "bucket:{}", id),
            ResourceIdentity::File(key) => write!(f, "file:{}", key),
        }
    }
}

/// Caller-supplied description of the resource to create.
///
/// Immutable once submitted. The parent bucket is structural for files,
/// so an intent cannot describe a file without one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ResourceIntent {
    Bucket {
        name: String,
        owner: String,
        private: bool,
    },
    File {
        name: String,
        owner: String,
        bucket: BucketId,
        /// Content fingerprint of the payload to be stored.
        fingerprint: String,
    },
}

impl ResourceIntent {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceIntent::Bucket { .. } => ResourceKind::Bucket,
            ResourceIntent::File { .. } => ResourceKind::File,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ResourceIntent::Bucket { name, .. } => name,
            ResourceIntent::File { name, .. } => name,
        }
    }

    pub fn owner(&self) -> &str {
        match self {
            ResourceIntent::Bucket { owner, .. } => owner,
            ResourceIntent::File { owner, .. } => owner,
        }
    }

    /// Deterministic idempotency key used before the ledger assigns an
    /// identity. Two intents for the same logical resource collide here.
    pub fn idempotency_fingerprint(&self) -> String {
        match self {
            ResourceIntent::Bucket { name, owner, .. } => {
                format!("bucket/{}/{}", owner, name)
            }
            ResourceIntent::File { name, bucket, .. } => {
                format!("file/{}/{}", bucket, name)
            }
        }
    }

    /// Check the intent is submittable. Rejections here are terminal; the
    /// caller must correct the intent.
    pub fn validate(&self) -> Result<(), String> {
        if self.name().is_empty() {
            return Err("resource name must not be empty".to_string());
        }
        if self.owner().is_empty() {
            return Err("resource owner must not be empty".to_string());
        }
        if let ResourceIntent::File { bucket, .. } = self {
            if bucket.0.is_empty() {
                return Err("file intent requires a parent bucket identity".to_string());
            }
        }
        Ok(())
    }
}

/// Authoritative on-chain state of a resource, produced by finality.
///
/// Immutable once finalized; the workflow validates backend state
/// against it and never the other way around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub identity: ResourceIdentity,
    pub owner: String,
    /// Off-chain provider the resource is bound to, when known.
    pub provider: Option<String>,
    /// Root or content hash committed on-chain.
    pub root: String,
    pub private: bool,
}

/// Errors from submitting an intent or a deletion.
///
/// Submission failures are never retried by the workflow: a retry after a
/// transport error could duplicate the chain submission.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The ledger rejected the submission (bad signature, insufficient
    /// balance, invalid intent).
    #[error("submission rejected: {0}")]
    Rejected(String),

    /// The submission round-trip failed in transport.
    #[error("ledger transport error: {0}")]
    Transport(String),
}

/// Errors from waiting on finality.
#[derive(Debug, Error)]
pub enum FinalityError {
    /// The transaction was included and explicitly rejected on-chain.
    #[error("rejected on-chain: {0}")]
    Rejected(String),

    /// Finality was not observed within the collaborator's own budget.
    #[error("finality not observed in time")]
    Timeout,

    /// The finality query failed in transport. The submission may still
    /// finalize later.
    #[error("ledger transport error: {0}")]
    Transport(String),
}
