//! Caller-facing provisioning surface.
//!
//! # Responsibilities
//! - Wire the collaborators, guard, and cache into workflow runs
//! - Build intents from the connected wallet session
//! - Serve listings cache-or-fetch and invalidate after state changes
//!
//! # Design Decisions
//! - One `StorageClient` per session; workflows for different resources
//!   run in parallel, each with its own lease and retry loop
//! - The client, not the workflow, invalidates the listing cache after
//!   a successful run
//! - Per-call cancel tokens: cancelling one workflow never affects
//!   another

use std::sync::Arc;

use crate::backend::client::BackendIndexClient;
use crate::backend::types::{BackendError, BackendView};
use crate::cache::listing::ListingCache;
use crate::config::schema::ProvisionerConfig;
use crate::ledger::gateway::{LedgerGateway, WalletSession};
use crate::ledger::types::{BucketId, ResourceIdentity, ResourceIntent};
use crate::resilience::cancel::CancelToken;
use crate::workflow::guard::IdempotencyGuard;
use crate::workflow::progress::ProgressObserver;
use crate::workflow::provision::ProvisioningWorkflow;
use crate::workflow::teardown::{RemovalPolicies, TeardownWorkflow};
use crate::workflow::{WorkflowError, WorkflowResult, WorkflowSettings};

/// Entry point for provisioning, teardown, and listing.
#[derive(Clone)]
pub struct StorageClient {
    gateway: Arc<dyn LedgerGateway>,
    backend: Arc<dyn BackendIndexClient>,
    wallet: Arc<dyn WalletSession>,
    guard: IdempotencyGuard,
    cache: ListingCache,
    settings: WorkflowSettings,
    removal: RemovalPolicies,
}

impl StorageClient {
    pub fn new(
        config: &ProvisionerConfig,
        gateway: Arc<dyn LedgerGateway>,
        backend: Arc<dyn BackendIndexClient>,
        wallet: Arc<dyn WalletSession>,
    ) -> Self {
        Self {
            gateway,
            backend,
            wallet,
            guard: IdempotencyGuard::new(),
            cache: ListingCache::new(),
            settings: config.workflow_settings(),
            removal: config.teardown.removal,
        }
    }

    /// Build a bucket creation intent owned by the connected wallet.
    pub fn bucket_intent(&self, name: &str, private: bool) -> Result<ResourceIntent, WorkflowError> {
        let owner = self.connected_address()?;
        Ok(ResourceIntent::Bucket {
            name: name.to_string(),
            owner,
            private,
        })
    }

    /// Build a file creation intent targeting an existing bucket.
    pub fn file_intent(
        &self,
        name: &str,
        bucket: BucketId,
        fingerprint: &str,
    ) -> Result<ResourceIntent, WorkflowError> {
        let owner = self.connected_address()?;
        Ok(ResourceIntent::File {
            name: name.to_string(),
            owner,
            bucket,
            fingerprint: fingerprint.to_string(),
        })
    }

    fn connected_address(&self) -> Result<String, WorkflowError> {
        self.wallet.current_address().ok_or_else(|| {
            WorkflowError::SubmissionRejected("no wallet address connected".to_string())
        })
    }

    /// Provision a resource and wait until the backend index reflects it.
    pub async fn create_resource(
        &self,
        intent: ResourceIntent,
        observer: Option<ProgressObserver>,
    ) -> Result<WorkflowResult, WorkflowError> {
        self.create_resource_with_cancel(intent, observer, CancelToken::new())
            .await
    }

    /// Like [`create_resource`](Self::create_resource), with an external
    /// cancellation handle.
    pub async fn create_resource_with_cancel(
        &self,
        intent: ResourceIntent,
        observer: Option<ProgressObserver>,
        cancel: CancelToken,
    ) -> Result<WorkflowResult, WorkflowError> {
        let workflow = ProvisioningWorkflow::new(
            Arc::clone(&self.gateway),
            Arc::clone(&self.backend),
            self.guard.clone(),
            self.settings.clone(),
            cancel,
        );
        let result = workflow.run(intent, observer).await?;
        self.cache.invalidate();
        Ok(result)
    }

    /// Tear down a resource per the configured removal policy.
    pub async fn delete_resource(
        &self,
        identity: ResourceIdentity,
        observer: Option<ProgressObserver>,
    ) -> Result<(), WorkflowError> {
        self.delete_resource_with_cancel(identity, observer, CancelToken::new())
            .await
    }

    /// Like [`delete_resource`](Self::delete_resource), with an external
    /// cancellation handle.
    pub async fn delete_resource_with_cancel(
        &self,
        identity: ResourceIdentity,
        observer: Option<ProgressObserver>,
        cancel: CancelToken,
    ) -> Result<(), WorkflowError> {
        let workflow = TeardownWorkflow::new(
            Arc::clone(&self.gateway),
            Arc::clone(&self.backend),
            self.guard.clone(),
            self.settings.clone(),
            self.removal,
            cancel,
        );
        workflow.run(identity, observer).await?;
        self.cache.invalidate();
        Ok(())
    }

    /// List the connected owner's resources, serving the cached snapshot
    /// when one exists.
    ///
    /// With no connected wallet there is nothing to list.
    pub async fn list_resources(&self) -> Result<Arc<Vec<BackendView>>, WorkflowError> {
        if let Some(cached) = self.cache.get() {
            return Ok(cached);
        }

        let owner = match self.wallet.current_address() {
            Some(owner) => owner,
            None => return Ok(Arc::new(Vec::new())),
        };

        let views = self
            .backend
            .list_resources(&owner)
            .await
            .map_err(|e| match e {
                BackendError::Transport(msg) => WorkflowError::BackendUnavailable(msg),
                BackendError::Malformed(msg) => WorkflowError::BackendUnavailable(msg),
            })?;
        Ok(self.cache.store(views))
    }

    /// Drop the cached listing so the next read re-queries the backend.
    pub fn invalidate_listing(&self) {
        self.cache.invalidate();
    }
}
