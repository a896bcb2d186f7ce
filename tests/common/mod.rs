//! Shared mock collaborators for integration testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use storage_provisioner::backend::types::{BackendError, BackendView, ResourceStatus};
use storage_provisioner::ledger::types::{
    FinalityError, LedgerRecord, ResourceIdentity, ResourceIntent, SubmitError,
};
use storage_provisioner::{BackendIndexClient, LedgerGateway, WalletSession};

pub const OWNER: &str = "5alice";

pub fn bucket_intent(name: &str) -> ResourceIntent {
    ResourceIntent::Bucket {
        name: name.to_string(),
        owner: OWNER.to_string(),
        private: false,
    }
}

#[derive(Clone)]
pub enum SubmitBehavior {
    Accept,
    Reject(String),
    Transport(String),
}

#[derive(Clone)]
pub enum FinalityBehavior {
    Finalize,
    Reject(String),
    /// Never answer; the workflow's deadline has to fire.
    Hang,
}

/// Scripted ledger gateway with call counters.
pub struct MockLedger {
    identity: ResourceIdentity,
    record: LedgerRecord,
    submit_behavior: SubmitBehavior,
    finality_behavior: FinalityBehavior,
    pub submit_calls: AtomicU32,
    pub finality_calls: AtomicU32,
    pub deletion_calls: AtomicU32,
}

impl MockLedger {
    /// Gateway that accepts the submission as `identity` and finalizes
    /// it with `root`.
    pub fn accepting(identity: ResourceIdentity, root: &str) -> Self {
        let record = LedgerRecord {
            identity: identity.clone(),
            owner: OWNER.to_string(),
            provider: Some("msp-1".to_string()),
            root: root.to_string(),
            private: false,
        };
        Self {
            identity,
            record,
            submit_behavior: SubmitBehavior::Accept,
            finality_behavior: FinalityBehavior::Finalize,
            submit_calls: AtomicU32::new(0),
            finality_calls: AtomicU32::new(0),
            deletion_calls: AtomicU32::new(0),
        }
    }

    pub fn with_submit_rejection(mut self, message: &str) -> Self {
        self.submit_behavior = SubmitBehavior::Reject(message.to_string());
        self
    }

    pub fn with_submit_transport_failure(mut self, message: &str) -> Self {
        self.submit_behavior = SubmitBehavior::Transport(message.to_string());
        self
    }

    pub fn with_finality_rejection(mut self, message: &str) -> Self {
        self.finality_behavior = FinalityBehavior::Reject(message.to_string());
        self
    }

    pub fn with_hanging_finality(mut self) -> Self {
        self.finality_behavior = FinalityBehavior::Hang;
        self
    }
}

#[async_trait]
impl LedgerGateway for MockLedger {
    async fn submit(&self, _intent: &ResourceIntent) -> Result<ResourceIdentity, SubmitError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        match &self.submit_behavior {
            SubmitBehavior::Accept => Ok(self.identity.clone()),
            SubmitBehavior::Reject(msg) => Err(SubmitError::Rejected(msg.clone())),
            SubmitBehavior::Transport(msg) => Err(SubmitError::Transport(msg.clone())),
        }
    }

    async fn await_finality(
        &self,
        _identity: &ResourceIdentity,
        _deadline: Duration,
    ) -> Result<LedgerRecord, FinalityError> {
        self.finality_calls.fetch_add(1, Ordering::SeqCst);
        match &self.finality_behavior {
            FinalityBehavior::Finalize => Ok(self.record.clone()),
            FinalityBehavior::Reject(msg) => Err(FinalityError::Rejected(msg.clone())),
            FinalityBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(24 * 3600)).await;
                Err(FinalityError::Timeout)
            }
        }
    }

    async fn submit_deletion(&self, _identity: &ResourceIdentity) -> Result<(), SubmitError> {
        self.deletion_calls.fetch_add(1, Ordering::SeqCst);
        match &self.submit_behavior {
            SubmitBehavior::Accept => Ok(()),
            SubmitBehavior::Reject(msg) => Err(SubmitError::Rejected(msg.clone())),
            SubmitBehavior::Transport(msg) => Err(SubmitError::Transport(msg.clone())),
        }
    }

    async fn await_deletion_finality(
        &self,
        _identity: &ResourceIdentity,
        _deadline: Duration,
    ) -> Result<(), FinalityError> {
        self.finality_calls.fetch_add(1, Ordering::SeqCst);
        match &self.finality_behavior {
            FinalityBehavior::Finalize => Ok(()),
            FinalityBehavior::Reject(msg) => Err(FinalityError::Rejected(msg.clone())),
            FinalityBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(24 * 3600)).await;
                Err(FinalityError::Timeout)
            }
        }
    }
}

/// One scripted answer to a backend poll.
#[derive(Clone)]
pub enum ScriptedPoll {
    NotFound,
    Found { root: String },
    Transport(String),
}

/// Backend index that answers polls from a script, then repeats a
/// fallback answer.
pub struct MockBackend {
    identity: ResourceIdentity,
    name: String,
    script: Mutex<VecDeque<ScriptedPoll>>,
    fallback: ScriptedPoll,
    listing: Mutex<Vec<BackendView>>,
    pub get_calls: AtomicU32,
    pub list_calls: AtomicU32,
}

impl MockBackend {
    pub fn new(identity: ResourceIdentity, name: &str, fallback: ScriptedPoll) -> Self {
        Self {
            identity,
            name: name.to_string(),
            script: Mutex::new(VecDeque::new()),
            fallback,
            listing: Mutex::new(Vec::new()),
            get_calls: AtomicU32::new(0),
            list_calls: AtomicU32::new(0),
        }
    }

    /// Backend that already indexed the resource at `root`.
    pub fn ready(identity: ResourceIdentity, name: &str, root: &str) -> Self {
        Self::new(
            identity,
            name,
            ScriptedPoll::Found {
                root: root.to_string(),
            },
        )
    }

    /// Backend that never indexes the resource.
    pub fn never_indexed(identity: ResourceIdentity, name: &str) -> Self {
        Self::new(identity, name, ScriptedPoll::NotFound)
    }

    /// Backend that answers `NotFound` for `lag` polls before indexing
    /// the resource at `root`.
    pub fn catching_up(identity: ResourceIdentity, name: &str, lag: u32, root: &str) -> Self {
        let backend = Self::ready(identity, name, root);
        {
            let mut script = backend.script.lock().unwrap();
            for _ in 0..lag {
                script.push_back(ScriptedPoll::NotFound);
            }
        }
        backend
    }

    pub fn push_script(&self, answer: ScriptedPoll) {
        self.script.lock().unwrap().push_back(answer);
    }

    #[allow(dead_code)]
    pub fn set_listing(&self, views: Vec<BackendView>) {
        *self.listing.lock().unwrap() = views;
    }

    fn view_with_root(&self, root: &str) -> BackendView {
        BackendView {
            identity: self.identity.clone(),
            name: self.name.clone(),
            owner: OWNER.to_string(),
            root: root.to_string(),
            private: false,
        }
    }
}

#[async_trait]
impl BackendIndexClient for MockBackend {
    async fn get_resource(
        &self,
        _identity: &ResourceIdentity,
    ) -> Result<ResourceStatus, BackendError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        let answer = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        match answer {
            ScriptedPoll::NotFound => Ok(ResourceStatus::NotFoundYet),
            ScriptedPoll::Found { root } => Ok(ResourceStatus::Found(self.view_with_root(&root))),
            ScriptedPoll::Transport(msg) => Err(BackendError::Transport(msg)),
        }
    }

    async fn list_resources(&self, _owner: &str) -> Result<Vec<BackendView>, BackendError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.listing.lock().unwrap().clone())
    }
}

/// Wallet session with a fixed address.
pub struct MockWallet {
    address: Option<String>,
}

impl MockWallet {
    pub fn connected() -> Self {
        Self {
            address: Some(OWNER.to_string()),
        }
    }

    #[allow(dead_code)]
    pub fn disconnected() -> Self {
        Self { address: None }
    }
}

impl WalletSession for MockWallet {
    fn current_address(&self) -> Option<String> {
        self.address.clone()
    }
}
