//! HTTP implementation of the backend index client.
//!
//! # Responsibilities
//! - Map the backend's REST surface onto `BackendIndexClient`
//! - Translate HTTP status codes into `ResourceStatus` / `BackendError`
//! - Enforce a per-request timeout
//!
//! # Design Decisions
//! - 404 means "not indexed yet", not failure: the indexer lags the chain
//! - 5xx and transport failures are retryable `Transport` errors
//! - Non-JSON bodies on success paths are `Malformed` (indicates a
//!   backend bug, still retryable by policy at the workflow layer)

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::backend::client::BackendIndexClient;
use crate::backend::types::{BackendError, BackendView, ResourceStatus};
use crate::ledger::types::ResourceIdentity;

/// Backend index client speaking the provider's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpBackendIndexClient {
    client: Client,
    base_url: String,
}

impl HttpBackendIndexClient {
    /// Create a client against `base_url` with a per-request timeout.
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn resource_url(&self, identity: &ResourceIdentity) -> String {
        match identity {
            ResourceIdentity::Bucket(id) => {
                format!("{}/api/v1/buckets/{}", self.base_url, id)
            }
            ResourceIdentity::File(key) => {
                format!("{}/api/v1/files/{}", self.base_url, key)
            }
        }
    }
}

#[async_trait]
impl BackendIndexClient for HttpBackendIndexClient {
    async fn get_resource(
        &self,
        identity: &ResourceIdentity,
    ) -> Result<ResourceStatus, BackendError> {
        let url = self.resource_url(identity);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(ResourceStatus::NotFoundYet),
            status if status.is_success() => {
                let view: BackendView = resp
                    .json()
                    .await
                    .map_err(|e| BackendError::Malformed(e.to_string()))?;
                Ok(ResourceStatus::Found(view))
            }
            status => Err(BackendError::Transport(format!(
                "backend returned status {} for {}",
                status, url
            ))),
        }
    }

    async fn list_resources(&self, owner: &str) -> Result<Vec<BackendView>, BackendError> {
        let url = format!("{}/api/v1/resources", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("owner", owner)])
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BackendError::Transport(format!(
                "backend returned status {} for listing",
                status
            )));
        }

        resp.json()
            .await
            .map_err(|e| BackendError::Malformed(e.to_string()))
    }
}
