//! Result reporting to the deployment orchestrator
//!
//! The orchestrator supplies a callback URL with each provision request;
//! the result is delivered as a single HTTP PUT with a JSON body. One
//! attempt per request, no retries.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::provisioner::{ProvisionError, ProvisionRequest};

/// Terminal status reported to the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CallbackStatus {
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "FAILED")]
    Failed,
}

/// Wire body of the callback PUT
#[derive(Debug, Serialize)]
pub struct CallbackBody {
    #[serde(rename = "Status")]
    pub status: CallbackStatus,
    #[serde(rename = "Reason")]
    pub reason: String,
    #[serde(rename = "PhysicalResourceId")]
    pub physical_resource_id: String,
    #[serde(rename = "StackId")]
    pub stack_id: String,
    #[serde(rename = "RequestId")]
    pub request_id: String,
    #[serde(rename = "LogicalResourceId")]
    pub logical_resource_id: String,
    #[serde(rename = "Data")]
    pub data: Value,
}

/// Collaborator that reports a provision result back to the caller.
#[async_trait]
pub trait ResponseCallback: Send + Sync {
    async fn send(
        &self,
        request: &ProvisionRequest,
        status: CallbackStatus,
        data: Value,
    ) -> Result<(), ProvisionError>;
}

/// HTTP PUT implementation of the callback report
pub struct HttpCallback {
    http_client: Client,
}

impl HttpCallback {
    pub fn new(timeout_seconds: u64) -> anyhow::Result<Self> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl ResponseCallback for HttpCallback {
    async fn send(
        &self,
        request: &ProvisionRequest,
        status: CallbackStatus,
        data: Value,
    ) -> Result<(), ProvisionError> {
        let body = CallbackBody {
            status,
            reason: "See the bootstrap service log stream for details".to_string(),
            physical_resource_id: format!("grant-{}", request.request_id),
            stack_id: request.stack_id.clone(),
            request_id: request.request_id.clone(),
            logical_resource_id: request.logical_resource_id.clone(),
            data,
        };

        debug!(url = %request.response_url, status = ?body.status, "Sending callback");

        let response = self
            .http_client
            .put(&request.response_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProvisionError::Callback(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProvisionError::Callback(format!(
                "callback URL returned {}",
                response.status()
            )));
        }

        info!(status = ?body.status, "Callback delivered");
        Ok(())
    }
}
