//! Deployment lifecycle handling
//!
//! One-shot permission bootstrap: on a creation or update request, grant the
//! messaging principal permission to invoke the transform worker, then
//! report the result to the caller-supplied callback URL. Deletion requests
//! report success immediately; teardown needs no grant.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, info};

use crate::callback::{CallbackStatus, ResponseCallback};

/// Principal the invocation permission is granted to.
pub const MESSAGING_PRINCIPAL: &str = "sns.amazonaws.com";

/// Action granted to the messaging principal.
pub const GRANT_ACTION: &str = "lambda:InvokeFunction";

/// Statement id used for the grant.
pub const GRANT_STATEMENT_ID: &str = "stmt-id-101";

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Grant error: {0}")]
    Grant(String),

    #[error("Callback error: {0}")]
    Callback(String),
}

/// Deployment lifecycle request as delivered by the orchestrator
#[derive(Debug, Clone, Deserialize)]
pub struct ProvisionRequest {
    #[serde(rename = "RequestType")]
    pub request_type: RequestType,
    #[serde(rename = "ResourceProperties")]
    pub resource_properties: ResourceProperties,
    #[serde(rename = "ResponseURL")]
    pub response_url: String,
    #[serde(rename = "StackId")]
    pub stack_id: String,
    #[serde(rename = "RequestId")]
    pub request_id: String,
    #[serde(rename = "LogicalResourceId")]
    pub logical_resource_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceProperties {
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "LambdaFx")]
    pub function_name: String,
}

/// Collaborator that performs the actual permission grant.
#[async_trait]
pub trait PermissionGranter: Send + Sync {
    /// Grant the messaging principal invoke permission on `function_name`.
    /// Returns the grant result payload for the callback's `Data` field.
    async fn grant_invoke(&self, region: &str, function_name: &str)
        -> Result<Value, ProvisionError>;
}

/// Grant request body sent to the permissions API
#[derive(Debug, Serialize)]
struct GrantRequest<'a> {
    function_name: &'a str,
    region: &'a str,
    action: &'static str,
    principal: &'static str,
    statement_id: &'static str,
}

/// HTTP implementation of the permission grant
pub struct HttpPermissionGranter {
    endpoint: String,
    http_client: Client,
}

impl HttpPermissionGranter {
    pub fn new(endpoint: String, timeout_seconds: u64) -> anyhow::Result<Self> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            endpoint,
            http_client,
        })
    }
}

#[async_trait]
impl PermissionGranter for HttpPermissionGranter {
    async fn grant_invoke(
        &self,
        region: &str,
        function_name: &str,
    ) -> Result<Value, ProvisionError> {
        let url = format!("{}/permissions", self.endpoint);
        let body = GrantRequest {
            function_name,
            region,
            action: GRANT_ACTION,
            principal: MESSAGING_PRINCIPAL,
            statement_id: GRANT_STATEMENT_ID,
        };

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProvisionError::Grant(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProvisionError::Grant(format!(
                "permissions API returned {}",
                response.status()
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ProvisionError::Grant(e.to_string()))
    }
}

/// Handles one deployment lifecycle request end to end.
///
/// Exactly one callback report is issued per request; a failed grant is
/// reported as `FAILED`, never raised past this boundary.
pub struct Provisioner {
    granter: Arc<dyn PermissionGranter>,
    callback: Arc<dyn ResponseCallback>,
}

impl Provisioner {
    pub fn new(granter: Arc<dyn PermissionGranter>, callback: Arc<dyn ResponseCallback>) -> Self {
        Self { granter, callback }
    }

    pub async fn handle(&self, request: ProvisionRequest) -> Result<(), ProvisionError> {
        info!(
            request_type = ?request.request_type,
            resource = %request.logical_resource_id,
            "Provision request received"
        );

        // Deletion requests report success immediately, without granting.
        if request.request_type == RequestType::Delete {
            return self
                .callback
                .send(&request, CallbackStatus::Success, json!({}))
                .await;
        }

        let grant = self
            .granter
            .grant_invoke(
                &request.resource_properties.region,
                &request.resource_properties.function_name,
            )
            .await;

        match grant {
            Ok(result) => {
                info!(
                    function = %request.resource_properties.function_name,
                    "Invoke permission granted"
                );
                self.callback
                    .send(&request, CallbackStatus::Success, json!({ "Result": result }))
                    .await
            }
            Err(e) => {
                error!(error = %e, "Add permission call failed");
                self.callback
                    .send(
                        &request,
                        CallbackStatus::Failed,
                        json!({ "Error": "Add permission call failed" }),
                    )
                    .await
            }
        }
    }
}
