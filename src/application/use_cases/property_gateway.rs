// ============================================================
// PROPERTY GATEWAY USE CASE
// ============================================================
// Credential-holding relay between callers and the CRM property APIs

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info};

use crate::domain::crm::{created_count, UploadSummary};
use crate::domain::error::{AppError, Result};
use crate::domain::property::PropertyRecord;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::hubspot::{CrmApi, CrmReply};
use crate::infrastructure::response::{is_valid_object_type, upstream_message};

pub const OBJECT_TYPE_REQUIRED: &str = "Object type is required";
pub const INVALID_OBJECT_TYPE: &str = "Invalid object type";
pub const INVALID_REQUEST_BODY: &str = "Invalid request body";
pub const API_KEY_MISSING: &str = "HubSpot API key is not configured";

const SCHEMAS_FAILED: &str = "Failed to fetch schemas from HubSpot";
const SCHEMAS_UNEXPECTED: &str = "An unexpected error occurred while fetching schemas from HubSpot";
const UPLOAD_FAILED: &str = "Failed to upload properties to HubSpot";
const UPLOAD_UNEXPECTED: &str = "An unexpected error occurred while uploading properties to HubSpot";

/// Attaches the server-held key to CRM calls and maps their outcomes to
/// caller-facing errors. The key is never returned to callers.
pub struct PropertyGateway {
    client: Arc<dyn CrmApi>,
    api_key: Option<String>,
}

impl PropertyGateway {
    pub fn new(client: Arc<dyn CrmApi>, config: &AppConfig) -> Self {
        Self {
            client,
            api_key: config.api_key().map(str::to_string),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            error!("HubSpot API key is missing");
            AppError::ConfigError(API_KEY_MISSING.to_string())
        })
    }

    /// Schema listing, passed through unchanged on success.
    pub async fn fetch_schemas(&self) -> Result<Value> {
        let api_key = self.api_key()?;
        info!("Fetching object schemas from HubSpot");
        let reply = self
            .client
            .list_schemas(api_key)
            .await
            .map_err(|e| unexpected(e, SCHEMAS_UNEXPECTED))?;
        relay(reply, SCHEMAS_FAILED)
    }

    /// Property-group listing for `object_type`, passed through unchanged on
    /// success.
    pub async fn fetch_property_groups(&self, object_type: Option<&str>) -> Result<Value> {
        let object_type = require_object_type(object_type)?;
        let api_key = self.api_key()?;
        info!(object_type, "Fetching property groups from HubSpot");
        let reply = self
            .client
            .list_property_groups(api_key, object_type)
            .await
            .map_err(|e| {
                unexpected(
                    e,
                    &format!(
                        "An unexpected error occurred while fetching property groups for {} from HubSpot",
                        object_type
                    ),
                )
            })?;
        relay(
            reply,
            &format!("Failed to fetch property groups for {} from HubSpot", object_type),
        )
    }

    /// Upload a raw request body. The object type is checked first, then the
    /// body, then the credential. Array entries are forwarded untouched.
    pub async fn upload_request(
        &self,
        object_type: Option<&str>,
        body: &[u8],
    ) -> Result<UploadSummary> {
        let object_type = require_object_type(object_type)?;
        let inputs = parse_upload_body(body)?;
        self.create_properties(object_type, &inputs).await
    }

    /// Batch-create `records` under `object_type`.
    pub async fn upload_properties(
        &self,
        object_type: &str,
        records: &[PropertyRecord],
    ) -> Result<UploadSummary> {
        let inputs = records
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<Value>, _>>()
            .map_err(|e| AppError::ParseError(format!("Failed to encode property record: {}", e)))?;
        self.create_properties(object_type, &inputs).await
    }

    async fn create_properties(&self, object_type: &str, inputs: &[Value]) -> Result<UploadSummary> {
        let object_type = require_object_type(Some(object_type))?;
        let api_key = self.api_key()?;
        info!(object_type, count = inputs.len(), "Uploading properties to HubSpot");
        debug!(payload = ?inputs, "Batch create payload");

        let reply = self
            .client
            .batch_create_properties(api_key, object_type, inputs)
            .await
            .map_err(|e| unexpected(e, UPLOAD_UNEXPECTED))?;
        let body = relay(reply, UPLOAD_FAILED)?;

        let summary = UploadSummary {
            num_properties_created: created_count(&body),
        };
        info!(created = summary.num_properties_created, "HubSpot upload finished");
        Ok(summary)
    }
}

/// Present and safe to place in an upstream URL path.
pub fn require_object_type(object_type: Option<&str>) -> Result<&str> {
    match object_type {
        None | Some("") => Err(AppError::ValidationError(OBJECT_TYPE_REQUIRED.to_string())),
        Some(value) if !is_valid_object_type(value) => {
            Err(AppError::ValidationError(INVALID_OBJECT_TYPE.to_string()))
        }
        Some(value) => Ok(value),
    }
}

/// Decode an upload body: a JSON array, entries kept as sent.
pub fn parse_upload_body(body: &[u8]) -> Result<Vec<Value>> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "Rejected upload body");
        AppError::ValidationError(INVALID_REQUEST_BODY.to_string())
    })
}

fn relay(reply: CrmReply, fallback: &str) -> Result<Value> {
    if reply.is_success() {
        return Ok(reply.body);
    }
    error!(status = reply.status, body = %reply.body, "HubSpot API error");
    Err(AppError::UpstreamError {
        status: reply.status,
        message: upstream_message(&reply.body, fallback),
    })
}

fn unexpected(err: AppError, message: &str) -> AppError {
    error!(error = %err, "HubSpot request failed");
    AppError::Internal(message.to_string())
}
