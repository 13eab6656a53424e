use super::{CrmApi, CrmReply};
use crate::domain::error::{AppError, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

pub struct HubSpotClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HubSpotClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            AppError::ConfigError(format!("Invalid HubSpot base URL '{}': {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::ConfigError(format!(
                "Invalid HubSpot base URL '{}'",
                base_url
            )));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    /// Base URL joined with percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("HubSpot base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder, api_key: &str) -> Result<CrmReply> {
        let response = request
            .bearer_auth(api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| AppError::TransportError(format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::TransportError(format!("Failed to parse JSON: {}", e)))?;

        debug!(status, "HubSpot responded");
        Ok(CrmReply { status, body })
    }
}

#[async_trait]
impl CrmApi for HubSpotClient {
    async fn list_schemas(&self, api_key: &str) -> Result<CrmReply> {
        let url = self.endpoint(&["crm-object-schemas", "v3", "schemas"])?;
        self.send(self.client.get(url), api_key).await
    }

    async fn list_property_groups(&self, api_key: &str, object_type: &str) -> Result<CrmReply> {
        let url = self.endpoint(&["crm", "v3", "properties", object_type, "groups"])?;
        self.send(self.client.get(url), api_key).await
    }

    async fn batch_create_properties(
        &self,
        api_key: &str,
        object_type: &str,
        inputs: &[Value],
    ) -> Result<CrmReply> {
        let url = self.endpoint(&["crm", "v3", "properties", object_type, "batch", "create"])?;
        let body = json!({ "inputs": inputs });
        self.send(self.client.post(url).json(&body), api_key).await
    }
}
