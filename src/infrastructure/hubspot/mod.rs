pub mod client;

use crate::domain::error::Result;
use async_trait::async_trait;
use serde_json::Value;

pub use client::HubSpotClient;

/// Status and decoded JSON body of a CRM response.
#[derive(Debug, Clone, PartialEq)]
pub struct CrmReply {
    pub status: u16,
    pub body: Value,
}

impl CrmReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Calls made against the CRM's REST API.
///
/// Implementations return `Err` only for transport failures and undecodable
/// bodies; non-success statuses come back as a `CrmReply`.
#[async_trait]
pub trait CrmApi: Send + Sync {
    async fn list_schemas(&self, api_key: &str) -> Result<CrmReply>;

    async fn list_property_groups(&self, api_key: &str, object_type: &str) -> Result<CrmReply>;

    /// `inputs` are sent as-is under `{"inputs": [...]}`.
    async fn batch_create_properties(
        &self,
        api_key: &str,
        object_type: &str,
        inputs: &[Value],
    ) -> Result<CrmReply>;
}
