use std::sync::Arc;

use tracing::{info, warn};

use crate::application::use_cases::bulk_upload_session::SessionController;
use crate::application::use_cases::property_gateway::PropertyGateway;
use crate::domain::error::Result;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::hubspot::HubSpotClient;
use crate::interfaces::http::HttpState;

/// Wire the CRM client, gateway and edit session for the HTTP server.
pub fn setup(config: &AppConfig) -> Result<HttpState> {
    let client = HubSpotClient::new(&config.hubspot_base_url)?;
    let gateway = Arc::new(PropertyGateway::new(Arc::new(client), config));

    if gateway.has_api_key() {
        info!(base_url = %config.hubspot_base_url, "HubSpot gateway configured");
    } else {
        warn!("HUBSPOT_API_KEY is not set; gateway requests will fail until it is configured");
    }

    let session = Arc::new(SessionController::new(gateway.clone()));
    Ok(HttpState { gateway, session })
}
