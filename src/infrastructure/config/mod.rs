use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::{AppError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "propbridge.toml";
pub const DEFAULT_HUBSPOT_BASE_URL: &str = "https://api.hubapi.com";

/// Runtime settings, layered defaults → TOML file → environment.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Private-app token sent as a bearer credential. Blank counts as unset.
    #[serde(default)]
    pub hubspot_api_key: Option<String>,
    pub hubspot_base_url: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            hubspot_api_key: None,
            hubspot_base_url: DEFAULT_HUBSPOT_BASE_URL.to_string(),
            host: "127.0.0.1".to_string(),
            port: 3001,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load `.env`, then the config file named by `PROPBRIDGE_CONFIG`
    /// (falling back to `propbridge.toml`), then the environment.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let path = std::env::var("PROPBRIDGE_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::figment(&path)
            .extract()
            .map_err(|e| AppError::ConfigError(format!("Failed to load configuration: {}", e)))
    }

    pub fn figment(path: &str) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("PROPBRIDGE_"))
            .merge(Env::raw().only(&["HUBSPOT_API_KEY", "HUBSPOT_BASE_URL"]))
    }

    pub fn api_key(&self) -> Option<&str> {
        self.hubspot_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "hubspot_api_key",
                &self.api_key().map(|_| "<redacted>"),
            )
            .field("hubspot_base_url", &self.hubspot_base_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .finish()
    }
}
