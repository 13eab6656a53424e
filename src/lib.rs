pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::infrastructure::bootstrap;
use crate::infrastructure::config::AppConfig;
use crate::interfaces::http::start_server;

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Load configuration and serve the HTTP API until shutdown.
pub fn run() -> std::io::Result<()> {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            init_tracing("info");
            error!(error = %err, "Failed to load configuration");
            return Err(std::io::Error::other(err));
        }
    };
    init_tracing(&config.log_level);
    info!(config = ?config, "Starting propbridge");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let state = bootstrap::setup(&config).map_err(|err| {
            error!(error = %err, "Failed to initialise services");
            std::io::Error::other(err)
        })?;
        start_server(&config, state)?.await
    })
}
