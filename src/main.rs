//! Ticket Office server
//!
//! Reads configuration from a TOML file (`~/.config/ticket-office/config.toml`
//! or `$TICKET_OFFICE_CONFIG`). The `ticket-office-server` binary in `cli/`
//! offers the same with command-line overrides.

use tracing::{error, info};

use ticket_office::server::{init_tracing, ServerHandle, ServerOptions};
use ticket_office::{default_config_path, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("TICKET_OFFICE_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());

    let config = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            let cfg = AppConfig::default();
            init_tracing(&cfg);
            error!("Failed to load config: {}. Using defaults.", e);
            cfg
        }
    };

    let handle = ServerHandle::start(ServerOptions {
        config,
        ..ServerOptions::default()
    })
    .await?;
    handle.install_signal_handler();

    handle.shutdown_signal().wait().await;
    handle.wait().await;
    Ok(())
}
