use admin_console::{config::Config, handler::AppRouter, state::AppState};
use anyhow::{Context, Result};
use dotenv::dotenv;
use shared::utils::{Telemetry, init_logger};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let is_dev = std::env::var("DEV_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    let is_enable_file = std::env::var("ENABLE_FILE_LOG")
        .map(|v| v == "true")
        .unwrap_or(false);

    let config = Config::init().context("Failed to load configuration")?;

    let telemetry = Telemetry::new("admin-console", config.otel_endpoint.clone());
    let providers = telemetry
        .init()
        .context("Failed to initialize telemetry")?;

    init_logger(&providers.logger, "admin-console", is_dev, is_enable_file);

    let port = config.port;

    let state = AppState::new(&config)
        .await
        .context("Failed to create AppState")?;

    info!("Admin console configured against {}", config.api_base_url);

    AppRouter::serve(port, state)
        .await
        .context("Failed to start server")?;

    info!("Shutting down servers...");

    providers.shutdown()?;

    Ok(())
}
