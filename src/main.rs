mod bot;
mod commands;
mod config;
mod telegram;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::bot::AppState;
use crate::config::Config;

const ENV_PATH: &str = ".env";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,chooser_bot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Optional; real environment variables take precedence
    if dotenvy::from_filename(ENV_PATH).is_ok() {
        info!("Loaded environment from {}", ENV_PATH);
    }

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  Webhook URL: {}", config.app.webhook_url);
    info!("  Port: {}", config.app.port);

    let state = Arc::new(AppState::new(config));
    bot::run(state).await?;

    Ok(())
}
