use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{body::Bytes, extract::State, http::StatusCode, routing::post, Router};
use tracing::{error, info, warn};

use crate::commands::Command;
use crate::config::Config;
use crate::telegram::{TelegramClient, Update};

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub telegram: TelegramClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let telegram = TelegramClient::new(&config);
        Self { config, telegram }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let path = state.config.app.webhook_path.clone();
    Router::new()
        .route(&path, post(handle_update))
        .with_state(state)
}

/// Bind the endpoint, register the webhook, then serve updates until the
/// process is killed. Telegram only learns the URL once the port is open.
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let app = router(state.clone());

    let addr = format!("0.0.0.0:{}", state.config.app.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    state
        .telegram
        .set_webhook(&state.config.app.webhook_url)
        .await?;
    info!("Webhook registered: {}", state.config.app.webhook_url);

    info!(
        "Listening for updates on {} (path {})",
        addr, state.config.app.webhook_path
    );

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Telegram gets 200 no matter what happened: a non-2xx makes it redeliver
/// the same update.
async fn handle_update(State(state): State<Arc<AppState>>, body: Bytes) -> StatusCode {
    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!("Could not decode update: {}", e);
            return StatusCode::OK;
        }
    };

    if let Err(e) = dispatch(&state, &update).await {
        error!("Could not execute command: {:#}", e);
    }

    StatusCode::OK
}

async fn dispatch(state: &AppState, update: &Update) -> Result<()> {
    let message = &update.message;
    info!(
        "Message {} from chat {}: {}",
        message.message_id, message.chat.id, message.text
    );

    let reply = Command::parse(&message.text).reply(message.chat.id, &state.config.tg);
    state.telegram.send_message(&reply).await
}
