use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub app: AppConfig,
    #[serde(default = "default_tg_config")]
    pub tg: TgConfig,
    /// Taken from `BOT_TOKEN`, never from the file.
    #[serde(skip)]
    pub bot_token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Public URL Telegram should deliver updates to
    pub webhook_url: String,
    pub port: u16,
    /// Accepted for compatibility with existing config files; nothing reads it.
    #[serde(default)]
    #[allow(dead_code)]
    pub password_retention_minute: u32,
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TgConfig {
    #[serde(default = "default_webhook_method")]
    pub webhook_method: String,
    #[serde(default = "default_send_message_method")]
    pub send_message_method: String,
    #[serde(default = "default_hello_message")]
    pub hello_message: String,
    #[serde(default = "default_unknown_message")]
    pub unknown_message: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

fn default_webhook_path() -> String {
    "/".to_string()
}

fn default_webhook_method() -> String {
    "setWebhook".to_string()
}

fn default_send_message_method() -> String {
    "sendMessage".to_string()
}

fn default_hello_message() -> String {
    "Привет! Я подскажу, какую книгу почитать или какой фильм посмотреть. \
     Наберите /find, чтобы начать."
        .to_string()
}

fn default_unknown_message() -> String {
    "Я Вас не понимаю".to_string()
}

fn default_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_tg_config() -> TgConfig {
    TgConfig {
        webhook_method: default_webhook_method(),
        send_message_method: default_send_message_method(),
        hello_message: default_hello_message(),
        unknown_message: default_unknown_message(),
        api_base_url: default_api_base_url(),
    }
}

/// Route paths must start with `/` and may not contain route parameters.
fn normalize_webhook_path(path: &str) -> Result<String> {
    if path.contains(['{', '}', '*']) {
        anyhow::bail!("webhook_path must be a literal path: {}", path);
    }
    if path.starts_with('/') {
        Ok(path.to_string())
    } else {
        Ok(format!("/{}", path))
    }
}

impl Config {
    /// Read the TOML file at `path` and apply overrides from the process environment.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.apply_env(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.app.webhook_path = normalize_webhook_path(&config.app.webhook_path)?;
        Ok(config)
    }

    /// Overlay environment values on top of the file. `lookup` returns the
    /// value of a variable if it is set.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("APP_WEBHOOK_URL") {
            self.app.webhook_url = url;
        }
        if let Some(port) = lookup("APP_PORT") {
            self.app.port = port
                .parse()
                .with_context(|| format!("APP_PORT is not a valid port: {}", port))?;
        }
        if let Some(method) = lookup("TG_WEBHOOK_METHOD") {
            self.tg.webhook_method = method;
        }
        if let Some(method) = lookup("TG_SEND_MESSAGE_METHOD") {
            self.tg.send_message_method = method;
        }

        self.bot_token = lookup("BOT_TOKEN")
            .filter(|t| !t.is_empty())
            .context("BOT_TOKEN is not set")?;

        Ok(())
    }
}
