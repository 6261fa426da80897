use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;

/// Inbound webhook payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    pub message: Message,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    /// Missing for photos, stickers and other non-text messages
    #[serde(default)]
    pub text: String,
    pub chat: Chat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Body of a `sendMessage` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseBody {
    pub chat_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<KeyboardMarkup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyboardMarkup {
    pub keyboard: Vec<Vec<KeyboardButton>>,
}

impl KeyboardMarkup {
    /// A keyboard with all labels on a single row
    pub fn single_row(labels: &[&str]) -> Self {
        Self {
            keyboard: vec![labels
                .iter()
                .map(|label| KeyboardButton {
                    text: label.to_string(),
                })
                .collect()],
        }
    }

    #[cfg(test)]
    pub fn labels(&self) -> Vec<&str> {
        self.keyboard
            .iter()
            .flatten()
            .map(|b| b.text.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyboardButton {
    pub text: String,
}

#[derive(Debug, Serialize)]
struct WebhookRequest<'a> {
    url: &'a str,
}

/// Thin client over the Bot API: one POST per call, no retries.
pub struct TelegramClient {
    client: reqwest::Client,
    api_base_url: String,
    bot_token: String,
    webhook_method: String,
    send_message_method: String,
}

impl TelegramClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base_url: config.tg.api_base_url.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            webhook_method: config.tg.webhook_method.clone(),
            send_message_method: config.tg.send_message_method.clone(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base_url, self.bot_token, method)
    }

    /// Tell Telegram to deliver updates to `webhook_url`.
    pub async fn set_webhook(&self, webhook_url: &str) -> Result<()> {
        self.post(&self.webhook_method, &WebhookRequest { url: webhook_url })
            .await
            .context("Failed to set webhook")
    }

    pub async fn send_message(&self, body: &ResponseBody) -> Result<()> {
        self.post(&self.send_message_method, body)
            .await
            .with_context(|| format!("Failed to send message to chat {}", body.chat_id))
    }

    async fn post<T: Serialize + ?Sized>(&self, method: &str, body: &T) -> Result<()> {
        let payload = serde_json::to_vec(body).context("Failed to serialize request body")?;

        debug!("Calling Telegram method: {}", method);

        let response = self
            .client
            .post(self.method_url(method))
            .header("Content-Type", "application/json")
            .body(payload)
            .send()
            .await
            .with_context(|| format!("Failed to send request to Telegram ({})", method))?;

        // Telegram only answers 200 on success; any 2xx is accepted.
        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Telegram API error ({}): {}", status, error_body);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_update() {
        let raw = json!({
            "update_id": 10,
            "message": {
                "message_id": 7,
                "date": 1700000000,
                "text": "/start",
                "chat": { "id": -100123, "type": "private" }
            }
        });
        let update: Update = serde_json::from_value(raw).unwrap();
        assert_eq!(update.message.message_id, 7);
        assert_eq!(update.message.text, "/start");
        assert_eq!(update.message.chat.id, -100123);
    }

    #[test]
    fn test_decode_update_without_text() {
        let raw = json!({ "message": { "message_id": 1, "chat": { "id": 5 } } });
        let update: Update = serde_json::from_value(raw).unwrap();
        assert_eq!(update.message.text, "");
    }

    #[test]
    fn test_reply_markup_omitted_when_absent() {
        let body = ResponseBody {
            chat_id: 42,
            text: "hi".to_string(),
            reply_markup: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value, json!({ "chat_id": 42, "text": "hi" }));
    }

    #[test]
    fn test_keyboard_wire_shape() {
        let body = ResponseBody {
            chat_id: 1,
            text: "pick".to_string(),
            reply_markup: Some(KeyboardMarkup::single_row(&["A", "B"])),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value["reply_markup"],
            json!({ "keyboard": [[{ "text": "A" }, { "text": "B" }]] })
        );
    }

    #[test]
    fn test_method_url() {
        let mut config = crate::config::Config::parse(
            "[app]\nwebhook_url = \"https://x/\"\nport = 1\n[tg]\napi_base_url = \"http://localhost:1/\"\n",
        )
        .unwrap();
        config.bot_token = "123:abc".to_string();
        let client = TelegramClient::new(&config);
        assert_eq!(
            client.method_url("sendMessage"),
            "http://localhost:1/bot123:abc/sendMessage"
        );
    }
}
