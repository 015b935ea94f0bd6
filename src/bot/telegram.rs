//! Minimal Telegram Bot API client: long polling plus the two send methods
//! the bot needs.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use cinemabot_common::{ChatId, MessageId, UserId};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::transport::Transport;
use crate::config::TelegramConfig;

/// Slack on top of the long-poll timeout before the HTTP request gives up.
const POLL_GRACE: Duration = Duration::from_secs(10);
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Bot API types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: MessageId,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: ChatId,
}

#[derive(Debug, Serialize)]
struct ReplyParameters {
    message_id: MessageId,
    allow_sending_without_reply: bool,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: ChatId,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_parameters: Option<ReplyParameters>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct TelegramClient {
    client: Client,
    /// `{api_url}/bot{token}`; never logged.
    endpoint: String,
    poll_timeout: Duration,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Self {
        let client = Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client: {}", e);
                Client::new()
            });

        Self {
            client,
            endpoint: format!("{}/bot{}", config.api_url.trim_end_matches('/'), config.token),
            poll_timeout: Duration::from_secs(config.poll_timeout_secs),
        }
    }

    /// Long-poll for updates starting at `offset`.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>> {
        let body = json!({
            "offset": offset,
            "timeout": self.poll_timeout.as_secs(),
            "allowed_updates": ["message"],
        });
        self.call("getUpdates", &body, self.poll_timeout + POLL_GRACE)
            .await
    }

    /// Drop every update queued while the bot was offline. Returns the offset
    /// to continue polling from.
    pub async fn skip_pending(&self) -> Result<Option<i64>> {
        let body = json!({ "offset": -1, "timeout": 0 });
        let updates: Vec<Update> = self.call("getUpdates", &body, SEND_TIMEOUT).await?;
        Ok(updates.last().map(|u| u.update_id + 1))
    }

    async fn call<T, B>(&self, method: &str, body: &B, timeout: Duration) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}/{}", self.endpoint, method);
        tracing::trace!(method = method, "Telegram API call");

        let response: ApiResponse<T> = self
            .client
            .post(&url)
            .json(body)
            .timeout(timeout)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Telegram {method} request failed"))?
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Telegram {method} returned an unreadable body"))?;

        if !response.ok {
            anyhow::bail!(
                "Telegram {} failed ({}): {}",
                method,
                response.error_code.unwrap_or_default(),
                response.description.unwrap_or_default()
            );
        }

        response
            .result
            .with_context(|| format!("Telegram {method} returned no result"))
    }
}

#[async_trait]
impl Transport for TelegramClient {
    async fn send_text(&self, chat: ChatId, text: &str, reply_to: Option<MessageId>) -> Result<()> {
        let body = SendMessage {
            chat_id: chat,
            text,
            reply_parameters: reply_to.map(|message_id| ReplyParameters {
                message_id,
                allow_sending_without_reply: true,
            }),
        };
        let _: serde_json::Value = self.call("sendMessage", &body, SEND_TIMEOUT).await?;
        Ok(())
    }

    async fn send_photo(&self, chat: ChatId, photo_url: &str) -> Result<()> {
        let body = json!({ "chat_id": chat, "photo": photo_url });
        let _: serde_json::Value = self.call("sendPhoto", &body, SEND_TIMEOUT).await?;
        Ok(())
    }
}
