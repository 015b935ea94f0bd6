use anyhow::Result;
use async_trait::async_trait;
use cinemabot_common::{ChatId, MessageId};

/// Outbound side of the chat platform.
///
/// Handlers only ever talk to the user through this trait, so tests can
/// record what would have been sent.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a text message, optionally as a reply quoting `reply_to`.
    async fn send_text(&self, chat: ChatId, text: &str, reply_to: Option<MessageId>) -> Result<()>;

    /// Send an image by URL.
    async fn send_photo(&self, chat: ChatId, photo_url: &str) -> Result<()>;
}
