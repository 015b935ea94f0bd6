//! Per-message handling: route a command to the component that answers it
//! and deliver the reply through the transport.

use anyhow::Result;
use cinemabot_common::{ChatId, MessageId, UserId};
use tracing::{debug, error, warn};

use super::commands::Command;
use super::messages;
use super::telegram::Message;
use super::transport::Transport;
use crate::context::AppContext;
use crate::lookup::LookupQuery;
use crate::resolution::Resolution;

/// A text message from a user, stripped of platform details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub user_id: UserId,
    pub text: String,
}

impl IncomingMessage {
    /// Text messages with a sender; everything else is ignored.
    pub fn from_telegram(message: Message) -> Option<Self> {
        let user_id = message.from?.id;
        Some(Self {
            chat_id: message.chat.id,
            message_id: message.message_id,
            user_id,
            text: message.text?,
        })
    }
}

/// Answer one message. Errors are transport failures; everything else is
/// turned into a reply.
pub async fn handle_message(ctx: &AppContext, msg: &IncomingMessage) -> Result<()> {
    let command = Command::parse(&msg.text);
    debug!(
        user_id = %msg.user_id,
        chat_id = %msg.chat_id,
        command = command.name(),
        "Handling message"
    );

    match command {
        Command::Start => reply(ctx, msg, messages::GREETING).await,
        Command::Help => reply(ctx, msg, messages::HELP).await,
        Command::History => {
            let text = match ctx.history.history_for(msg.user_id).await {
                Ok(titles) => messages::history(&titles),
                Err(e) => {
                    error!(user_id = %msg.user_id, error = %e, "Failed to read search history");
                    messages::STORAGE_UNAVAILABLE.to_string()
                }
            };
            reply(ctx, msg, &text).await
        }
        Command::Stats => {
            let limit = ctx.config.stats.top_limit;
            let text = match ctx.history.top_searches(limit).await {
                Ok(top) => messages::stats(&top, limit),
                Err(e) => {
                    error!(error = %e, "Failed to read search statistics");
                    messages::STORAGE_UNAVAILABLE.to_string()
                }
            };
            reply(ctx, msg, &text).await
        }
        Command::Lookup(argument) => lookup(ctx, msg, &argument).await,
        Command::Title(text) => {
            let resolution = ctx
                .orchestrator
                .resolve_and_answer(&text, msg.user_id)
                .await;
            deliver(ctx.transport.as_ref(), msg.chat_id, &resolution).await
        }
    }
}

async fn reply(ctx: &AppContext, msg: &IncomingMessage, text: &str) -> Result<()> {
    ctx.transport
        .send_text(msg.chat_id, text, Some(msg.message_id))
        .await
}

async fn lookup(ctx: &AppContext, msg: &IncomingMessage, argument: &str) -> Result<()> {
    let query = match LookupQuery::parse(argument) {
        Ok(query) => query,
        Err(e) => {
            debug!(user_id = %msg.user_id, error = %e, "Rejected lookup");
            return ctx
                .transport
                .send_text(msg.chat_id, messages::LOOKUP_MISSING_ARGUMENT, None)
                .await;
        }
    };

    let outcome = ctx.lookup.search_by_free_text(&query).await;
    for text in outcome.into_messages() {
        ctx.transport.send_text(msg.chat_id, &text, None).await?;
    }
    ctx.transport
        .send_text(msg.chat_id, messages::LOOKUP_FOOTER, None)
        .await
}

/// Send a resolution: poster first, then the text block.
///
/// A failed poster send is logged and the text still goes out.
pub async fn deliver(transport: &dyn Transport, chat: ChatId, resolution: &Resolution) -> Result<()> {
    let Resolution::Answered(answer) = resolution else {
        return transport.send_text(chat, messages::NOTHING_FOUND, None).await;
    };

    if let Some(poster) = answer.poster_url() {
        if let Err(e) = transport.send_photo(chat, poster).await {
            warn!(chat_id = %chat, error = %e, "Failed to send poster");
        }
    }
    transport.send_text(chat, &answer.text(), None).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::telegram::{Chat, User};

    fn telegram_message(from: Option<i64>, text: Option<&str>) -> Message {
        Message {
            message_id: MessageId::new(3),
            from: from.map(|id| User {
                id: UserId::new(id),
                username: None,
            }),
            chat: Chat { id: ChatId::new(77) },
            text: text.map(str::to_string),
        }
    }

    #[test]
    fn incoming_requires_sender_and_text() {
        let msg = IncomingMessage::from_telegram(telegram_message(Some(5), Some("дюна"))).unwrap();
        assert_eq!(msg.user_id, UserId::new(5));
        assert_eq!(msg.chat_id, ChatId::new(77));
        assert_eq!(msg.text, "дюна");

        assert!(IncomingMessage::from_telegram(telegram_message(None, Some("дюна"))).is_none());
        assert!(IncomingMessage::from_telegram(telegram_message(Some(5), None)).is_none());
    }
}
