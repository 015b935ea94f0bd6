//! Telegram front end.
//!
//! - [`telegram`] -- Bot API client (long polling, `sendMessage`, `sendPhoto`).
//! - [`transport`] -- The [`Transport`] seam handlers send through.
//! - [`commands`] -- Inbound text to [`Command`].
//! - [`handlers`] -- Per-message routing and answer delivery.
//! - [`dispatcher`] -- Polling loop and per-update tasks.
//! - [`messages`] -- Static texts and report formatting.

pub mod commands;
pub mod dispatcher;
pub mod handlers;
pub mod messages;
pub mod telegram;
pub mod transport;

pub use commands::Command;
pub use handlers::{deliver, handle_message, IncomingMessage};
pub use telegram::TelegramClient;
pub use transport::Transport;
