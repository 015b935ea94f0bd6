//! Long-polling loop.
//!
//! Updates are fetched one batch at a time; each text message is handled on
//! its own task so a slow resolution never delays other users.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::handlers::{handle_message, IncomingMessage};
use super::telegram::{TelegramClient, Update};
use crate::context::AppContext;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Poll until Ctrl-C or SIGTERM.
pub async fn run(ctx: AppContext, client: Arc<TelegramClient>) -> Result<()> {
    let mut offset = if ctx.config.telegram.skip_pending {
        let next = client
            .skip_pending()
            .await
            .context("Failed to skip pending updates")?;
        info!(offset = ?next, "Skipped pending updates");
        next
    } else {
        None
    };

    info!("Polling for updates");

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    let mut backoff = INITIAL_BACKOFF;

    loop {
        let polled = tokio::select! {
            _ = &mut shutdown => break,
            result = client.get_updates(offset) => result,
        };

        match polled {
            Ok(updates) => {
                backoff = INITIAL_BACKOFF;
                for update in updates {
                    offset = Some(update.update_id + 1);
                    spawn_update(&ctx, update);
                }
            }
            Err(e) => {
                warn!(error = %e, retry_in = ?backoff, "Polling failed");
                tokio::select! {
                    _ = &mut shutdown => break,
                    _ = tokio::time::sleep(backoff) => {}
                }
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }
        }
    }

    info!("Bot stopped");
    Ok(())
}

/// Hand a text message to its own task. Non-text updates are dropped.
pub fn spawn_update(ctx: &AppContext, update: Update) -> Option<JoinHandle<()>> {
    let msg = update.message.and_then(IncomingMessage::from_telegram)?;
    let ctx = ctx.clone();

    Some(tokio::spawn(async move {
        if let Err(e) = handle_message(&ctx, &msg).await {
            error!(
                user_id = %msg.user_id,
                chat_id = %msg.chat_id,
                error = %e,
                "Failed to deliver reply"
            );
        }
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
