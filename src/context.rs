//! Application context.
//!
//! [`AppContext`] is built once at startup and handed to every message
//! handler. It only holds `Arc`s, so cloning it into a spawned task is cheap.

use std::sync::Arc;

use anyhow::{Context, Result};
use cinemabot_db::pool::DbPool;

use crate::bot::Transport;
use crate::config::Config;
use crate::history::{HistoryStore, SqliteHistory};
use crate::lookup::{MovieLookup, TmdbLookup};
use crate::metadata::providers::{KinopoiskProvider, TmdbProvider};
use crate::metadata::{MetadataResolver, TitleResolver};
use crate::probe::{CoochaProber, WatchProber};
use crate::resolution::Orchestrator;

#[derive(Clone)]
pub struct AppContext {
    /// Immutable configuration snapshot.
    pub config: Arc<Config>,
    /// Search history shared by every handler.
    pub history: Arc<dyn HistoryStore>,
    /// Title resolution pipeline.
    pub orchestrator: Arc<Orchestrator>,
    /// Free-text lookup for the informational command.
    pub lookup: Arc<dyn MovieLookup>,
    /// Outbound chat messages.
    pub transport: Arc<dyn Transport>,
}

impl AppContext {
    pub fn new(
        config: Config,
        history: Arc<dyn HistoryStore>,
        resolver: Arc<dyn TitleResolver>,
        prober: Arc<dyn WatchProber>,
        lookup: Arc<dyn MovieLookup>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let orchestrator = Orchestrator::new(resolver, prober, history.clone());
        Self {
            config: Arc::new(config),
            history,
            orchestrator: Arc::new(orchestrator),
            lookup,
            transport,
        }
    }

    /// Wire the production providers and the on-disk history database.
    pub fn from_config(config: Config, transport: Arc<dyn Transport>) -> Result<Self> {
        let history: Arc<dyn HistoryStore> = Arc::new(open_history(&config)?);
        Ok(Self::new(
            config.clone(),
            history,
            build_resolver(&config),
            build_prober(&config),
            build_lookup(&config),
            transport,
        ))
    }
}

/// Open (creating and migrating if needed) the history database.
pub fn open_pool(config: &Config) -> Result<DbPool> {
    let path = shellexpand::tilde(&config.database.path.to_string_lossy()).into_owned();
    let pool = cinemabot_db::pool::init_pool(&path)
        .with_context(|| format!("Failed to open history database: {}", path))?;
    tracing::info!("History database ready at {}", path);
    Ok(pool)
}

pub fn open_history(config: &Config) -> Result<SqliteHistory> {
    Ok(SqliteHistory::new(open_pool(config)?))
}

pub fn build_resolver(config: &Config) -> Arc<dyn TitleResolver> {
    let provider = KinopoiskProvider::new(&config.kinopoisk);
    Arc::new(MetadataResolver::new(Arc::new(provider)))
}

pub fn build_prober(config: &Config) -> Arc<dyn WatchProber> {
    Arc::new(CoochaProber::new(&config.watch))
}

pub fn build_lookup(config: &Config) -> Arc<dyn MovieLookup> {
    Arc::new(TmdbLookup::new(Arc::new(TmdbProvider::new(&config.tmdb))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::TelegramClient;
    use cinemabot_common::UserId;

    #[tokio::test]
    async fn from_config_creates_history_database() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.database.path = dir.path().join("bot_db.db");

        let transport = Arc::new(TelegramClient::new(&config.telegram));
        let ctx = AppContext::from_config(config, transport).unwrap();

        ctx.history.record_search(UserId::new(1), "Дюна").await.unwrap();
        assert_eq!(ctx.history.history_for(UserId::new(1)).await.unwrap(), vec!["Дюна"]);
        assert!(dir.path().join("bot_db.db").exists());
    }
}
