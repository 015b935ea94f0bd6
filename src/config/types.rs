use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,

    #[serde(default)]
    pub kinopoisk: KinopoiskConfig,

    #[serde(default)]
    pub tmdb: TmdbConfig,

    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub stats: StatsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelegramConfig {
    /// Bot token issued by @BotFather (or `CINEMABOT_TELEGRAM_TOKEN`)
    #[serde(default)]
    pub token: String,

    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,

    /// Long-poll timeout passed to getUpdates
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,

    /// Drop updates that queued up while the bot was offline
    #[serde(default = "default_true")]
    pub skip_pending: bool,
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}
fn default_poll_timeout() -> u64 {
    30
}
fn default_true() -> bool {
    true
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: default_telegram_api_url(),
            poll_timeout_secs: default_poll_timeout(),
            skip_pending: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KinopoiskConfig {
    /// kinopoisk.dev API key (or `CINEMABOT_KINOPOISK_KEY`)
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_kinopoisk_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Client-side request budget
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

fn default_kinopoisk_url() -> String {
    "https://api.kinopoisk.dev".to_string()
}
fn default_timeout() -> u64 {
    10
}
fn default_requests_per_second() -> u32 {
    5
}

impl Default for KinopoiskConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_kinopoisk_url(),
            timeout_secs: default_timeout(),
            requests_per_second: default_requests_per_second(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// TMDB v3 API key (or `CINEMABOT_TMDB_KEY`)
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_tmdb_url")]
    pub base_url: String,

    /// Public site used to build detail-page links
    #[serde(default = "default_tmdb_site")]
    pub site_url: String,

    /// Optional ISO-639-1 language tag such as `ru-RU`
    #[serde(default)]
    pub language: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_tmdb_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}
fn default_tmdb_site() -> String {
    "https://www.themoviedb.org".to_string()
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_tmdb_url(),
            site_url: default_tmdb_site(),
            language: None,
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatchConfig {
    /// Catalogue site searched for watch links
    #[serde(default = "default_watch_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_watch_url() -> String {
    "https://watch.coocha.co".to_string()
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            base_url: default_watch_url(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("bot_db.db")
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatsConfig {
    /// Number of rows in the /stats report
    #[serde(default = "default_top_limit")]
    pub top_limit: u32,
}

fn default_top_limit() -> u32 {
    10
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            top_limit: default_top_limit(),
        }
    }
}

impl KinopoiskConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl TmdbConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl WatchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
