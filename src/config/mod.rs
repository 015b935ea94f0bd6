mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Environment variables that override secrets from the config file.
pub const TELEGRAM_TOKEN_ENV: &str = "CINEMABOT_TELEGRAM_TOKEN";
pub const KINOPOISK_KEY_ENV: &str = "CINEMABOT_KINOPOISK_KEY";
pub const TMDB_KEY_ENV: &str = "CINEMABOT_TMDB_KEY";

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    apply_env_overrides(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./config.toml",
        "./cinemabot.toml",
        "~/.config/cinemabot/config.toml",
        "/etc/cinemabot/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    let mut config = Config::default();
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Replace secrets with values from the environment when those are set.
pub fn apply_env_overrides(config: &mut Config) {
    let overrides = [
        (TELEGRAM_TOKEN_ENV, &mut config.telegram.token),
        (KINOPOISK_KEY_ENV, &mut config.kinopoisk.api_key),
        (TMDB_KEY_ENV, &mut config.tmdb.api_key),
    ];

    for (var, slot) in overrides {
        if let Ok(value) = std::env::var(var) {
            if !value.trim().is_empty() {
                *slot = value.trim().to_string();
            }
        }
    }
}

/// Check the settings needed to run the long-polling bot.
pub fn require_bot_credentials(config: &Config) -> Result<()> {
    if config.telegram.token.is_empty() {
        anyhow::bail!(
            "Telegram token is not set (config `telegram.token` or {})",
            TELEGRAM_TOKEN_ENV
        );
    }
    if config.kinopoisk.api_key.is_empty() {
        tracing::warn!("Kinopoisk API key is not set; every title lookup will come back empty");
    }
    if config.tmdb.api_key.is_empty() {
        tracing::warn!("TMDB API key is not set; /moviebd_big_experimental will report errors");
    }
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    let timeouts = [
        ("kinopoisk", config.kinopoisk.timeout_secs),
        ("tmdb", config.tmdb.timeout_secs),
        ("watch", config.watch.timeout_secs),
    ];
    for (section, secs) in timeouts {
        if secs == 0 {
            anyhow::bail!("[{}] timeout_secs cannot be 0", section);
        }
    }

    if config.kinopoisk.requests_per_second == 0 {
        anyhow::bail!("[kinopoisk] requests_per_second cannot be 0");
    }

    if config.stats.top_limit == 0 {
        anyhow::bail!("[stats] top_limit cannot be 0");
    }

    if config.telegram.poll_timeout_secs == 0 {
        tracing::warn!("telegram.poll_timeout_secs is 0; the bot will short-poll");
    }

    Ok(())
}
