mod cli;

use cinemabot::{
    bot::{dispatcher, TelegramClient},
    config,
    context::{self, AppContext},
    history::{HistoryStore, MemoryHistory},
    lookup::{LookupQuery, MovieLookup},
    normalize::normalize,
    resolution::{Orchestrator, Resolution},
};
use cinemabot_common::UserId;
use cinemabot_db::queries::search_history;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use std::sync::Arc;

async fn start_bot(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    config::require_bot_credentials(&config)?;

    tracing::info!("Starting cinemabot");

    let client = Arc::new(TelegramClient::new(&config.telegram));
    let ctx = AppContext::from_config(config, client.clone())?;

    dispatcher::run(ctx, client).await
}

async fn resolve_title(title: &str, config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let history: Arc<dyn HistoryStore> = Arc::new(MemoryHistory::new());
    let orchestrator = Orchestrator::new(
        context::build_resolver(&config),
        context::build_prober(&config),
        history,
    );

    let query = normalize(title);
    tracing::info!("Resolving {:?} (native script: {})", query.canonical_text, query.is_native_script);
    let resolution = orchestrator.resolve(&query).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
        return Ok(());
    }

    match resolution {
        Resolution::Answered(answer) => {
            if let Some(poster) = answer.poster_url() {
                println!("Poster: {}", poster);
            }
            print!("{}", answer.text());
        }
        Resolution::NothingFound => println!("{}", cinemabot::bot::messages::NOTHING_FOUND),
    }
    Ok(())
}

async fn lookup(text: &str, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let query = LookupQuery::parse(text)?;

    let outcome = context::build_lookup(&config).search_by_free_text(&query).await;
    for message in outcome.into_messages() {
        println!("{}", message);
    }
    Ok(())
}

fn show_history(user: i64, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let pool = context::open_pool(&config)?;
    let conn = cinemabot_db::pool::get_conn(&pool)?;

    let records = search_history::records_for(&conn, UserId::new(user))?;
    if records.is_empty() {
        println!("{}", cinemabot::bot::messages::HISTORY_EMPTY);
        return Ok(());
    }
    for record in records {
        println!(
            "{}  {}",
            record.created_at.format("%Y-%m-%d %H:%M:%S"),
            record.film_name
        );
    }
    Ok(())
}

fn show_stats(limit: Option<u32>, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let limit = limit.unwrap_or(config.stats.top_limit);
    let pool = context::open_pool(&config)?;
    let conn = cinemabot_db::pool::get_conn(&pool)?;

    let top = search_history::top_searches(&conn, limit)?;
    print!("{}", cinemabot::bot::messages::stats(&top, limit));
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            print_summary(&config);
        }
        None => {
            println!("No config file specified, using defaults");
            print_summary(&config::Config::default());
        }
    }

    Ok(())
}

fn print_summary(config: &config::Config) {
    let set = |value: &str| if value.is_empty() { "not set" } else { "set" };

    println!("  Telegram token: {}", set(&config.telegram.token));
    println!("  Skip pending updates: {}", config.telegram.skip_pending);
    println!(
        "  Kinopoisk: {} (key {}, {}s timeout, {} req/s)",
        config.kinopoisk.base_url,
        set(&config.kinopoisk.api_key),
        config.kinopoisk.timeout_secs,
        config.kinopoisk.requests_per_second
    );
    println!(
        "  TMDB: {} (key {}, {}s timeout)",
        config.tmdb.base_url,
        set(&config.tmdb.api_key),
        config.tmdb.timeout_secs
    );
    println!(
        "  Watch catalogue: {} ({}s timeout)",
        config.watch.base_url, config.watch.timeout_secs
    );
    println!("  Database: {}", config.database.path.display());
    println!("  Stats rows: {}", config.stats.top_limit);
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "cinemabot=trace,cinemabot_db=debug".to_string()
        } else {
            "cinemabot=debug,cinemabot_db=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Start => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_bot(config_path))
        }
        Commands::Resolve { title, json } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(resolve_title(&title.join(" "), config_path, json))
        }
        Commands::Lookup { text } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(lookup(&text.join(" "), config_path))
        }
        Commands::History { user } => show_history(user, config_path),
        Commands::Stats { limit } => show_stats(limit, config_path),
        Commands::Validate { config: file } => validate_config(file.as_deref().or(config_path)),
        Commands::Version => {
            println!("cinemabot {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
