use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cinemabot")]
#[command(author, version, about = "Telegram bot that finds movies by title")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the bot (Telegram long polling)
    Start,

    /// Resolve a title once and print the answer
    Resolve {
        /// Title as a user would type it
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the free-text TMDB lookup and print the summaries
    Lookup {
        /// Search text
        #[arg(num_args = 0..)]
        text: Vec<String>,
    },

    /// Print the search history of a user
    History {
        /// Telegram user id
        #[arg(short, long)]
        user: i64,
    },

    /// Print the most searched titles
    Stats {
        /// Number of rows (defaults to `stats.top_limit`)
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
