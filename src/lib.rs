//! Cinemabot - find movies by title from a chat
//!
//! The library crate holds the resolution pipeline and the Telegram front end
//! so both the binary and the integration tests can drive them.
//!
//! Data flow: raw text → [`normalize`] → [`resolution::Orchestrator`]
//! ([`metadata::TitleResolver`], [`probe::WatchProber`]) → answer delivered
//! by [`bot`], with the query appended to [`history`].

pub mod bot;
pub mod config;
pub mod context;
pub mod error;
pub mod history;
pub mod lookup;
pub mod metadata;
pub mod normalize;
pub mod probe;
pub mod resolution;
