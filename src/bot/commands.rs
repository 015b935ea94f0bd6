//! Parsing of inbound message text into bot commands.

use crate::lookup::LOOKUP_COMMAND;

/// What an inbound text asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    History,
    Stats,
    /// Free-text lookup; carries the raw argument, possibly blank.
    Lookup(String),
    /// Anything else is a title to resolve, including unknown `/commands`.
    Title(String),
}

impl Command {
    /// Parse `/name[@bot] [argument]`, or treat the whole text as a title.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim_start();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Self::Title(text.to_string());
        };

        let (head, argument) = match rest.find(char::is_whitespace) {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, ""),
        };
        let name = head.split('@').next().unwrap_or_default();

        match name {
            "start" => Self::Start,
            "help" => Self::Help,
            "history" => Self::History,
            "stats" => Self::Stats,
            LOOKUP_COMMAND => Self::Lookup(argument.trim().to_string()),
            _ => Self::Title(text.to_string()),
        }
    }

    /// Name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Help => "help",
            Self::History => "history",
            Self::Stats => "stats",
            Self::Lookup(_) => LOOKUP_COMMAND,
            Self::Title(_) => "title",
        }
    }
}
