//! Database query modules.
//!
//! - search_history: append-only per-user log of successful title searches

pub mod search_history;
