//! Database models for cinemabot.
//!
//! These structs mirror the rows of the `search_history` table and the
//! aggregates computed over it.

use chrono::{DateTime, Utc};
use cinemabot_common::UserId;
use serde::{Deserialize, Serialize};

/// A single row of the search history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    /// Monotonic row id; defines insertion order.
    pub id: i64,
    /// User who performed the search.
    pub user_id: UserId,
    /// Normalized query text as typed by the user.
    pub film_name: String,
    /// When the row was written.
    pub created_at: DateTime<Utc>,
}

/// A query title together with how often it has been searched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopSearch {
    pub film_name: String,
    pub count: i64,
}
