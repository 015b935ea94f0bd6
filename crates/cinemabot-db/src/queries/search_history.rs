//! Search history queries.
//!
//! The history is append-only: rows are inserted after a successful answer
//! and never updated or deleted by the bot.

use chrono::{DateTime, Utc};
use cinemabot_common::{Error, Result, UserId};
use rusqlite::Connection;

use crate::models::{SearchRecord, TopSearch};

/// Append a search to the history of `user_id`.
///
/// # Returns
///
/// * `Ok(SearchRecord)` - The stored row
/// * `Err(Error)` - If a database error occurs
pub fn record_search(conn: &Connection, user_id: UserId, film_name: &str) -> Result<SearchRecord> {
    let created_at = Utc::now();

    conn.execute(
        "INSERT INTO search_history (user_id, film_name, created_at)
         VALUES (:user_id, :film_name, :created_at)",
        rusqlite::named_params! {
            ":user_id": user_id.get(),
            ":film_name": film_name,
            ":created_at": created_at.to_rfc3339(),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(SearchRecord {
        id: conn.last_insert_rowid(),
        user_id,
        film_name: film_name.to_string(),
        created_at,
    })
}

/// Titles searched by `user_id`, oldest first.
pub fn history_for(conn: &Connection, user_id: UserId) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT film_name FROM search_history WHERE user_id = :user_id ORDER BY id")
        .map_err(|e| Error::database(e.to_string()))?;

    let titles = stmt
        .query_map(rusqlite::named_params! { ":user_id": user_id.get() }, |row| {
            row.get(0)
        })
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<String>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(titles)
}

/// Full history rows of `user_id`, oldest first.
pub fn records_for(conn: &Connection, user_id: UserId) -> Result<Vec<SearchRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, user_id, film_name, created_at
             FROM search_history WHERE user_id = :user_id ORDER BY id",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let rows = stmt
        .query_map(rusqlite::named_params! { ":user_id": user_id.get() }, |row| {
            let created_at: String = row.get(3)?;
            Ok(SearchRecord {
                id: row.get(0)?,
                user_id: UserId::new(row.get(1)?),
                film_name: row.get(2)?,
                created_at: parse_timestamp(&created_at),
            })
        })
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(rows)
}

/// The `limit` most searched titles across all users.
///
/// Ordered by count descending; ties are broken alphabetically so the
/// report is stable.
pub fn top_searches(conn: &Connection, limit: u32) -> Result<Vec<TopSearch>> {
    if limit == 0 {
        return Err(Error::invalid_input("top searches limit must be positive"));
    }

    let mut stmt = conn
        .prepare(
            "SELECT film_name, COUNT(*) AS count FROM search_history
             GROUP BY film_name
             ORDER BY count DESC, film_name ASC
             LIMIT :limit",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let top = stmt
        .query_map(rusqlite::named_params! { ":limit": limit }, |row| {
            Ok(TopSearch {
                film_name: row.get(0)?,
                count: row.get(1)?,
            })
        })
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(top)
}

/// Rows written by the migration default are `YYYY-MM-DD HH:MM:SS` in UTC,
/// rows written by [`record_search`] are RFC 3339.
fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|dt| dt.and_utc())
        })
        .unwrap_or_default()
}
