//! Per-user search history.
//!
//! [`HistoryStore`] is the async seam the bot talks to. [`SqliteHistory`]
//! runs the blocking `cinemabot-db` queries on the blocking thread pool;
//! [`MemoryHistory`] keeps everything in a vector for tests and dry runs.

use async_trait::async_trait;
use cinemabot_common::{Error, Result, UserId};
use cinemabot_db::models::TopSearch;
use cinemabot_db::pool::{get_conn, DbPool};
use cinemabot_db::queries::search_history;
use parking_lot::Mutex;

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append `title` to the history of `user_id`.
    async fn record_search(&self, user_id: UserId, title: &str) -> Result<()>;

    /// Titles searched by `user_id`, in insertion order.
    async fn history_for(&self, user_id: UserId) -> Result<Vec<String>>;

    /// The `limit` most searched titles across all users, most searched first.
    async fn top_searches(&self, limit: u32) -> Result<Vec<TopSearch>>;
}

/// [`HistoryStore`] backed by the SQLite pool.
#[derive(Clone)]
pub struct SqliteHistory {
    pool: DbPool,
}

impl SqliteHistory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn with_conn<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&rusqlite::Connection) -> Result<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = get_conn(&pool)?;
            op(&conn)
        })
        .await
        .map_err(|e| Error::internal(format!("spawn_blocking join error: {e}")))?
    }
}

#[async_trait]
impl HistoryStore for SqliteHistory {
    async fn record_search(&self, user_id: UserId, title: &str) -> Result<()> {
        let title = title.to_string();
        let record = self
            .with_conn(move |conn| search_history::record_search(conn, user_id, &title))
            .await?;
        tracing::debug!(user_id = %user_id, id = record.id, "Search recorded");
        Ok(())
    }

    async fn history_for(&self, user_id: UserId) -> Result<Vec<String>> {
        self.with_conn(move |conn| search_history::history_for(conn, user_id))
            .await
    }

    async fn top_searches(&self, limit: u32) -> Result<Vec<TopSearch>> {
        self.with_conn(move |conn| search_history::top_searches(conn, limit))
            .await
    }
}

/// In-process [`HistoryStore`].
#[derive(Default)]
pub struct MemoryHistory {
    entries: Mutex<Vec<(UserId, String)>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded `(user, title)` pair, oldest first.
    pub fn entries(&self) -> Vec<(UserId, String)> {
        self.entries.lock().clone()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistory {
    async fn record_search(&self, user_id: UserId, title: &str) -> Result<()> {
        self.entries.lock().push((user_id, title.to_string()));
        Ok(())
    }

    async fn history_for(&self, user_id: UserId) -> Result<Vec<String>> {
        Ok(self
            .entries
            .lock()
            .iter()
            .filter(|(user, _)| *user == user_id)
            .map(|(_, title)| title.clone())
            .collect())
    }

    async fn top_searches(&self, limit: u32) -> Result<Vec<TopSearch>> {
        if limit == 0 {
            return Err(Error::invalid_input("top searches limit must be positive"));
        }

        let mut counts: Vec<TopSearch> = Vec::new();
        for (_, title) in self.entries.lock().iter() {
            match counts.iter_mut().find(|t| &t.film_name == title) {
                Some(top) => top.count += 1,
                None => counts.push(TopSearch {
                    film_name: title.clone(),
                    count: 1,
                }),
            }
        }

        counts.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.film_name.cmp(&b.film_name))
        });
        counts.truncate(limit as usize);
        Ok(counts)
    }
}
