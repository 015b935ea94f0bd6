//! Database migrations module
//!
//! Handles the SQLite schema for cinemabot. Migrations are embedded in the
//! binary and executed in order; re-running them is a no-op.

use rusqlite::{Connection, Result};
use thiserror::Error;

/// Migration error types
#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration {0} failed: {1}")]
    Failed(usize, String),
}

/// A single migration with its SQL content
struct Migration {
    version: usize,
    name: &'static str,
    sql: &'static str,
}

/// All available migrations
const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "search_history",
    sql: include_str!("001_search_history.sql"),
}];

/// Holding name for a history table written before schema tracking existed.
/// That table had only `(user_id, film_name)`; its rows are copied into the
/// migrated table and the holding table is dropped.
const LEGACY_HISTORY_TABLE: &str = "search_history_legacy";

fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>>>()?;
    Ok(columns)
}

/// Move an untracked two-column `search_history` out of the way so the first
/// migration can create the full table.
fn set_aside_legacy_history(conn: &Connection) -> Result<bool> {
    let columns = table_columns(conn, "search_history")?;
    if columns.is_empty() || columns.iter().any(|c| c == "created_at") {
        return Ok(false);
    }

    conn.execute_batch(&format!(
        "ALTER TABLE search_history RENAME TO {LEGACY_HISTORY_TABLE}"
    ))?;
    Ok(true)
}

/// Copy rows from a set-aside history table in their original order.
fn import_legacy_history(conn: &Connection) -> Result<usize> {
    if table_columns(conn, LEGACY_HISTORY_TABLE)?.is_empty() {
        return Ok(0);
    }

    let copied = conn.execute(
        &format!(
            "INSERT INTO search_history (user_id, film_name)
             SELECT user_id, film_name FROM {LEGACY_HISTORY_TABLE}
             WHERE user_id IS NOT NULL AND film_name IS NOT NULL
             ORDER BY rowid"
        ),
        [],
    )?;
    conn.execute_batch(&format!("DROP TABLE {LEGACY_HISTORY_TABLE}"))?;
    Ok(copied)
}

fn init_migrations_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;
    Ok(())
}

fn get_current_version(conn: &Connection) -> Result<usize> {
    conn.query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
        row.get::<_, Option<usize>>(0)
    })
    .map(|version| version.unwrap_or(0))
}

fn apply_migration(conn: &Connection, migration: &Migration) -> Result<(), MigrationError> {
    conn.execute_batch(migration.sql)
        .map_err(|e| MigrationError::Failed(migration.version, e.to_string()))?;

    conn.execute(
        "INSERT INTO schema_migrations (version, name) VALUES (?, ?)",
        rusqlite::params![migration.version, migration.name],
    )
    .map_err(|e| MigrationError::Failed(migration.version, e.to_string()))?;

    Ok(())
}

/// Run all pending migrations
///
/// Creates the tracking table if needed, then applies every migration newer
/// than the recorded schema version, each inside its own transaction. An
/// untracked `search_history(user_id, film_name)` table is upgraded in place:
/// its rows end up in the migrated table with fresh ids and timestamps.
///
/// # Returns
///
/// * `Ok(usize)` - Number of migrations applied
/// * `Err(MigrationError)` - If any migration fails
pub fn run_migrations(conn: &Connection) -> Result<usize, MigrationError> {
    init_migrations_table(conn)?;

    let current_version = get_current_version(conn)?;

    let pending_migrations: Vec<_> = MIGRATIONS
        .iter()
        .filter(|m| m.version > current_version)
        .collect();

    let mut applied_count = 0;
    for migration in pending_migrations {
        let tx = conn.unchecked_transaction()?;

        if current_version == 0 && set_aside_legacy_history(&tx)? {
            tracing::info!("Found untracked search_history table; upgrading it");
        }

        apply_migration(&tx, migration)?;

        tx.commit()
            .map_err(|e| MigrationError::Failed(migration.version, e.to_string()))?;

        applied_count += 1;

        tracing::info!(
            version = migration.version,
            name = migration.name,
            "Applied migration"
        );
    }

    let tx = conn.unchecked_transaction()?;
    let imported = import_legacy_history(&tx)?;
    tx.commit()?;
    if imported > 0 {
        tracing::info!(rows = imported, "Imported untracked search history");
    }

    Ok(applied_count)
}

/// Get the current schema version without applying migrations
pub fn current_version(conn: &Connection) -> Result<usize, MigrationError> {
    init_migrations_table(conn)?;
    Ok(get_current_version(conn)?)
}

/// Get the latest available migration version
pub fn latest_version() -> usize {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_run_migrations() {
        let conn = Connection::open_in_memory().unwrap();

        let applied = run_migrations(&conn).unwrap();
        assert_eq!(applied, MIGRATIONS.len());

        let version = current_version(&conn).unwrap();
        assert_eq!(version, latest_version());

        // Second run is a no-op
        let applied = run_migrations(&conn).unwrap();
        assert_eq!(applied, 0);
    }

    #[test]
    fn test_schema_created() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        for table in ["search_history", "schema_migrations"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "Table {} should exist", table);
        }
    }

    #[test]
    fn test_migrations_upgrade_two_column_history() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE search_history (user_id INTEGER, film_name TEXT);
             INSERT INTO search_history VALUES (1, 'Матрица');
             INSERT INTO search_history VALUES (2, 'Alien');
             INSERT INTO search_history VALUES (NULL, 'Дюна');
             INSERT INTO search_history VALUES (1, 'Дюна');",
        )
        .unwrap();

        assert_eq!(run_migrations(&conn).unwrap(), MIGRATIONS.len());

        let columns = table_columns(&conn, "search_history").unwrap();
        assert!(columns.iter().any(|c| c == "id"));
        assert!(columns.iter().any(|c| c == "created_at"));
        assert!(table_columns(&conn, LEGACY_HISTORY_TABLE).unwrap().is_empty());

        let mut stmt = conn
            .prepare("SELECT user_id, film_name FROM search_history ORDER BY id")
            .unwrap();
        let rows: Vec<(i64, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(
            rows,
            vec![
                (1, "Матрица".to_string()),
                (2, "Alien".to_string()),
                (1, "Дюна".to_string()),
            ]
        );

        conn.execute(
            "INSERT INTO search_history (user_id, film_name) VALUES (3, 'Чужой')",
            [],
        )
        .unwrap();

        // Upgrading is one-shot
        assert_eq!(run_migrations(&conn).unwrap(), 0);
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM search_history", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 4);
    }

    #[test]
    fn test_migrations_tolerate_preexisting_table() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE search_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                film_name TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
        )
        .unwrap();

        assert_eq!(run_migrations(&conn).unwrap(), 1);
    }
}
