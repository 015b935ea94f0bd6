//! Cinemabot-DB: Search history schema, migrations, and queries
//!
//! This crate stores the per-user search history of cinemabot in SQLite
//! using rusqlite and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database schema
//! - `queries` - Database query operations
//!
//! # Example
//!
//! ```no_run
//! use cinemabot_common::UserId;
//! use cinemabot_db::pool::{init_pool, get_conn};
//! use cinemabot_db::queries::search_history;
//!
//! let pool = init_pool("/var/lib/cinemabot/bot_db.db").unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! search_history::record_search(&conn, UserId::new(42), "Матрица").unwrap();
//! for title in search_history::history_for(&conn, UserId::new(42)).unwrap() {
//!     println!("- {title}");
//! }
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
