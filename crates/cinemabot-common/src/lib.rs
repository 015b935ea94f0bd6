//! Cinemabot-Common: Shared identifiers and error types.
//!
//! This crate provides functionality used by both the bot and its history
//! database:
//!
//! - **Typed IDs**: Newtype wrappers around the chat platform's integer
//!   identifiers for users, chats and messages
//! - **Error Handling**: Common error type and result alias
//!
//! # Examples
//!
//! ```
//! use cinemabot_common::{Error, Result, UserId};
//!
//! let user = UserId::new(42);
//! assert_eq!(user.get(), 42);
//!
//! fn example() -> Result<()> {
//!     Err(Error::invalid_input("empty title"))
//! }
//! assert!(example().is_err());
//! ```

pub mod error;
pub mod ids;

pub use error::{Error, Result};
pub use ids::*;
