//! Movie metadata providers and the title resolver built on top of them.
//!
//! # Module layout
//!
//! - [`provider`] -- Provider trait, query and record types.
//! - [`providers`] -- Concrete providers (kinopoisk.dev, TMDB).
//! - [`resolver`] -- Turns a canonical title into a single [`MetadataRecord`]
//!   or "not found", swallowing provider failures.

pub mod provider;
pub mod providers;
pub mod resolver;

pub use provider::{MetadataRecord, MovieDoc, MovieQuery, MovieSearchProvider, NameField};
pub use resolver::{MetadataResolver, TitleResolver};
