//! Concrete metadata provider implementations.

pub mod kinopoisk;
pub mod tmdb;

pub use kinopoisk::KinopoiskProvider;
pub use tmdb::{TmdbMovie, TmdbProvider};
