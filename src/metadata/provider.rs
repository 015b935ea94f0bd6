//! Trait definition and types for the primary metadata provider.
//!
//! The primary provider is searched by exact name, either the native
//! (Russian) name or the alternative/transliterated one. It returns raw
//! [`MovieDoc`]s with every field optional; [`MetadataRecord`] is the
//! validated form handed to the rest of the bot.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderResult;

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Which name field of the provider a query searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameField {
    /// Native-script name (`name`).
    Name,
    /// Alternative / transliterated name (`alternativeName`).
    AlternativeName,
}

impl NameField {
    /// Field to search for a query with the given script flag.
    pub fn for_script(is_native_script: bool) -> Self {
        if is_native_script {
            Self::Name
        } else {
            Self::AlternativeName
        }
    }

    /// Query-string parameter name used by the provider.
    pub fn as_param(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::AlternativeName => "alternativeName",
        }
    }
}

/// A paginated exact-name search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieQuery {
    pub field: NameField,
    pub value: String,
    pub page: u32,
    pub limit: u32,
}

impl MovieQuery {
    /// First page, single result: the provider's best match for `title`.
    pub fn best_match(title: &str, field: NameField) -> Self {
        Self {
            field,
            value: title.to_string(),
            page: 1,
            limit: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A movie as returned by the provider, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieDoc {
    pub name: Option<String>,
    pub year: Option<u16>,
    pub rating_imdb: Option<f64>,
    pub short_description: Option<String>,
    pub poster_url: Option<String>,
}

/// Validated metadata for a single movie or show.
///
/// Only `name` is required; the remaining fields are optional and shown as a
/// dash in the answer when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub name: String,
    pub year: Option<u16>,
    pub rating_imdb: Option<f64>,
    pub description: Option<String>,
    pub poster_url: Option<String>,
}

impl MetadataRecord {
    /// Validate a provider document. Returns `None` when the name is missing
    /// or blank, since nothing can be shown or probed without it.
    pub fn from_doc(doc: MovieDoc) -> Option<Self> {
        let name = non_blank(doc.name)?;
        Some(Self {
            name,
            year: doc.year,
            rating_imdb: doc.rating_imdb,
            description: non_blank(doc.short_description),
            poster_url: non_blank(doc.poster_url),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Async trait implemented by the primary structured metadata provider.
///
/// Implementations issue exactly one request per call and report failure
/// through [`ProviderError`](crate::error::ProviderError); they never retry.
#[async_trait]
pub trait MovieSearchProvider: Send + Sync {
    /// Short, lowercase identifier for this provider (e.g. `"kinopoisk"`).
    fn name(&self) -> &'static str;

    /// Returns `true` when the provider has credentials configured.
    fn is_available(&self) -> bool;

    /// Run `query` and return the matching documents in provider order.
    async fn search(&self, query: &MovieQuery) -> ProviderResult<Vec<MovieDoc>>;
}
