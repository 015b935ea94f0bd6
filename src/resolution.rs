//! Resolution of a user's title into a single answer.
//!
//! The flow is a linear state machine:
//!
//! ```text
//! ResolveDirect ──found──────────────────────────────┐
//!      │ not found, native script                    │
//!      ▼                                             ▼
//! ProbeForCanonical ──candidate──► ResolveProbed ──► AttachWatchLink ──► Done(Answered)
//!      │ nothing                        │ not found
//!      ▼                                ▼
//! Done(NothingFound)              Done(NothingFound)
//! ```
//!
//! A non-native-script query that misses in `ResolveDirect` goes straight to
//! `Done(NothingFound)`. `AttachWatchLink` always probes again, on the
//! resolved name, whatever the fallback probe returned.

use std::fmt;
use std::sync::Arc;

use cinemabot_common::UserId;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::history::HistoryStore;
use crate::metadata::{MetadataRecord, TitleResolver};
use crate::normalize::{normalize, NormalizedQuery};
use crate::probe::WatchProber;

/// Shown in place of a watch URL when the catalogue has none.
pub const WATCH_LINK_NOT_FOUND: &str = "Не найдена";

/// Rendered for optional metadata fields the provider left empty.
const MISSING_FIELD: &str = "—";

/// Watch URL attached to an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchLink {
    Found(String),
    NotFound,
}

impl WatchLink {
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Found(url) => Some(url),
            Self::NotFound => None,
        }
    }
}

impl fmt::Display for WatchLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url().unwrap_or(WATCH_LINK_NOT_FOUND))
    }
}

/// How the metadata of an answer was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerSource {
    /// The normalized query resolved as typed.
    Direct,
    /// The query only resolved under the title the catalogue listed for it.
    ProbeFallback { matched_title: String },
}

/// The answer to one user message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedAnswer {
    pub query: NormalizedQuery,
    pub metadata: MetadataRecord,
    pub watch_link: WatchLink,
    pub source: AnswerSource,
}

impl ResolvedAnswer {
    /// Poster to send ahead of the text, if the provider had one.
    pub fn poster_url(&self) -> Option<&str> {
        self.metadata.poster_url.as_deref()
    }

    /// The text block delivered after the poster.
    pub fn text(&self) -> String {
        let m = &self.metadata;
        let year = m.year.map(|y| y.to_string());
        let rating = m.rating_imdb.map(|r| r.to_string());

        format!(
            "Name: {}\nDate: {}\nQuality: {}\nDescription: {}\n\nLink: {}\n",
            m.name,
            year.as_deref().unwrap_or(MISSING_FIELD),
            rating.as_deref().unwrap_or(MISSING_FIELD),
            m.description.as_deref().unwrap_or(MISSING_FIELD),
            self.watch_link,
        )
    }
}

/// Terminal outcome of a resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
    Answered(ResolvedAnswer),
    NothingFound,
}

impl Resolution {
    pub fn answer(&self) -> Option<&ResolvedAnswer> {
        match self {
            Self::Answered(answer) => Some(answer),
            Self::NothingFound => None,
        }
    }
}

/// Named states of the resolution flow.
#[derive(Debug)]
enum Step {
    ResolveDirect,
    ProbeForCanonical,
    ResolveProbed(String),
    AttachWatchLink {
        metadata: MetadataRecord,
        source: AnswerSource,
    },
    Done(Resolution),
}

/// Composes the resolver and the prober into answers.
pub struct Orchestrator {
    resolver: Arc<dyn TitleResolver>,
    prober: Arc<dyn WatchProber>,
    history: Arc<dyn HistoryStore>,
}

impl Orchestrator {
    pub fn new(
        resolver: Arc<dyn TitleResolver>,
        prober: Arc<dyn WatchProber>,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        Self {
            resolver,
            prober,
            history,
        }
    }

    /// Run the state machine for an already-normalized query. No side effects.
    pub async fn resolve(&self, query: &NormalizedQuery) -> Resolution {
        let mut step = Step::ResolveDirect;
        loop {
            debug!(query = %query.canonical_text, step = ?step, "Resolution step");
            step = match step {
                Step::ResolveDirect => {
                    match self
                        .resolver
                        .resolve(&query.canonical_text, query.is_native_script)
                        .await
                    {
                        Some(metadata) => Step::AttachWatchLink {
                            metadata,
                            source: AnswerSource::Direct,
                        },
                        None if query.is_native_script => Step::ProbeForCanonical,
                        None => Step::Done(Resolution::NothingFound),
                    }
                }
                Step::ProbeForCanonical => match self.prober.probe(&query.canonical_text).await {
                    Some(candidate) => Step::ResolveProbed(candidate.matched_title),
                    None => Step::Done(Resolution::NothingFound),
                },
                Step::ResolveProbed(matched_title) => {
                    // Catalogue titles are native script.
                    match self.resolver.resolve(&matched_title, true).await {
                        Some(metadata) => Step::AttachWatchLink {
                            metadata,
                            source: AnswerSource::ProbeFallback { matched_title },
                        },
                        None => Step::Done(Resolution::NothingFound),
                    }
                }
                Step::AttachWatchLink { metadata, source } => {
                    let watch_link = match self.prober.probe(&metadata.name).await {
                        Some(candidate) => WatchLink::Found(candidate.watch_url),
                        None => WatchLink::NotFound,
                    };
                    Step::Done(Resolution::Answered(ResolvedAnswer {
                        query: query.clone(),
                        metadata,
                        watch_link,
                        source,
                    }))
                }
                Step::Done(resolution) => return resolution,
            };
        }
    }

    /// Normalize `raw`, resolve it, and record the normalized text in the
    /// history of `user_id` when an answer was found.
    ///
    /// A failed history write is logged; the answer is still returned.
    pub async fn resolve_and_answer(&self, raw: &str, user_id: UserId) -> Resolution {
        let query = normalize(raw);
        let resolution = self.resolve(&query).await;

        match &resolution {
            Resolution::Answered(answer) => {
                info!(
                    user_id = %user_id,
                    query = %query.canonical_text,
                    name = %answer.metadata.name,
                    source = ?answer.source,
                    watch_link = answer.watch_link.url().is_some(),
                    "Title resolved"
                );
                if let Err(e) = self
                    .history
                    .record_search(user_id, &query.canonical_text)
                    .await
                {
                    warn!(user_id = %user_id, error = %e, "Failed to record search history");
                }
            }
            Resolution::NothingFound => {
                info!(user_id = %user_id, query = %query.canonical_text, "Nothing found");
            }
        }

        resolution
    }
}
