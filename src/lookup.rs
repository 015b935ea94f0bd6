//! Free-text movie lookup behind `/moviebd_big_experimental`.
//!
//! Independent of the resolution pipeline: one TMDB search, every hit
//! formatted as a fixed-shape summary, nothing recorded in history.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{InputError, ProviderError};
use crate::metadata::providers::{TmdbMovie, TmdbProvider};

/// Command whose argument feeds the lookup.
pub const LOOKUP_COMMAND: &str = "moviebd_big_experimental";

pub const NO_RESULTS: &str = "No results found.";

/// A validated, non-empty lookup query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupQuery(String);

impl LookupQuery {
    /// Collapse whitespace in a command argument. Blank input is rejected
    /// before anything reaches the network.
    pub fn parse(arg: &str) -> Result<Self, InputError> {
        let text = arg.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            return Err(InputError::MissingArgument {
                command: LOOKUP_COMMAND,
            });
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// What a lookup produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Formatted summaries in provider ranking order.
    Results(Vec<String>),
    NoResults,
    /// The provider could not be queried; carries the reason.
    Failed(String),
}

impl LookupOutcome {
    /// Texts to deliver, one message each.
    pub fn into_messages(self) -> Vec<String> {
        match self {
            Self::Results(summaries) => summaries,
            Self::NoResults => vec![NO_RESULTS.to_string()],
            Self::Failed(reason) => vec![format!("Error: {reason}")],
        }
    }
}

#[async_trait]
pub trait MovieLookup: Send + Sync {
    async fn search_by_free_text(&self, query: &LookupQuery) -> LookupOutcome;
}

/// [`MovieLookup`] over TMDB's `/search/movie`.
pub struct TmdbLookup {
    provider: Arc<TmdbProvider>,
}

impl TmdbLookup {
    pub fn new(provider: Arc<TmdbProvider>) -> Self {
        Self { provider }
    }

    fn format_summary(&self, movie: &TmdbMovie) -> String {
        format_summary(movie, &self.provider.movie_page_url(movie.id))
    }
}

#[async_trait]
impl MovieLookup for TmdbLookup {
    async fn search_by_free_text(&self, query: &LookupQuery) -> LookupOutcome {
        let movies = match self.provider.search_movie(query.as_str()).await {
            Ok(movies) => movies,
            Err(e) => {
                warn!(
                    provider = e.provider(),
                    query = query.as_str(),
                    error = %e,
                    "Free-text lookup failed"
                );
                return LookupOutcome::Failed(failure_reason(&e));
            }
        };

        debug!(query = query.as_str(), hits = movies.len(), "Free-text lookup finished");
        if movies.is_empty() {
            return LookupOutcome::NoResults;
        }
        LookupOutcome::Results(movies.iter().map(|m| self.format_summary(m)).collect())
    }
}

fn failure_reason(err: &ProviderError) -> String {
    match err {
        ProviderError::NotConfigured { .. } => "lookup is not configured".to_string(),
        other => other.to_string(),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Render one hit as the multi-line summary shown to users.
pub fn format_summary(movie: &TmdbMovie, link: &str) -> String {
    let title = non_blank(movie.title.as_deref()).unwrap_or("N/A");
    let release_date = non_blank(movie.release_date.as_deref()).unwrap_or("N/A");
    let overview = non_blank(movie.overview.as_deref()).unwrap_or("No overview available.");

    format!("Title: {title}\nRelease Date: {release_date}\nOverview: {overview}\nLink: {link}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TmdbConfig;
    use assert_matches::assert_matches;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn lookup_for(server: &MockServer) -> TmdbLookup {
        TmdbLookup::new(Arc::new(TmdbProvider::new(&TmdbConfig {
            api_key: "tmdb-key".into(),
            base_url: server.uri(),
            site_url: "https://www.themoviedb.org".into(),
            language: None,
            timeout_secs: 2,
        })))
    }

    #[test]
    fn blank_argument_is_rejected() {
        assert_matches!(
            LookupQuery::parse("   \t "),
            Err(InputError::MissingArgument { command: LOOKUP_COMMAND })
        );
        assert!(LookupQuery::parse("").is_err());
    }

    #[test]
    fn argument_whitespace_is_collapsed() {
        let query = LookupQuery::parse("  spider   man ").unwrap();
        assert_eq!(query.as_str(), "spider man");
    }

    #[test]
    fn summary_uses_fallbacks() {
        let movie = TmdbMovie {
            id: None,
            title: None,
            release_date: Some(String::new()),
            overview: None,
        };
        assert_eq!(
            format_summary(&movie, "https://www.themoviedb.org/movie/N/A"),
            "Title: N/A\nRelease Date: N/A\nOverview: No overview available.\nLink: https://www.themoviedb.org/movie/N/A\n"
        );
    }

    #[test]
    fn outcome_messages() {
        assert_eq!(LookupOutcome::NoResults.into_messages(), vec!["No results found."]);
        assert_eq!(
            LookupOutcome::Failed("tmdb returned HTTP 500".into()).into_messages(),
            vec!["Error: tmdb returned HTTP 500"]
        );
    }

    #[tokio::test]
    async fn results_keep_provider_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .and(query_param("query", "spider man"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    { "id": 557, "title": "Spider-Man", "release_date": "2002-05-01", "overview": "Bitten." },
                    { "id": 558, "title": "Spider-Man 2", "release_date": "2004-06-25", "overview": "" }
                ]
            })))
            .mount(&server)
            .await;

        let query = LookupQuery::parse("spider man").unwrap();
        let outcome = lookup_for(&server).search_by_free_text(&query).await;
        let LookupOutcome::Results(summaries) = outcome else {
            panic!("expected results, got {outcome:?}");
        };
        assert_eq!(summaries.len(), 2);
        assert_eq!(
            summaries[0],
            "Title: Spider-Man\nRelease Date: 2002-05-01\nOverview: Bitten.\nLink: https://www.themoviedb.org/movie/557\n"
        );
        assert!(summaries[1].contains("Overview: No overview available.\n"));
    }

    #[tokio::test]
    async fn empty_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .mount(&server)
            .await;

        let query = LookupQuery::parse("xyzzyqqq123").unwrap();
        assert_eq!(
            lookup_for(&server).search_by_free_text(&query).await,
            LookupOutcome::NoResults
        );
    }

    #[tokio::test]
    async fn provider_failure_becomes_error_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let query = LookupQuery::parse("dune").unwrap();
        let outcome = lookup_for(&server).search_by_free_text(&query).await;
        assert_eq!(outcome, LookupOutcome::Failed("tmdb returned HTTP 500".into()));
    }
}
