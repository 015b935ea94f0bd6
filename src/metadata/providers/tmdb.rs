//! TMDB (The Movie Database) free-text search.
//!
//! Backs the informational `/moviebd_big_experimental` command. Unlike the
//! primary provider this is a ranked full-text search, and its results are
//! shown as-is rather than merged into a resolved answer.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::config::TmdbConfig;
use crate::error::{ProviderError, ProviderResult};

const PROVIDER: &str = "tmdb";

// ---------------------------------------------------------------------------
// TMDB API response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

/// One hit of `/search/movie`, in TMDB's ranking order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TmdbMovie {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub release_date: Option<String>,
    pub overview: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

/// TMDB v3 search client.
///
/// # Examples
///
/// ```no_run
/// use cinemabot::config::TmdbConfig;
/// use cinemabot::metadata::providers::TmdbProvider;
///
/// let provider = TmdbProvider::new(&TmdbConfig {
///     api_key: "your-api-key".into(),
///     ..TmdbConfig::default()
/// });
/// ```
pub struct TmdbProvider {
    client: reqwest::Client,
    base_url: String,
    site_url: String,
    api_key: String,
    language: Option<String>,
    timeout: Duration,
}

impl TmdbProvider {
    pub fn new(config: &TmdbConfig) -> Self {
        let timeout = config.timeout();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                reqwest::Client::new()
            });

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            site_url: config.site_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
            timeout,
        }
    }

    pub fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Public detail page of a movie on the TMDB website.
    pub fn movie_page_url(&self, id: Option<u64>) -> String {
        match id {
            Some(id) => format!("{}/movie/{id}", self.site_url),
            None => format!("{}/movie/N/A", self.site_url),
        }
    }

    /// Search movies by free text. One request, results in TMDB order.
    pub async fn search_movie(&self, query: &str) -> ProviderResult<Vec<TmdbMovie>> {
        if !self.is_available() {
            return Err(ProviderError::NotConfigured { provider: PROVIDER });
        }

        let mut params = vec![("api_key", self.api_key.as_str()), ("query", query)];
        if let Some(language) = self.language.as_deref() {
            params.push(("language", language));
        }

        let url = format!("{}/search/movie", self.base_url);
        debug!(url = %url, query = query, "TMDB search movie");

        let body: TmdbSearchResponse<TmdbMovie> = self
            .client
            .get(&url)
            .query(&params)
            .timeout(self.timeout)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, e))?
            .json()
            .await
            .map_err(|e| ProviderError::Parse {
                provider: PROVIDER,
                reason: e.to_string(),
            })?;

        Ok(body.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> TmdbProvider {
        TmdbProvider::new(&TmdbConfig {
            api_key: "tmdb-key".into(),
            base_url: server.uri(),
            site_url: "https://www.themoviedb.org/".into(),
            language: None,
            timeout_secs: 2,
        })
    }

    #[tokio::test]
    async fn returns_results_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .and(query_param("api_key", "tmdb-key"))
            .and(query_param("query", "spider man"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "results": [
                    { "id": 557, "title": "Spider-Man", "release_date": "2002-05-01", "overview": "Bitten." },
                    { "id": 558, "title": "Spider-Man 2", "release_date": "2004-06-25", "overview": "" }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let results = provider_for(&server).search_movie("spider man").await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, Some(557));
        assert_eq!(results[1].title.as_deref(), Some("Spider-Man 2"));
    }

    #[tokio::test]
    async fn passes_language_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .and(query_param("language", "ru-RU"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = TmdbProvider::new(&TmdbConfig {
            api_key: "tmdb-key".into(),
            base_url: server.uri(),
            language: Some("ru-RU".into()),
            ..TmdbConfig::default()
        });
        assert!(provider.search_movie("дюна").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn server_error_maps_to_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = provider_for(&server).search_movie("x").await.unwrap_err();
        assert_matches!(err, ProviderError::Status { status: 503, .. });
    }

    #[test]
    fn movie_page_url_construction() {
        let provider = TmdbProvider::new(&TmdbConfig {
            site_url: "https://www.themoviedb.org/".into(),
            ..TmdbConfig::default()
        });
        assert_eq!(
            provider.movie_page_url(Some(603)),
            "https://www.themoviedb.org/movie/603"
        );
        assert_eq!(
            provider.movie_page_url(None),
            "https://www.themoviedb.org/movie/N/A"
        );
    }

    #[test]
    fn provider_is_available() {
        let provider = TmdbProvider::new(&TmdbConfig::default());
        assert!(!provider.is_available());
    }
}
