//! kinopoisk.dev metadata provider.
//!
//! Implements [`MovieSearchProvider`] against the kinopoisk.dev REST API.
//!
//! Features:
//! - Exact-name search by `name` or `alternativeName`, paginated.
//! - Token-bucket rate limiting via [`governor`].
//! - Per-request timeout; no retries.

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde::Deserialize;
use tracing::debug;

use crate::config::KinopoiskConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::metadata::provider::{MovieDoc, MovieQuery, MovieSearchProvider};

const PROVIDER: &str = "kinopoisk";
const MOVIE_SEARCH_PATH: &str = "/v1.4/movie";

// ---------------------------------------------------------------------------
// API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct KinopoiskPage {
    #[serde(default)]
    docs: Vec<KinopoiskMovie>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KinopoiskMovie {
    name: Option<String>,
    year: Option<u16>,
    rating: Option<KinopoiskRating>,
    short_description: Option<String>,
    poster: Option<KinopoiskPoster>,
}

#[derive(Debug, Deserialize)]
struct KinopoiskRating {
    imdb: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct KinopoiskPoster {
    url: Option<String>,
}

impl From<KinopoiskMovie> for MovieDoc {
    fn from(movie: KinopoiskMovie) -> Self {
        Self {
            name: movie.name,
            year: movie.year,
            rating_imdb: movie.rating.and_then(|r| r.imdb),
            short_description: movie.short_description,
            poster_url: movie.poster.and_then(|p| p.url),
        }
    }
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

/// kinopoisk.dev provider.
///
/// # Examples
///
/// ```no_run
/// use cinemabot::config::KinopoiskConfig;
/// use cinemabot::metadata::providers::KinopoiskProvider;
///
/// let provider = KinopoiskProvider::new(&KinopoiskConfig {
///     api_key: "your-api-key".into(),
///     ..KinopoiskConfig::default()
/// });
/// ```
pub struct KinopoiskProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
    rate_limiter: DefaultDirectRateLimiter,
}

impl KinopoiskProvider {
    pub fn new(config: &KinopoiskConfig) -> Self {
        let timeout = config.timeout();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                reqwest::Client::new()
            });

        let per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout,
            rate_limiter: RateLimiter::direct(Quota::per_second(per_second)),
        }
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url, MOVIE_SEARCH_PATH)
    }
}

#[async_trait]
impl MovieSearchProvider for KinopoiskProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn search(&self, query: &MovieQuery) -> ProviderResult<Vec<MovieDoc>> {
        if !self.is_available() {
            return Err(ProviderError::NotConfigured { provider: PROVIDER });
        }

        self.rate_limiter.until_ready().await;

        let params = [
            ("page", query.page.to_string()),
            ("limit", query.limit.to_string()),
            (query.field.as_param(), query.value.clone()),
        ];
        debug!(field = query.field.as_param(), value = %query.value, "Kinopoisk movie search");

        let body: KinopoiskPage = self
            .client
            .get(self.url())
            .header("X-API-KEY", &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
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

        Ok(body.docs.into_iter().map(MovieDoc::from).collect())
    }
}
