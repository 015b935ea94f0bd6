//! Watch-link probing against the coocha catalogue search page.
//!
//! The catalogue renders search hits as
//!
//! ```html
//! <a class="new-short__title--link" href="https://watch.coocha.co/film/1">
//!   <h3 class="new-short__title hover-op">Матрица</h3>
//! </a>
//! ```
//!
//! Each `h3` title is paired with the nearest `a.new-short__title--link` that
//! precedes it in document order (an enclosing anchor counts, since it opens
//! before the heading).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use super::{titles_match, WatchCandidate, WatchProber};
use crate::config::WatchConfig;
use crate::error::{ProviderError, ProviderResult};

const PROVIDER: &str = "coocha";
const LISTING_SELECTOR: &str = "a.new-short__title--link, h3.new-short__title.hover-op";

/// A single search hit as listed on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ListingEntry {
    title: String,
    link: Option<String>,
}

/// [`WatchProber`] that scrapes the catalogue's HTML search page.
pub struct CoochaProber {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl CoochaProber {
    pub fn new(config: &WatchConfig) -> Self {
        let timeout = config.timeout();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cinemabot/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                reqwest::Client::new()
            });

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    fn search_url(&self, title: &str) -> String {
        format!("{}/search/{}", self.base_url, encode_search_term(title))
    }

    async fn fetch_listing(&self, title: &str) -> ProviderResult<Vec<ListingEntry>> {
        let url = self.search_url(title);
        debug!(url = %url, "Probing watch catalogue");

        let html = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, e))?
            .text()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, e))?;

        parse_listing(&html, &self.base_url)
    }
}

#[async_trait]
impl WatchProber for CoochaProber {
    async fn probe(&self, title: &str) -> Option<WatchCandidate> {
        let entries = match self.fetch_listing(title).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(provider = e.provider(), title = title, error = %e, "Watch probe failed");
                return None;
            }
        };

        let candidate = find_candidate(&entries, title);
        debug!(
            title = title,
            listed = entries.len(),
            matched = candidate.is_some(),
            "Watch probe finished"
        );
        candidate
    }
}

/// Collect every listed title with the link that precedes it.
fn parse_listing(html: &str, base_url: &str) -> ProviderResult<Vec<ListingEntry>> {
    let selector = Selector::parse(LISTING_SELECTOR).map_err(|e| ProviderError::Parse {
        provider: PROVIDER,
        reason: e.to_string(),
    })?;
    let base = Url::parse(base_url).ok();
    let document = Html::parse_document(html);

    let mut last_link: Option<String> = None;
    let mut entries = Vec::new();
    for element in document.select(&selector) {
        if element.value().name() == "a" {
            last_link = element
                .value()
                .attr("href")
                .map(|href| absolutize(base.as_ref(), href.trim()));
        } else {
            entries.push(ListingEntry {
                title: element.text().collect::<String>().trim().to_string(),
                link: last_link.clone(),
            });
        }
    }

    Ok(entries)
}

/// First entry whose folded title equals the probed one. A match without a
/// link ends the search with no candidate.
fn find_candidate(entries: &[ListingEntry], title: &str) -> Option<WatchCandidate> {
    let entry = entries.iter().find(|e| titles_match(title, &e.title))?;
    let Some(link) = entry.link.clone() else {
        warn!(title = %entry.title, "Matched catalogue entry has no link");
        return None;
    };

    Some(WatchCandidate {
        matched_title: entry.title.clone(),
        watch_url: link,
    })
}

fn absolutize(base: Option<&Url>, href: &str) -> String {
    base.and_then(|b| b.join(href).ok())
        .map(String::from)
        .unwrap_or_else(|| href.to_string())
}

/// Percent-encode a search term for the path, joining words with `+`.
fn encode_search_term(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            b' ' => out.push('+'),
            _ => {
                out.push('%');
                out.push(char::from(HEX[(b >> 4) as usize]));
                out.push(char::from(HEX[(b & 0x0f) as usize]));
            }
        }
    }
    out
}

const HEX: [u8; 16] = *b"0123456789ABCDEF";
