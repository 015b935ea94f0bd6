//! Title resolution against the primary metadata provider.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::provider::{MetadataRecord, MovieQuery, MovieSearchProvider, NameField};

/// Resolves a canonical title to metadata, or `None` for "not found".
///
/// Implementations swallow every provider failure: callers only ever see a
/// record or `None`.
#[async_trait]
pub trait TitleResolver: Send + Sync {
    async fn resolve(&self, title: &str, is_native_script: bool) -> Option<MetadataRecord>;
}

/// [`TitleResolver`] backed by a [`MovieSearchProvider`].
///
/// Searches the native-name field for native-script titles and the
/// alternative-name field otherwise, asking for a single best match.
pub struct MetadataResolver {
    provider: Arc<dyn MovieSearchProvider>,
}

impl MetadataResolver {
    pub fn new(provider: Arc<dyn MovieSearchProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl TitleResolver for MetadataResolver {
    async fn resolve(&self, title: &str, is_native_script: bool) -> Option<MetadataRecord> {
        let query = MovieQuery::best_match(title, NameField::for_script(is_native_script));

        let docs = match self.provider.search(&query).await {
            Ok(docs) => docs,
            Err(e) => {
                warn!(
                    provider = self.provider.name(),
                    title = title,
                    error = %e,
                    "Metadata lookup failed"
                );
                return None;
            }
        };

        let Some(doc) = docs.into_iter().next() else {
            debug!(title = title, field = query.field.as_param(), "No metadata match");
            return None;
        };

        let record = MetadataRecord::from_doc(doc);
        if record.is_none() {
            warn!(
                provider = self.provider.name(),
                title = title,
                "Metadata match has no name; treating as not found"
            );
        }
        record
    }
}
