//! Best-effort existence probing against a watch-link catalogue.
//!
//! A probe answers "does the catalogue list this exact title, and where can
//! it be watched?". It is enrichment only: every failure degrades to `None`.
//! The markup-specific parsing lives behind [`WatchProber`] so it can be
//! replaced without touching the resolution flow.

mod coocha;

pub use coocha::CoochaProber;

use async_trait::async_trait;
use serde::Serialize;

/// A catalogue entry whose title matched the probed title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchCandidate {
    /// Title as listed by the catalogue (not folded).
    pub matched_title: String,
    /// Direct link to the catalogue page.
    pub watch_url: String,
}

/// Looks a title up in a watch-link source.
#[async_trait]
pub trait WatchProber: Send + Sync {
    /// Single attempt; `None` on no match or on any failure.
    async fn probe(&self, title: &str) -> Option<WatchCandidate>;
}

/// Fold a title for catalogue matching: trim, lower-case, and treat `ё` as
/// `е`. Two titles match when their folded forms are equal.
pub fn fold_title(title: &str) -> String {
    title
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == 'ё' { 'е' } else { c })
        .collect()
}

/// Whether a catalogue title is the probed title.
pub fn titles_match(probed: &str, listed: &str) -> bool {
    fold_title(probed) == fold_title(listed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folding_ignores_case_and_yo() {
        assert_eq!(fold_title("  Ёлки "), "елки");
        assert!(titles_match("Ёлки", "елки"));
        assert!(titles_match("МАТРИЦА", "матрица"));
    }

    #[test]
    fn matching_is_exact_not_fuzzy() {
        assert!(!titles_match("Матрица", "Матрица: Перезагрузка"));
        assert!(!titles_match("Alien", "Aliens"));
    }
}
