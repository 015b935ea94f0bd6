//! Title normalization for raw chat input.
//!
//! Users type titles with stray punctuation, emoji-adjacent symbols and
//! random casing. [`normalize`] turns that into the canonical query string
//! sent to providers and decides which name field the primary provider
//! should be searched by.

use serde::Serialize;

/// Characters removed from user input before any lookup.
pub const DISALLOWED_CHARS: &str = "!@#$%^&*()_-§+=|\":/?><~`][,{}№;";

/// Canonical form of a user query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedQuery {
    /// Punctuation-stripped, trimmed, leading-capital text.
    pub canonical_text: String,
    /// Whether `canonical_text` contains a Cyrillic letter.
    pub is_native_script: bool,
}

/// Normalize raw input into a [`NormalizedQuery`].
///
/// Removes every character of [`DISALLOWED_CHARS`], trims surrounding
/// whitespace, then upper-cases the first character and lower-cases the rest.
/// Total and idempotent: normalizing `canonical_text` again yields the same
/// text. Fully stripped input produces an empty `canonical_text`.
pub fn normalize(raw: &str) -> NormalizedQuery {
    let stripped: String = raw.chars().filter(|c| !is_disallowed(*c)).collect();
    let canonical_text = capitalize(stripped.trim());
    let is_native_script = is_native_script(&canonical_text);

    NormalizedQuery {
        canonical_text,
        is_native_script,
    }
}

/// True when `text` contains at least one Cyrillic letter (`а`-`я`, `ё`, any
/// case).
pub fn is_native_script(text: &str) -> bool {
    text.chars().any(is_cyrillic_letter)
}

fn is_disallowed(c: char) -> bool {
    DISALLOWED_CHARS.contains(c)
}

fn is_cyrillic_letter(c: char) -> bool {
    matches!(c, 'а'..='я' | 'А'..='Я' | 'ё' | 'Ё')
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut out = String::with_capacity(text.len());
    let mut upper = first.to_uppercase();
    // Multi-char upper-case forms (e.g. `ß` -> `SS`) would not survive a
    // second pass, so those characters are kept as typed.
    match (upper.next(), upper.next()) {
        (Some(single), None) => out.push(single),
        _ => out.push(first),
    }
    out.extend(chars.flat_map(char::to_lowercase));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_cyrillic_input() {
        let query = normalize("матрица");
        assert_eq!(query.canonical_text, "Матрица");
        assert!(query.is_native_script);
    }

    #[test]
    fn latin_input_is_not_native() {
        let query = normalize("Matrix");
        assert_eq!(query.canonical_text, "Matrix");
        assert!(!query.is_native_script);
    }

    #[test]
    fn strips_disallowed_punctuation() {
        let query = normalize("Матрица!!! (2021)");
        assert!(!query.canonical_text.chars().any(|c| DISALLOWED_CHARS.contains(c)));
        assert_eq!(query.canonical_text, "Матрица 2021");
    }

    #[test]
    fn lowercases_tail_like_a_sentence() {
        assert_eq!(normalize("  the MATRIX ").canonical_text, "The matrix");
    }

    #[test]
    fn capital_applies_after_stripping() {
        assert_eq!(normalize("(матрица").canonical_text, "Матрица");
        // Guillemets are not in the disallowed set and stay in front.
        assert_eq!(normalize("«(матрица)»").canonical_text, "«матрица»");
    }

    #[test]
    fn fully_stripped_input_is_empty() {
        let query = normalize("!!! ??? ;;;");
        assert_eq!(query.canonical_text, "");
        assert!(!query.is_native_script);
        assert_eq!(normalize("").canonical_text, "");
    }

    #[test]
    fn yo_counts_as_native_script() {
        assert!(is_native_script("ёж"));
        assert!(is_native_script("Ёлки"));
        assert!(!is_native_script("Ölki"));
    }

    #[test]
    fn mixed_script_is_native() {
        assert!(normalize("Matrix матрица").is_native_script);
    }

    #[test]
    fn emoji_survive_and_are_not_native() {
        let query = normalize("🍿 popcorn");
        assert_eq!(query.canonical_text, "🍿 popcorn");
        assert!(!query.is_native_script);
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs = [
            "матрица",
            "Матрица!!! (2021)",
            "  the MATRIX ",
            "ßtraße",
            "(матрица",
            "__--__",
            "İstanbul",
            "№5 {Ёлки}",
            "🍿 popcorn",
        ];
        for raw in inputs {
            let once = normalize(raw);
            let twice = normalize(&once.canonical_text);
            assert_eq!(once, twice, "normalize is not idempotent for {raw:?}");
        }
    }

    #[test]
    fn script_flag_is_function_of_canonical_text() {
        let query = normalize("  Дюна: часть вторая ");
        assert_eq!(query.is_native_script, is_native_script(&query.canonical_text));
    }
}
