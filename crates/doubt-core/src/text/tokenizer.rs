//! Word tokenizer for keyword extraction.
//!
//! Normalization is deliberately ASCII-only: text is lower-cased and every
//! character that is not `a-z` or whitespace is removed, so digits,
//! punctuation and non-ASCII letters disappear (`don't` becomes `dont`).

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^a-z\s]").unwrap();
}

/// Lower-case the text and strip everything except `a-z` and whitespace.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    NON_WORD.replace_all(&lowered, "").into_owned()
}

/// Lazily split normalized text on runs of whitespace.
pub fn tokens(normalized: &str) -> impl Iterator<Item = &str> + '_ {
    normalized.split_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_strips_punctuation_and_digits() {
        assert_eq!(normalize("Hello, World! 2024"), "hello world ");
        assert_eq!(normalize("don't stop"), "dont stop");
    }

    #[test]
    fn test_normalize_drops_non_ascii_letters() {
        assert_eq!(normalize("Café Zürich"), "caf zrich");
        assert_eq!(normalize("日本語 text"), " text");
    }

    #[test]
    fn test_tokens_split_on_whitespace_runs() {
        let normalized = normalize("  alpha\tbeta\n\n gamma  ");
        let collected: Vec<&str> = tokens(&normalized).collect();
        assert_eq!(collected, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_tokens_empty() {
        assert_eq!(tokens(&normalize("")).count(), 0);
        assert_eq!(tokens(&normalize("123 ... !!!")).count(), 0);
    }
}
