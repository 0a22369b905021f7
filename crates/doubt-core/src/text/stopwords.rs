//! Noise-word filtering for keyword ranking.

use std::collections::HashSet;

use lazy_static::lazy_static;

lazy_static! {
    /// Words excluded from keyword ranking regardless of frequency.
    pub static ref STOPWORDS: HashSet<&'static str> = [
        "this", "that", "with", "from", "have", "there", "which", "will", "their", "about",
        "were", "when", "your", "them", "they", "been", "also", "into", "because", "these",
        "some",
    ]
    .into_iter()
    .collect();
}

/// Whether a normalized token is a stopword.
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Whether a normalized token should be counted.
///
/// Tokens shorter than `min_chars` and stopwords are dropped.
pub fn keep_token(token: &str, min_chars: usize) -> bool {
    token.chars().count() >= min_chars && !is_stopword(token)
}
