//! Keyword ranking over the leading pages of a document.

use tracing::debug;

use crate::error::DecodeError;
use crate::models::config::AnalysisConfig;
use crate::models::result::FrequencyEntry;
use crate::pdf::DecodedDocument;
use crate::text::{FrequencyTable, keep_token, normalize, tokens};

/// Rank the keywords of a text.
pub fn rank_keywords(text: &str, config: &AnalysisConfig) -> Vec<FrequencyEntry> {
    let normalized = normalize(text);
    let table: FrequencyTable = tokens(&normalized)
        .filter(|token| keep_token(token, config.min_token_chars))
        .collect();
    table.top(config.keyword_limit)
}

/// Rank the keywords of pages `1..=min(page_count, keyword_pages)`.
pub fn extract_keywords(
    document: &dyn DecodedDocument,
    config: &AnalysisConfig,
) -> Result<Vec<FrequencyEntry>, DecodeError> {
    let last_page = document.page_count().min(config.keyword_pages);

    let mut text = String::new();
    for page in 1..=last_page {
        let fragments = document.page_text(page)?;
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&fragments.join(" "));
    }

    let keywords = rank_keywords(&text, config);
    debug!(
        "Ranked {} keywords from {} pages ({} chars)",
        keywords.len(),
        last_page,
        text.len()
    );
    Ok(keywords)
}
