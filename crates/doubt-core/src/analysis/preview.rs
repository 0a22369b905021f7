//! First-page text preview.

use crate::error::DecodeError;
use crate::models::config::{AnalysisConfig, MarkerPolicy};
use crate::models::result::Preview;
use crate::pdf::{DecodedDocument, check_page};

/// Build a preview from the text fragments of a page.
///
/// Fragments are joined with a single space and cut at `preview_chars`
/// Unicode code points.
pub fn extract_preview(fragments: &[String], config: &AnalysisConfig) -> Preview {
    let joined = fragments.join(" ");
    let mut chars = joined.chars();
    let text: String = chars.by_ref().take(config.preview_chars).collect();
    let truncated = chars.next().is_some();

    let marker = match config.marker_policy {
        MarkerPolicy::Always => config.truncation_marker.clone(),
        MarkerPolicy::WhenTruncated if truncated => config.truncation_marker.clone(),
        MarkerPolicy::WhenTruncated => String::new(),
    };

    Preview {
        text,
        truncated,
        marker,
    }
}

/// Preview the first page of a decoded document. Later pages are never read.
pub fn preview_document(
    document: &dyn DecodedDocument,
    config: &AnalysisConfig,
) -> Result<Preview, DecodeError> {
    check_page(1, document.page_count())?;
    let fragments = document.page_text(1)?;
    Ok(extract_preview(&fragments, config))
}
