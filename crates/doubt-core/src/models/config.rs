//! Configuration structures for the analysis pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Media type accepted at the input boundary.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Main configuration for the doubt pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DoubtConfig {
    /// Preview and keyword extraction configuration.
    pub analysis: AnalysisConfig,

    /// Document decoder configuration.
    pub decoder: DecoderConfig,

    /// Question answering configuration.
    pub answer: AnswerConfig,

    /// Media types accepted by `upload`.
    pub accepted_media_types: Vec<String>,
}

impl Default for DoubtConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            decoder: DecoderConfig::default(),
            answer: AnswerConfig::default(),
            accepted_media_types: vec![PDF_MEDIA_TYPE.to_string()],
        }
    }
}

/// When the preview truncation marker is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerPolicy {
    /// Always append the marker, even to short previews.
    Always,
    /// Append the marker only when text was actually cut.
    WhenTruncated,
}

/// Preview and keyword extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Maximum preview length in Unicode code points (marker excluded).
    pub preview_chars: usize,

    /// Marker appended to the preview text.
    pub truncation_marker: String,

    /// When to append the truncation marker.
    pub marker_policy: MarkerPolicy,

    /// Number of leading pages scanned for keywords.
    pub keyword_pages: u32,

    /// Maximum number of keywords returned.
    pub keyword_limit: usize,

    /// Minimum token length in characters; shorter tokens are dropped.
    pub min_token_chars: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            preview_chars: 500,
            truncation_marker: "...".to_string(),
            marker_policy: MarkerPolicy::Always,
            keyword_pages: 5,
            keyword_limit: 10,
            min_token_chars: 4,
        }
    }
}

/// Decoder backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecoderBackend {
    /// Per-page text extraction with lopdf.
    Lopdf,
    /// Whole-document text extraction with pdf-extract.
    PdfExtract,
}

/// Document decoder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Which decoder implementation to use.
    pub backend: DecoderBackend,

    /// Try to open encrypted documents with an empty user password.
    pub try_empty_password: bool,

    /// Fall back to whole-document extraction when a page cannot be read.
    pub text_fallback: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            backend: DecoderBackend::Lopdf,
            try_empty_password: true,
            text_fallback: true,
        }
    }
}

/// Question answering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerConfig {
    /// Template for the placeholder answer; `{question}` is substituted.
    pub template: String,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            template: "Here\u{2019}s a sample answer for: \"{question}\"".to_string(),
        }
    }
}

impl DoubtConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Check whether a media type is accepted for analysis.
    pub fn accepts(&self, media_type: &str) -> bool {
        let media_type = media_type.trim();
        self.accepted_media_types
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(media_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = DoubtConfig::default();
        assert_eq!(config.analysis.preview_chars, 500);
        assert_eq!(config.analysis.keyword_pages, 5);
        assert_eq!(config.analysis.keyword_limit, 10);
        assert_eq!(config.analysis.marker_policy, MarkerPolicy::Always);
        assert!(config.accepts("application/pdf"));
        assert!(config.accepts("Application/PDF"));
        assert!(!config.accepts("text/plain"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: DoubtConfig =
            serde_json::from_str(r#"{"analysis": {"marker_policy": "when_truncated"}}"#).unwrap();
        assert_eq!(config.analysis.marker_policy, MarkerPolicy::WhenTruncated);
        assert_eq!(config.analysis.preview_chars, 500);
        assert_eq!(config.decoder.backend, DecoderBackend::Lopdf);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = DoubtConfig::default();
        config.analysis.keyword_limit = 3;
        config.save(&path).unwrap();

        let loaded = DoubtConfig::from_file(&path).unwrap();
        assert_eq!(loaded.analysis.keyword_limit, 3);
        assert_eq!(loaded.answer.template, config.answer.template);
    }

    #[test]
    fn test_load_errors_keep_their_type() {
        let dir = tempfile::tempdir().unwrap();

        let missing = DoubtConfig::from_file(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(crate::error::DoubtError::Io(_))));

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            DoubtConfig::from_file(&path),
            Err(crate::error::DoubtError::Json(_))
        ));
    }
}
