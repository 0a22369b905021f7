//! Per-page PDF text decoding using lopdf.

use std::collections::BTreeMap;
use std::sync::Arc;
#[cfg(feature = "native")]
use std::sync::OnceLock;

use lopdf::{Document, ObjectId};
use tracing::{debug, trace};
#[cfg(feature = "native")]
use tracing::warn;

use super::{DecodedDocument, DocumentDecoder, Result, check_page};
use crate::error::DecodeError;
use crate::models::config::DecoderConfig;

/// PDF decoder backed by lopdf.
///
/// Decoding parses the object structure only; page text is extracted on demand.
pub struct LopdfDecoder {
    try_empty_password: bool,
    #[cfg_attr(not(feature = "native"), allow(dead_code))]
    text_fallback: bool,
}

impl LopdfDecoder {
    /// Create a new decoder with default settings.
    pub fn new() -> Self {
        Self {
            try_empty_password: true,
            text_fallback: true,
        }
    }

    /// Create a decoder from configuration.
    pub fn from_config(config: &DecoderConfig) -> Self {
        Self {
            try_empty_password: config.try_empty_password,
            text_fallback: config.text_fallback,
        }
    }

    /// Set whether encrypted documents are opened with an empty password.
    pub fn with_empty_password(mut self, enabled: bool) -> Self {
        self.try_empty_password = enabled;
        self
    }

    /// Set whether unreadable pages fall back to whole-document extraction.
    pub fn with_text_fallback(mut self, enabled: bool) -> Self {
        self.text_fallback = enabled;
        self
    }
}

impl Default for LopdfDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LopdfDecoder {
    /// Bytes kept for whole-document extraction, if the fallback is enabled.
    #[cfg(feature = "native")]
    fn fallback_bytes(
        &self,
        doc: &mut Document,
        data: &[u8],
        encrypted: bool,
    ) -> Result<Option<Vec<u8>>> {
        if !self.text_fallback {
            return Ok(None);
        }
        if !encrypted {
            return Ok(Some(data.to_vec()));
        }

        // The fallback extractor reads bytes, so keep a decrypted copy
        let mut decrypted = Vec::new();
        doc.save_to(&mut decrypted)
            .map_err(|e| DecodeError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
        Ok(Some(decrypted))
    }

    fn load(&self, data: &[u8]) -> Result<LopdfDocument> {
        let mut doc = Document::load_mem(data).map_err(|e| DecodeError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        let encrypted = doc.is_encrypted();
        if encrypted {
            if !self.try_empty_password || doc.decrypt("").is_err() {
                return Err(DecodeError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");
        }

        let pages = doc.get_pages();
        debug!("Decoded PDF with {} pages", pages.len());

        #[cfg(feature = "native")]
        let fallback_data = self.fallback_bytes(&mut doc, data, encrypted)?;

        Ok(LopdfDocument {
            document: doc,
            pages,
            #[cfg(feature = "native")]
            fallback_data,
            #[cfg(feature = "native")]
            fallback_pages: OnceLock::new(),
        })
    }
}

impl DocumentDecoder for LopdfDecoder {
    fn decode(&self, data: &[u8]) -> Result<Arc<dyn DecodedDocument>> {
        Ok(Arc::new(self.load(data)?))
    }
}

/// A PDF decoded by [`LopdfDecoder`].
pub struct LopdfDocument {
    document: Document,
    pages: BTreeMap<u32, ObjectId>,
    #[cfg(feature = "native")]
    fallback_data: Option<Vec<u8>>,
    #[cfg(feature = "native")]
    fallback_pages: OnceLock<std::result::Result<Vec<Vec<String>>, DecodeError>>,
}

impl LopdfDocument {
    /// Split extracted page text into non-empty fragments.
    fn fragments(text: &str) -> Vec<String> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    #[cfg(feature = "native")]
    fn fallback_page_text(&self, page: u32, cause: lopdf::Error) -> Result<Vec<String>> {
        let Some(data) = self.fallback_data.as_deref() else {
            return Err(DecodeError::TextExtraction(cause.to_string()));
        };

        warn!("lopdf could not read page {}: {}; using whole-document text", page, cause);
        let pages = self.fallback_pages.get_or_init(|| {
            let text = super::fallback::extract_whole_text(data)?;
            Ok(super::fallback::apportion_lines(&text, self.page_count()))
        });

        match pages {
            Ok(pages) => Ok(pages
                .get((page - 1) as usize)
                .cloned()
                .unwrap_or_default()),
            Err(e) => Err(e.clone()),
        }
    }

    #[cfg(not(feature = "native"))]
    fn fallback_page_text(&self, _page: u32, cause: lopdf::Error) -> Result<Vec<String>> {
        Err(DecodeError::TextExtraction(cause.to_string()))
    }
}

impl DecodedDocument for LopdfDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_text(&self, page: u32) -> Result<Vec<String>> {
        check_page(page, self.page_count())?;

        match self.document.extract_text(&[page]) {
            Ok(text) => {
                let fragments = Self::fragments(&text);
                trace!("Page {}: {} fragments", page, fragments.len());
                Ok(fragments)
            }
            Err(e) => self.fallback_page_text(page, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::test_support::build_pdf;

    #[test]
    fn test_decode_page_count() {
        let data = build_pdf(&[&["one"], &["two"], &["three"]]);
        let doc = LopdfDecoder::new().decode(&data).unwrap();
        assert_eq!(doc.page_count(), 3);
    }

    #[test]
    fn test_decode_empty_document() {
        let data = build_pdf(&[]);
        let doc = LopdfDecoder::new().decode(&data).unwrap();
        assert_eq!(doc.page_count(), 0);
        assert!(matches!(
            doc.page_text(1),
            Err(DecodeError::PageOutOfRange { page: 1, count: 0 })
        ));
    }

    #[test]
    fn test_page_text_fragments() {
        let data = build_pdf(&[&["Hello World", "Second line"], &["Other page"]]);
        let doc = LopdfDecoder::new().decode(&data).unwrap();

        let first = doc.page_text(1).unwrap().join(" ");
        assert!(first.contains("Hello World"));
        assert!(first.contains("Second line"));
        assert!(!first.contains("Other page"));

        let second = doc.page_text(2).unwrap().join(" ");
        assert!(second.contains("Other page"));
    }

    #[test]
    fn test_page_out_of_range() {
        let data = build_pdf(&[&["only page"]]);
        let doc = LopdfDecoder::new().decode(&data).unwrap();
        assert!(matches!(
            doc.page_text(2),
            Err(DecodeError::PageOutOfRange { page: 2, count: 1 })
        ));
    }

    #[test]
    fn test_truncated_bytes_fail_to_decode() {
        let data = build_pdf(&[&["Hello"]]);
        let truncated = &data[..16];
        assert!(matches!(
            LopdfDecoder::new().decode(truncated),
            Err(DecodeError::Parse(_))
        ));
    }

    #[test]
    fn test_garbage_fails_to_decode() {
        let result = LopdfDecoder::new().decode(b"definitely not a pdf");
        assert!(matches!(result, Err(DecodeError::Parse(_))));
    }

    #[cfg(feature = "native")]
    #[test]
    fn test_fallback_bytes_follow_config() {
        let data = build_pdf(&[&["Hello"]]);

        let with_fallback = LopdfDecoder::new().load(&data).unwrap();
        assert_eq!(with_fallback.fallback_data.as_deref(), Some(data.as_slice()));

        let without = LopdfDecoder::new().with_text_fallback(false).load(&data).unwrap();
        assert!(without.fallback_data.is_none());
    }

    #[test]
    fn test_fragments_skip_blank_lines() {
        assert_eq!(
            LopdfDocument::fragments("  alpha \n\n beta\n"),
            vec!["alpha".to_string(), "beta".to_string()]
        );
    }
}
