//! Whole-document text extraction using pdf-extract.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use lopdf::Document;
use tracing::debug;

use super::{DecodedDocument, DocumentDecoder, Result, check_page};
use crate::error::DecodeError;

/// Extract the text of a whole document with pdf-extract.
///
/// pdf-extract panics on some malformed inputs; panics are reported as extraction errors.
pub(crate) fn extract_whole_text(data: &[u8]) -> Result<String> {
    match panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(data))) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(DecodeError::TextExtraction(e.to_string())),
        Err(_) => Err(DecodeError::TextExtraction(
            "pdf-extract aborted on malformed content".to_string(),
        )),
    }
}

/// Distribute the lines of a whole-document text evenly over `page_count` pages.
///
/// The last page receives any remainder. Blank lines are dropped after
/// apportioning so page boundaries stay stable.
pub fn apportion_lines(text: &str, page_count: u32) -> Vec<Vec<String>> {
    let page_count = page_count as usize;
    if page_count == 0 {
        return Vec::new();
    }

    let lines: Vec<&str> = text.lines().collect();
    let lines_per_page = lines.len() / page_count;

    (0..page_count)
        .map(|i| {
            let start = (i * lines_per_page).min(lines.len());
            let end = if i + 1 == page_count {
                lines.len()
            } else {
                ((i + 1) * lines_per_page).min(lines.len())
            };
            lines[start..end]
                .iter()
                .map(|line| line.trim())
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        })
        .collect()
}

/// Decoder that extracts all text up front with pdf-extract.
///
/// Page boundaries are approximated by line count; use [`super::LopdfDecoder`]
/// when exact per-page text matters.
pub struct PdfExtractDecoder;

impl PdfExtractDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentDecoder for PdfExtractDecoder {
    fn decode(&self, data: &[u8]) -> Result<Arc<dyn DecodedDocument>> {
        let doc = Document::load_mem(data).map_err(|e| DecodeError::Parse(e.to_string()))?;
        if doc.is_encrypted() {
            return Err(DecodeError::Encrypted);
        }

        let page_count = doc.get_pages().len() as u32;
        let pages = if page_count == 0 {
            Vec::new()
        } else {
            apportion_lines(&extract_whole_text(data)?, page_count)
        };

        debug!("pdf-extract decoded {} pages", page_count);
        Ok(Arc::new(ExtractedDocument { pages }))
    }
}

struct ExtractedDocument {
    pages: Vec<Vec<String>>,
}

impl DecodedDocument for ExtractedDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_text(&self, page: u32) -> Result<Vec<String>> {
        check_page(page, self.page_count())?;
        Ok(self.pages[(page - 1) as usize].clone())
    }
}
