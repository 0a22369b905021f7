//! In-memory decoder with call accounting.
//!
//! Useful for embedding the engine over text that is already paginated and
//! for checking how many pages an analysis actually reads.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{DecodedDocument, DocumentDecoder, Result, check_page};
use crate::error::DecodeError;

/// Header every accepted byte buffer must start with.
const PDF_HEADER: &[u8] = b"%PDF-";

/// Decoder returning fixed pages for any buffer carrying a PDF header.
#[derive(Clone)]
pub struct MemoryDecoder {
    document: Arc<MemoryDocument>,
    decodes: Arc<AtomicUsize>,
}

/// Pages served by a [`MemoryDecoder`].
pub struct MemoryDocument {
    pages: Vec<Vec<String>>,
    page_reads: AtomicUsize,
}

impl MemoryDecoder {
    /// Create a decoder serving the given pages, each a list of fragments.
    pub fn new<P, F>(pages: P) -> Self
    where
        P: IntoIterator<Item = F>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        let pages = pages
            .into_iter()
            .map(|fragments| fragments.into_iter().map(Into::into).collect())
            .collect();
        Self {
            document: Arc::new(MemoryDocument {
                pages,
                page_reads: AtomicUsize::new(0),
            }),
            decodes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a decoder where each page is a single fragment.
    pub fn from_pages(pages: &[&str]) -> Self {
        Self::new(pages.iter().map(|page| [page.to_string()]))
    }

    /// Number of successful `decode` calls so far.
    pub fn decode_calls(&self) -> usize {
        self.decodes.load(Ordering::SeqCst)
    }

    /// Number of `page_text` calls so far, across all decoded handles.
    pub fn page_reads(&self) -> usize {
        self.document.page_reads.load(Ordering::SeqCst)
    }
}

impl DocumentDecoder for MemoryDecoder {
    fn decode(&self, data: &[u8]) -> Result<Arc<dyn DecodedDocument>> {
        if !data.starts_with(PDF_HEADER) {
            return Err(DecodeError::Parse("missing %PDF header".to_string()));
        }
        self.decodes.fetch_add(1, Ordering::SeqCst);
        Ok(self.document.clone())
    }
}

impl DecodedDocument for MemoryDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_text(&self, page: u32) -> Result<Vec<String>> {
        self.page_reads.fetch_add(1, Ordering::SeqCst);
        check_page(page, self.page_count())?;
        Ok(self.pages[(page - 1) as usize].clone())
    }
}
