//! Document decoder boundary.
//!
//! The engine never parses the PDF format itself. It needs two capabilities
//! from a decoder:
//! - `decode(bytes)` producing a handle to the decoded document
//! - per-page text as an ordered sequence of fragments, pages numbered from 1

mod decoder;
#[cfg(feature = "native")]
mod fallback;
mod memory;

pub use decoder::{LopdfDecoder, LopdfDocument};
#[cfg(feature = "native")]
pub use fallback::{PdfExtractDecoder, apportion_lines};
pub use memory::{MemoryDecoder, MemoryDocument};

use std::sync::Arc;

use crate::error::DecodeError;
use crate::models::config::{DecoderBackend, DecoderConfig};

/// Result type for decoder operations.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// A successfully decoded document.
///
/// Handles are immutable and shared between analyses of the same upload.
pub trait DecodedDocument: Send + Sync {
    /// Number of pages; pages are numbered `1..=page_count()`.
    fn page_count(&self) -> u32;

    /// Text fragments of one page, in reading order.
    fn page_text(&self, page: u32) -> Result<Vec<String>>;
}

/// Turns raw document bytes into a [`DecodedDocument`].
pub trait DocumentDecoder: Send + Sync {
    /// Decode a document from bytes.
    fn decode(&self, data: &[u8]) -> Result<Arc<dyn DecodedDocument>>;
}

/// Check a 1-based page index against a page count.
pub fn check_page(page: u32, count: u32) -> Result<()> {
    if page == 0 || page > count {
        return Err(DecodeError::PageOutOfRange { page, count });
    }
    Ok(())
}

/// Build the decoder selected by the configuration.
pub fn decoder_from_config(config: &DecoderConfig) -> Arc<dyn DocumentDecoder> {
    match config.backend {
        #[cfg(feature = "native")]
        DecoderBackend::PdfExtract => Arc::new(PdfExtractDecoder::new()),
        #[cfg(not(feature = "native"))]
        DecoderBackend::PdfExtract => {
            tracing::warn!("pdf-extract backend unavailable in this build, using lopdf");
            Arc::new(LopdfDecoder::from_config(config))
        }
        DecoderBackend::Lopdf => Arc::new(LopdfDecoder::from_config(config)),
    }
}
