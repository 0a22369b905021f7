//! Document analysis: preview, keywords and the analyzer facade.

mod analyzer;
mod keywords;
mod preview;

pub use analyzer::{DocumentAnalyzer, LoadedDocument};
pub use keywords::{extract_keywords, rank_keywords};
pub use preview::{extract_preview, preview_document};
