//! Core library for PDF document analysis.
//!
//! This crate provides:
//! - A decoder boundary over PDF parsing (lopdf, with a pdf-extract fallback)
//! - Page counting and a bounded first-page text preview
//! - Keyword ranking over the leading pages of a document
//! - A pluggable question answering strategy
//! - An upload session that discards results of superseded uploads

pub mod analysis;
pub mod answer;
pub mod error;
pub mod models;
pub mod pdf;
pub mod session;
pub mod text;

pub use analysis::{DocumentAnalyzer, LoadedDocument};
pub use answer::{AnswerStrategy, DocumentContext, EchoAnswer};
pub use error::{AnalysisFailure, DecodeError, DoubtError, ErrorKind, Result};
pub use models::config::{DoubtConfig, PDF_MEDIA_TYPE};
pub use models::document::{DocumentId, RawDocument};
pub use models::result::{AnalysisReport, AnalysisResult, FrequencyEntry, Operation, Preview};
pub use pdf::{DecodedDocument, DocumentDecoder, LopdfDecoder, MemoryDecoder};
pub use session::{AnalysisSession, Completion, Ticket};
