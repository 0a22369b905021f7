//! Error types for the doubt-core library.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the doubt library.
#[derive(Error, Debug)]
pub enum DoubtError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised at the document decoder boundary.
///
/// Cloneable so that a failed decode can be memoized alongside a successful one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Failed to parse the document structure.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The document is encrypted and cannot be opened.
    #[error("PDF is encrypted")]
    Encrypted,

    /// Failed to extract text from a page.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// A page outside `1..=count` was requested.
    #[error("page {page} is out of range (document has {count} pages)")]
    PageOutOfRange { page: u32, count: u32 },
}

/// Failure category reported to callers in place of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input is not the expected document type; rejected before decoding.
    InvalidMediaType,
    /// Malformed, unsupported or corrupt document bytes.
    DecodeFailed,
    /// A page index beyond the decoded page count was requested.
    PageOutOfRange,
    /// Question or file absent.
    EmptyInput,
}

impl From<&DecodeError> for ErrorKind {
    fn from(err: &DecodeError) -> Self {
        match err {
            DecodeError::PageOutOfRange { .. } => ErrorKind::PageOutOfRange,
            _ => ErrorKind::DecodeFailed,
        }
    }
}

/// A typed failure with a short human-readable message.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct AnalysisFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl AnalysisFailure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<DecodeError> for AnalysisFailure {
    fn from(err: DecodeError) -> Self {
        Self::new(ErrorKind::from(&err), err.to_string())
    }
}

/// Result type for the doubt library.
pub type Result<T> = std::result::Result<T, DoubtError>;
