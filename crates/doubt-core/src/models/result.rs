//! Analysis results and the report built from them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisFailure, ErrorKind};

/// Analysis operations that can run against an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    PageCount,
    Preview,
    Keywords,
}

impl Operation {
    /// All analysis operations, in display order.
    pub const ALL: [Operation; 3] = [Operation::PageCount, Operation::Preview, Operation::Keywords];
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::PageCount => "page count",
            Operation::Preview => "preview",
            Operation::Keywords => "keywords",
        };
        f.write_str(name)
    }
}

/// A ranked keyword and its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub token: String,
    pub count: usize,
}

impl FrequencyEntry {
    pub fn new(token: impl Into<String>, count: usize) -> Self {
        Self {
            token: token.into(),
            count,
        }
    }
}

impl fmt::Display for FrequencyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.token, self.count)
    }
}

/// Bounded text preview of the first page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preview {
    /// Preview text, without the marker.
    pub text: String,
    /// Whether the source text was longer than the preview.
    pub truncated: bool,
    /// Marker rendered after the text; empty when none applies.
    pub marker: String,
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.text, self.marker)
    }
}

/// Outcome of a single analysis operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisResult {
    PageCount { pages: u32 },
    Preview(Preview),
    Keywords { entries: Vec<FrequencyEntry> },
    Failure(AnalysisFailure),
}

impl AnalysisResult {
    /// Build a failure result.
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        AnalysisResult::Failure(AnalysisFailure::new(kind, message))
    }

    /// Whether this result is a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, AnalysisResult::Failure(_))
    }

    /// The failure, if any.
    pub fn as_failure(&self) -> Option<&AnalysisFailure> {
        match self {
            AnalysisResult::Failure(failure) => Some(failure),
            _ => None,
        }
    }

    /// Display-ready lines for this result.
    pub fn display_lines(&self) -> Vec<String> {
        match self {
            AnalysisResult::PageCount { pages } => vec![pages.to_string()],
            AnalysisResult::Preview(preview) => vec![preview.to_string()],
            AnalysisResult::Keywords { entries } => entries.iter().map(ToString::to_string).collect(),
            AnalysisResult::Failure(failure) => vec![failure.message.clone()],
        }
    }
}

/// Snapshot of every output slot for one document.
///
/// A `None` slot has not been computed yet; this is distinct from a zero page count
/// or an empty keyword list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Name of the analyzed document.
    pub document: Option<String>,
    pub page_count: Option<AnalysisResult>,
    pub preview: Option<AnalysisResult>,
    pub keywords: Option<AnalysisResult>,
    /// Placeholder answer to the last question.
    pub answer: Option<String>,
    /// When this snapshot was taken.
    pub generated_at: Option<DateTime<Utc>>,
}

impl AnalysisReport {
    /// Slot for an operation.
    pub fn slot(&self, op: Operation) -> Option<&AnalysisResult> {
        match op {
            Operation::PageCount => self.page_count.as_ref(),
            Operation::Preview => self.preview.as_ref(),
            Operation::Keywords => self.keywords.as_ref(),
        }
    }

    /// Mutable slot for an operation.
    pub fn slot_mut(&mut self, op: Operation) -> &mut Option<AnalysisResult> {
        match op {
            Operation::PageCount => &mut self.page_count,
            Operation::Preview => &mut self.preview,
            Operation::Keywords => &mut self.keywords,
        }
    }
}
