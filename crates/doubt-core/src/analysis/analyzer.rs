//! Analysis facade over the decoder, preview and keyword stages.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::{extract_keywords, preview_document};
use crate::error::{AnalysisFailure, DecodeError, ErrorKind};
use crate::models::config::DoubtConfig;
use crate::models::document::{DocumentId, RawDocument};
use crate::models::result::{AnalysisReport, AnalysisResult, Operation};
use crate::pdf::{DecodedDocument, DocumentDecoder, decoder_from_config};

/// Message shown when an upload is not a PDF.
const INVALID_MEDIA_TYPE_MESSAGE: &str = "Please upload a valid PDF file";

type DecodeOutcome = Result<Arc<dyn DecodedDocument>, DecodeError>;

/// An accepted upload together with its memoized decode.
///
/// The bytes are decoded at most once, by whichever analysis gets there
/// first; every other analysis of the same upload reuses the handle (or the
/// failure). Dropping the `LoadedDocument` drops the cache.
pub struct LoadedDocument {
    raw: RawDocument,
    decoded: OnceLock<DecodeOutcome>,
}

impl LoadedDocument {
    fn new(raw: RawDocument) -> Self {
        Self {
            raw,
            decoded: OnceLock::new(),
        }
    }

    /// Identity of the upload.
    pub fn id(&self) -> DocumentId {
        self.raw.id
    }

    /// The raw upload.
    pub fn raw(&self) -> &RawDocument {
        &self.raw
    }

    /// Whether the bytes have been decoded already.
    pub fn is_decoded(&self) -> bool {
        self.decoded.get().is_some()
    }

    fn decode_with(&self, decoder: &dyn DocumentDecoder) -> DecodeOutcome {
        self.decoded
            .get_or_init(|| {
                let start = Instant::now();
                let outcome = decoder.decode(&self.raw.bytes);
                debug!(
                    "Decoded {} ({} bytes) in {:?}: {}",
                    self.raw.id,
                    self.raw.len(),
                    start.elapsed(),
                    if outcome.is_ok() { "ok" } else { "failed" }
                );
                outcome
            })
            .clone()
    }
}

/// Stateless analysis facade.
///
/// All failures come back as [`AnalysisResult::Failure`]; nothing here panics
/// or returns an error the caller must handle before displaying.
pub struct DocumentAnalyzer {
    config: DoubtConfig,
    decoder: Arc<dyn DocumentDecoder>,
}

impl DocumentAnalyzer {
    /// Create an analyzer with the decoder selected by the configuration.
    pub fn new(config: DoubtConfig) -> Self {
        let decoder = decoder_from_config(&config.decoder);
        Self { config, decoder }
    }

    /// Create an analyzer with an explicit decoder.
    pub fn with_decoder(config: DoubtConfig, decoder: Arc<dyn DocumentDecoder>) -> Self {
        Self { config, decoder }
    }

    /// Analyzer configuration.
    pub fn config(&self) -> &DoubtConfig {
        &self.config
    }

    /// Reject documents whose media type is not accepted.
    pub fn validate(&self, raw: &RawDocument) -> Result<(), AnalysisFailure> {
        if !self.config.accepts(&raw.media_type) {
            warn!("Rejected {} with media type {:?}", raw.name, raw.media_type);
            return Err(AnalysisFailure::new(
                ErrorKind::InvalidMediaType,
                INVALID_MEDIA_TYPE_MESSAGE,
            ));
        }
        Ok(())
    }

    /// Validate an upload and wrap it for memoized decoding.
    pub fn load(&self, raw: RawDocument) -> Result<Arc<LoadedDocument>, AnalysisFailure> {
        self.validate(&raw)?;
        info!("Accepted {} as {} ({} bytes)", raw.name, raw.id, raw.len());
        Ok(Arc::new(LoadedDocument::new(raw)))
    }

    /// Number of pages in the document.
    pub fn page_count(&self, document: &LoadedDocument) -> AnalysisResult {
        self.run(document, Operation::PageCount)
    }

    /// First-page preview.
    pub fn preview(&self, document: &LoadedDocument) -> AnalysisResult {
        self.run(document, Operation::Preview)
    }

    /// Ranked keywords of the leading pages.
    pub fn keywords(&self, document: &LoadedDocument) -> AnalysisResult {
        self.run(document, Operation::Keywords)
    }

    /// Run one analysis operation.
    pub fn run(&self, document: &LoadedDocument, op: Operation) -> AnalysisResult {
        let outcome = document
            .decode_with(self.decoder.as_ref())
            .and_then(|decoded| self.compute(decoded.as_ref(), op));

        match outcome {
            Ok(result) => {
                debug!("{} of {} complete", op, document.id());
                result
            }
            Err(e) => {
                warn!("{} of {} failed: {}", op, document.id(), e);
                AnalysisResult::Failure(e.into())
            }
        }
    }

    fn compute(
        &self,
        decoded: &dyn DecodedDocument,
        op: Operation,
    ) -> Result<AnalysisResult, DecodeError> {
        let analysis = &self.config.analysis;
        Ok(match op {
            Operation::PageCount => AnalysisResult::PageCount {
                pages: decoded.page_count(),
            },
            Operation::Preview => AnalysisResult::Preview(preview_document(decoded, analysis)?),
            Operation::Keywords => AnalysisResult::Keywords {
                entries: extract_keywords(decoded, analysis)?,
            },
        })
    }

    /// Validate and run every operation on one document, sequentially.
    pub fn analyze(&self, raw: RawDocument) -> AnalysisReport {
        let name = raw.name.clone();
        let mut report = AnalysisReport {
            document: Some(name),
            ..AnalysisReport::default()
        };

        match self.load(raw) {
            Ok(document) => {
                for op in Operation::ALL {
                    *report.slot_mut(op) = Some(self.run(&document, op));
                }
            }
            Err(failure) => {
                for op in Operation::ALL {
                    *report.slot_mut(op) = Some(AnalysisResult::Failure(failure.clone()));
                }
            }
        }

        report.generated_at = Some(Utc::now());
        report
    }
}
