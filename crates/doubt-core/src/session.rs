//! Upload session: owns the output slots and discards stale results.
//!
//! Analyses are launched as [`Ticket`]s tagged with the upload they were
//! started for. A ticket can run on any thread; its [`Completion`] is only
//! applied if that upload is still the current one.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::analysis::{DocumentAnalyzer, LoadedDocument};
use crate::answer::{AnswerStrategy, DocumentContext, EchoAnswer};
use crate::error::AnalysisFailure;
use crate::models::config::DoubtConfig;
use crate::models::document::{DocumentId, RawDocument};
use crate::models::result::{AnalysisReport, AnalysisResult, Operation};

/// A pending analysis of one upload.
pub struct Ticket {
    op: Operation,
    document: Arc<LoadedDocument>,
    analyzer: Arc<DocumentAnalyzer>,
}

impl Ticket {
    /// Upload this ticket was launched against.
    pub fn document_id(&self) -> DocumentId {
        self.document.id()
    }

    /// Operation to run.
    pub fn operation(&self) -> Operation {
        self.op
    }

    /// Run the analysis. Blocks for the duration of decoding and computation.
    pub fn run(self) -> Completion {
        let result = self.analyzer.run(&self.document, self.op);
        Completion {
            document: self.document.id(),
            op: self.op,
            result,
        }
    }
}

/// A finished analysis, tagged with the upload it belongs to.
#[derive(Debug, Clone)]
pub struct Completion {
    pub document: DocumentId,
    pub op: Operation,
    pub result: AnalysisResult,
}

/// Coordinates uploads, analyses and the output slots.
pub struct AnalysisSession {
    analyzer: Arc<DocumentAnalyzer>,
    answerer: Box<dyn AnswerStrategy>,
    current: Option<Arc<LoadedDocument>>,
    next_id: u64,
    report: AnalysisReport,
}

impl AnalysisSession {
    /// Create a session using the configured decoder and the echo answerer.
    pub fn new(config: DoubtConfig) -> Self {
        let answerer = Box::new(EchoAnswer::from_config(&config.answer));
        Self::with_parts(Arc::new(DocumentAnalyzer::new(config)), answerer)
    }

    /// Create a session from an analyzer and an answering strategy.
    pub fn with_parts(analyzer: Arc<DocumentAnalyzer>, answerer: Box<dyn AnswerStrategy>) -> Self {
        Self {
            analyzer,
            answerer,
            current: None,
            next_id: 1,
            report: AnalysisReport::default(),
        }
    }

    /// Replace the answering strategy.
    pub fn set_answerer(&mut self, answerer: Box<dyn AnswerStrategy>) {
        self.answerer = answerer;
    }

    /// Accept a new upload.
    ///
    /// On success every output slot is cleared and the previous upload's
    /// decode cache is dropped. A rejected upload leaves the session untouched.
    pub fn upload(
        &mut self,
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Result<DocumentId, AnalysisFailure> {
        let id = DocumentId(self.next_id);
        let raw = RawDocument::new(id, name, media_type, bytes);
        let loaded = self.analyzer.load(raw)?;
        self.next_id += 1;

        if let Some(previous) = self.current.replace(loaded) {
            debug!("{} superseded by {}", previous.id(), id);
        }
        self.report = AnalysisReport {
            document: self.current.as_ref().map(|doc| doc.raw().name.clone()),
            ..AnalysisReport::default()
        };
        info!("Upload {} is now current", id);
        Ok(id)
    }

    /// The current upload, if any.
    pub fn current_document(&self) -> Option<DocumentId> {
        self.current.as_ref().map(|doc| doc.id())
    }

    /// Launch one analysis of the current upload.
    pub fn launch(&self, op: Operation) -> Option<Ticket> {
        self.current.as_ref().map(|document| Ticket {
            op,
            document: Arc::clone(document),
            analyzer: Arc::clone(&self.analyzer),
        })
    }

    /// Launch every analysis of the current upload.
    pub fn launch_all(&self) -> Vec<Ticket> {
        Operation::ALL
            .into_iter()
            .filter_map(|op| self.launch(op))
            .collect()
    }

    /// Store a finished analysis.
    ///
    /// Returns `false` (and drops the result) when the completion belongs to
    /// an upload that has since been replaced.
    pub fn complete(&mut self, completion: Completion) -> bool {
        if self.current_document() != Some(completion.document) {
            warn!(
                "Discarding stale {} result of {}",
                completion.op, completion.document
            );
            return false;
        }
        *self.report.slot_mut(completion.op) = Some(completion.result);
        true
    }

    /// Run every analysis of the current upload on this thread.
    pub fn analyze_now(&mut self) {
        for ticket in self.launch_all() {
            let completion = ticket.run();
            self.complete(completion);
        }
    }

    /// Ask a question. Only the empty string is ignored and returns `None`.
    pub fn ask(&mut self, question: &str) -> Option<&str> {
        if question.is_empty() {
            return None;
        }

        let context = self.context();
        let answer = self.answerer.answer(question, &context);
        self.report.answer = Some(answer);
        self.report.answer.as_deref()
    }

    /// What the answering strategy knows about the current upload.
    pub fn context(&self) -> DocumentContext {
        let page_count = match &self.report.page_count {
            Some(AnalysisResult::PageCount { pages }) => Some(*pages),
            _ => None,
        };
        DocumentContext {
            name: self.current.as_ref().map(|doc| doc.raw().name.clone()),
            page_count,
        }
    }

    /// Result slot of an operation; `None` until computed.
    pub fn result(&self, op: Operation) -> Option<&AnalysisResult> {
        self.report.slot(op)
    }

    /// Last answer; `None` until a question was asked.
    pub fn answer(&self) -> Option<&str> {
        self.report.answer.as_deref()
    }

    /// Snapshot of every output slot.
    pub fn report(&self) -> AnalysisReport {
        AnalysisReport {
            generated_at: Some(Utc::now()),
            ..self.report.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::config::PDF_MEDIA_TYPE;
    use crate::pdf::MemoryDecoder;
    use pretty_assertions::assert_eq;

    fn session_with(decoder: &MemoryDecoder) -> AnalysisSession {
        let analyzer = DocumentAnalyzer::with_decoder(DoubtConfig::default(), Arc::new(decoder.clone()));
        AnalysisSession::with_parts(Arc::new(analyzer), Box::new(EchoAnswer::new()))
    }

    fn keyword_lines(session: &AnalysisSession) -> Vec<String> {
        session
            .result(Operation::Keywords)
            .map(AnalysisResult::display_lines)
            .unwrap_or_default()
    }

    #[test]
    fn test_slots_start_unset() {
        let decoder = MemoryDecoder::from_pages(&[]);
        let mut session = session_with(&decoder);
        session.upload("empty.pdf", PDF_MEDIA_TYPE, b"%PDF-1.4".to_vec()).unwrap();

        assert!(session.result(Operation::PageCount).is_none());
        session.analyze_now();
        assert_eq!(
            session.result(Operation::PageCount),
            Some(&AnalysisResult::PageCount { pages: 0 })
        );
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let decoder = MemoryDecoder::from_pages(&["apple apple banana"]);
        let mut session = session_with(&decoder);

        let first = session.upload("a.pdf", PDF_MEDIA_TYPE, b"%PDF-A".to_vec()).unwrap();
        let in_flight = session.launch(Operation::Keywords).unwrap();
        assert_eq!(in_flight.document_id(), first);

        let second = session.upload("b.pdf", PDF_MEDIA_TYPE, b"%PDF-B".to_vec()).unwrap();
        assert_ne!(first, second);

        // A's analysis finishes after B was uploaded
        let late = in_flight.run();
        assert!(!session.complete(late));
        assert!(session.result(Operation::Keywords).is_none());

        session.analyze_now();
        assert_eq!(keyword_lines(&session), vec!["apple (2)", "banana (1)"]);
        assert_eq!(session.report().document.as_deref(), Some("b.pdf"));
    }

    #[test]
    fn test_upload_resets_results() {
        let decoder = MemoryDecoder::from_pages(&["words words"]);
        let mut session = session_with(&decoder);
        session.upload("a.pdf", PDF_MEDIA_TYPE, b"%PDF-A".to_vec()).unwrap();
        session.analyze_now();
        session.ask("anything?");
        assert!(session.result(Operation::Preview).is_some());

        session.upload("b.pdf", PDF_MEDIA_TYPE, b"%PDF-B".to_vec()).unwrap();
        for op in Operation::ALL {
            assert!(session.result(op).is_none());
        }
        assert!(session.answer().is_none());
    }

    #[test]
    fn test_rejected_upload_keeps_state() {
        let decoder = MemoryDecoder::from_pages(&["words"]);
        let mut session = session_with(&decoder);
        let id = session.upload("a.pdf", PDF_MEDIA_TYPE, b"%PDF-A".to_vec()).unwrap();
        session.analyze_now();

        let failure = session.upload("b.png", "image/png", vec![0u8; 4]).unwrap_err();
        assert_eq!(failure.kind, ErrorKind::InvalidMediaType);
        assert_eq!(session.current_document(), Some(id));
        assert!(session.result(Operation::PageCount).is_some());
    }

    #[test]
    fn test_decode_failure_fills_every_slot() {
        let decoder = MemoryDecoder::from_pages(&["words"]);
        let mut session = session_with(&decoder);
        session.upload("broken.pdf", PDF_MEDIA_TYPE, b"\x00\x01".to_vec()).unwrap();
        session.analyze_now();

        for op in Operation::ALL {
            let kind = session.result(op).and_then(AnalysisResult::as_failure).map(|f| f.kind);
            assert_eq!(kind, Some(ErrorKind::DecodeFailed));
        }
    }

    #[test]
    fn test_ask() {
        let decoder = MemoryDecoder::from_pages(&["a", "b"]);
        let mut session = session_with(&decoder);

        assert_eq!(session.ask(""), None);
        assert!(session.answer().is_none());

        assert_eq!(
            session.ask("   "),
            Some("Here\u{2019}s a sample answer for: \"   \"")
        );
        assert_eq!(session.ask(""), None);
        assert_eq!(session.answer(), Some("Here\u{2019}s a sample answer for: \"   \""));

        assert_eq!(
            session.ask("What is this?"),
            Some("Here\u{2019}s a sample answer for: \"What is this?\"")
        );
    }

    struct ContextAnswer;

    impl AnswerStrategy for ContextAnswer {
        fn answer(&self, question: &str, context: &DocumentContext) -> String {
            format!(
                "{} / {} / {:?}",
                question,
                context.name.as_deref().unwrap_or("-"),
                context.page_count
            )
        }
    }

    #[test]
    fn test_custom_answer_strategy_sees_context() {
        let decoder = MemoryDecoder::from_pages(&["a", "b"]);
        let mut session = session_with(&decoder);
        session.set_answerer(Box::new(ContextAnswer));

        session.upload("doc.pdf", PDF_MEDIA_TYPE, b"%PDF-1.7".to_vec()).unwrap();
        assert_eq!(session.ask("q"), Some("q / doc.pdf / None"));

        session.analyze_now();
        assert_eq!(session.ask("q"), Some("q / doc.pdf / Some(2)"));
    }

    #[tokio::test]
    async fn test_concurrent_tickets_share_one_decode() {
        let decoder = MemoryDecoder::from_pages(&["alpha alpha", "beta"]);
        let mut session = session_with(&decoder);
        session.upload("a.pdf", PDF_MEDIA_TYPE, b"%PDF-1.4".to_vec()).unwrap();

        let handles: Vec<_> = session
            .launch_all()
            .into_iter()
            .map(|ticket| tokio::task::spawn_blocking(move || ticket.run()))
            .collect();

        for handle in handles {
            assert!(session.complete(handle.await.unwrap()));
        }

        assert_eq!(decoder.decode_calls(), 1);
        assert_eq!(keyword_lines(&session), vec!["alpha (2)", "beta (1)"]);
    }
}
