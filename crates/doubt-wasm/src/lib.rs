//! WASM bindings for PDF document analysis.
//!
//! This crate exposes the analysis session to browsers: the page hands over
//! the bytes of the selected `File` and renders the returned strings as-is.

use wasm_bindgen::prelude::*;

use doubt_core::analysis::{extract_preview, rank_keywords};
use doubt_core::{AnalysisResult, AnalysisSession, DoubtConfig, Operation};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Rank keywords of text that was already extracted on the JS side.
#[wasm_bindgen(js_name = keywordsFromText)]
pub fn keywords_from_text(text: &str) -> js_sys::Array {
    let config = DoubtConfig::default();
    rank_keywords(text, &config.analysis)
        .iter()
        .map(|entry| JsValue::from_str(&entry.to_string()))
        .collect()
}

/// Build a preview from text fragments that were already extracted on the JS side.
#[wasm_bindgen(js_name = previewFromFragments)]
pub fn preview_from_fragments(fragments: Vec<String>) -> String {
    let config = DoubtConfig::default();
    extract_preview(&fragments, &config.analysis).to_string()
}

/// Document analyzer class for browser use.
#[wasm_bindgen]
pub struct DocumentAnalyzerJs {
    session: AnalysisSession,
}

#[wasm_bindgen]
impl DocumentAnalyzerJs {
    /// Create an analyzer with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            session: AnalysisSession::new(DoubtConfig::default()),
        }
    }

    /// Create an analyzer from a configuration object.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: JsValue) -> Result<DocumentAnalyzerJs, JsValue> {
        let config: DoubtConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            session: AnalysisSession::new(config),
        })
    }

    /// Make a file the current document. Returns its upload id.
    ///
    /// Results of the previous document are cleared.
    #[wasm_bindgen]
    pub fn upload(&mut self, name: &str, media_type: &str, bytes: &[u8]) -> Result<f64, JsValue> {
        self.session
            .upload(name, media_type, bytes.to_vec())
            .map(|id| id.0 as f64)
            .map_err(|failure| JsValue::from_str(&failure.message))
    }

    /// Run every analysis of the current document.
    #[wasm_bindgen]
    pub fn analyze(&mut self) {
        self.session.analyze_now();
    }

    /// Number of pages of the current document.
    #[wasm_bindgen(js_name = pageCount)]
    pub fn page_count(&mut self) -> Result<u32, JsValue> {
        match self.ensure(Operation::PageCount)? {
            AnalysisResult::PageCount { pages } => Ok(pages),
            other => Err(failure_value(&other)),
        }
    }

    /// Display-ready preview of the first page.
    #[wasm_bindgen]
    pub fn preview(&mut self) -> Result<String, JsValue> {
        match self.ensure(Operation::Preview)? {
            AnalysisResult::Preview(preview) => Ok(preview.to_string()),
            other => Err(failure_value(&other)),
        }
    }

    /// Display-ready `"token (count)"` keyword lines.
    #[wasm_bindgen]
    pub fn keywords(&mut self) -> Result<js_sys::Array, JsValue> {
        match self.ensure(Operation::Keywords)? {
            result @ AnalysisResult::Keywords { .. } => Ok(result
                .display_lines()
                .into_iter()
                .map(|line| JsValue::from_str(&line))
                .collect()),
            other => Err(failure_value(&other)),
        }
    }

    /// Ask a question; an empty string returns `undefined`.
    #[wasm_bindgen]
    pub fn ask(&mut self, question: &str) -> Option<String> {
        self.session.ask(question).map(str::to_string)
    }

    /// All output slots as a plain object.
    #[wasm_bindgen]
    pub fn report(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.report())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl DocumentAnalyzerJs {
    /// Compute an operation's slot if it is still empty, then return it.
    fn ensure(&mut self, op: Operation) -> Result<AnalysisResult, JsValue> {
        if self.session.result(op).is_none() {
            let Some(ticket) = self.session.launch(op) else {
                return Err(JsValue::from_str("No document uploaded"));
            };
            let completion = ticket.run();
            self.session.complete(completion);
        }

        self.session
            .result(op)
            .cloned()
            .ok_or_else(|| JsValue::from_str("No result available"))
    }
}

impl Default for DocumentAnalyzerJs {
    fn default() -> Self {
        Self::new()
    }
}

fn failure_value(result: &AnalysisResult) -> JsValue {
    match result.as_failure() {
        Some(failure) => JsValue::from_str(&failure.message),
        None => JsValue::from_str("unexpected result"),
    }
}
