//! Question answering strategies.
//!
//! Only a templated placeholder exists today. Real answering engines plug in
//! by implementing [`AnswerStrategy`].

use crate::models::config::AnswerConfig;

/// What an answering strategy knows about the current document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentContext {
    /// File name of the uploaded document, if any.
    pub name: Option<String>,
    /// Page count, once computed.
    pub page_count: Option<u32>,
}

/// Trait for question answering implementations.
pub trait AnswerStrategy: Send + Sync {
    /// Answer a non-empty question about the current document.
    fn answer(&self, question: &str, context: &DocumentContext) -> String;
}

/// Placeholder strategy echoing the question through a template.
pub struct EchoAnswer {
    template: String,
}

impl EchoAnswer {
    /// Create an echo strategy with the default template.
    pub fn new() -> Self {
        Self::from_config(&AnswerConfig::default())
    }

    /// Create an echo strategy from configuration.
    pub fn from_config(config: &AnswerConfig) -> Self {
        Self {
            template: config.template.clone(),
        }
    }

    /// Use a custom template; `{question}` is replaced by the question.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }
}

impl Default for EchoAnswer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnswerStrategy for EchoAnswer {
    fn answer(&self, question: &str, _context: &DocumentContext) -> String {
        self.template.replace("{question}", question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_default_template() {
        let answer = EchoAnswer::new().answer("What is Rust?", &DocumentContext::default());
        assert_eq!(answer, "Here\u{2019}s a sample answer for: \"What is Rust?\"");
    }

    #[test]
    fn test_echo_custom_template() {
        let strategy = EchoAnswer::new().with_template("Q: {question}");
        assert_eq!(strategy.answer("why", &DocumentContext::default()), "Q: why");
    }
}
