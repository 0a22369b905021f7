//! Text normalization, stopword filtering and frequency ranking.

mod frequency;
mod stopwords;
mod tokenizer;

pub use frequency::FrequencyTable;
pub use stopwords::{STOPWORDS, is_stopword, keep_token};
pub use tokenizer::{normalize, tokens};
