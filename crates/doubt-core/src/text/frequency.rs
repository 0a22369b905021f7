//! Token frequency counting and ranking.

use std::collections::HashMap;

use crate::models::result::FrequencyEntry;

/// Token counts kept in first-seen order.
///
/// Each distinct token has exactly one entry. Ranking is a stable sort by
/// descending count, so ties keep first-occurrence order.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    entries: Vec<FrequencyEntry>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of a token.
    pub fn add(&mut self, token: &str) {
        match self.index.get(token) {
            Some(&i) => self.entries[i].count += 1,
            None => {
                self.index.insert(token.to_string(), self.entries.len());
                self.entries.push(FrequencyEntry::new(token, 1));
            }
        }
    }

    /// Occurrence count of a token, if seen.
    pub fn count(&self, token: &str) -> Option<usize> {
        self.index.get(token).map(|&i| self.entries[i].count)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries by descending count, ties in first-seen order.
    pub fn ranked(&self) -> Vec<FrequencyEntry> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }

    /// The `k` highest-ranked entries.
    pub fn top(&self, k: usize) -> Vec<FrequencyEntry> {
        let mut ranked = self.ranked();
        ranked.truncate(k);
        ranked
    }
}

impl<S: AsRef<str>> Extend<S> for FrequencyTable {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for token in iter {
            self.add(token.as_ref());
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}
