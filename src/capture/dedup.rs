//! Order-preserving, duplicate-free accumulation of accepted URLs.

use std::collections::HashSet;

/// The accumulated URL sequence for one capture run.
///
/// Append-only: the first occurrence of a URL wins its position and nothing is
/// ever reordered or removed. Membership is tracked in a set alongside the
/// ordered list, so appends stay O(1) amortized as the run grows.
#[derive(Debug, Default)]
pub struct UrlSequence {
    urls: Vec<String>,
    seen: HashSet<String>,
}

impl UrlSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `url` unless it was recorded before. Returns true for new URLs.
    pub fn push(&mut self, url: String) -> bool {
        if self.seen.contains(&url) {
            return false;
        }
        self.seen.insert(url.clone());
        self.urls.push(url);
        true
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
