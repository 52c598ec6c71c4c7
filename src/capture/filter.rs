//! Named filter predicates over network events, AND-composed into a chain.
//!
//! Filters are registered at compile time under a stable name. A capture run
//! resolves its `--filters` list against the registry before any browser
//! process exists; an unknown name is a startup-fatal configuration error.

use crate::capture::event::NetworkEvent;
use thiserror::Error;
use url::Url;

/// A filter predicate. Predicates are pure: the same event always yields the
/// same verdict.
pub type FilterFn = fn(&NetworkEvent) -> bool;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("no filter named `{0}` is registered")]
    Unknown(String),
}

/// Registry of built-in filters, in registration (and evaluation) order.
const REGISTRY: &[(&str, FilterFn)] = &[
    ("images", images),
    ("no-css", no_css),
    ("http-only", http_only),
];

/// The names of every registered filter.
pub fn available() -> Vec<&'static str> {
    REGISTRY.iter().map(|(name, _)| *name).collect()
}

/// An ordered set of resolved predicates. An event is accepted iff every
/// predicate accepts it; the empty chain accepts everything.
#[derive(Debug, Default, Clone)]
pub struct FilterChain {
    predicates: Vec<(&'static str, FilterFn)>,
}

impl FilterChain {
    /// The accept-all chain.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolve every name against the registry, failing fast on the first
    /// unknown one. Predicates evaluate in the order the names were given.
    pub fn resolve(names: &[String]) -> Result<Self, FilterError> {
        let mut predicates = Vec::with_capacity(names.len());
        for name in names {
            let entry = REGISTRY
                .iter()
                .find(|(registered, _)| *registered == name.as_str())
                .ok_or_else(|| FilterError::Unknown(name.clone()))?;
            predicates.push(*entry);
        }
        Ok(Self { predicates })
    }

    /// AND over all resolved predicates, short-circuiting in order.
    pub fn accept(&self, event: &NetworkEvent) -> bool {
        self.predicates.iter().all(|(_, predicate)| predicate(event))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.predicates.iter().map(|(name, _)| *name).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

/// Keep only responses served with an `image/*` MIME type.
fn images(event: &NetworkEvent) -> bool {
    event.params.response.mime_type.starts_with("image/")
}

/// Reject stylesheet URLs.
fn no_css(event: &NetworkEvent) -> bool {
    let raw = event.response_url();
    match Url::parse(raw) {
        Ok(url) => !url.path().ends_with(".css"),
        // Not an absolute URL; fall back to a plain suffix check.
        Err(_) => !raw.ends_with(".css"),
    }
}

/// Keep only http(s) responses, dropping data:, blob:, and scheme-less URLs.
fn http_only(event: &NetworkEvent) -> bool {
    Url::parse(event.response_url())
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}
