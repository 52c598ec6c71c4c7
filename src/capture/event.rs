//! One parsed network-response log entry.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

/// A single `Network.responseReceived` record parsed from one raw buffered
/// log entry. Fields the filters never inspect are dropped during parsing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkEvent {
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub params: EventParams,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventParams {
    #[serde(default)]
    pub response: ResponseInfo,
}

/// The response fields filter predicates may inspect.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseInfo {
    #[serde(default)]
    pub url: String,
    #[serde(default, rename = "mimeType")]
    pub mime_type: String,
    #[serde(default)]
    pub status: i64,
}

impl NetworkEvent {
    /// Parse one raw buffered log entry. A malformed entry is an error the
    /// caller treats as fatal for the whole run; there is no per-entry skip.
    pub fn parse(raw: Value) -> Result<Self> {
        serde_json::from_value(raw).context("malformed network log entry")
    }

    /// The response URL, or the empty string when the event carries none.
    pub fn response_url(&self) -> &str {
        &self.params.response.url
    }
}
