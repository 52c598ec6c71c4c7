//! Capture pipeline: poll buffered network events, filter, dedup, persist.
//!
//! Each tick drains every log entry the browser buffered since the last poll,
//! parses them, runs the filter chain, appends the response URLs of accepted
//! events to the run's sequence, and rewrites the snapshot file with the full
//! list. The log source may drop or reorder entries; the continuously
//! rewritten snapshot is the best-known state at every point, so nothing here
//! depends on real-time or exactly-once delivery.

pub mod autonav;
pub mod dedup;
pub mod event;
pub mod filter;
pub mod snapshot;

use anyhow::Result;
use serde_json::Value;
use std::path::Path;

use self::dedup::UrlSequence;
use self::event::NetworkEvent;
use self::filter::FilterChain;
use self::snapshot::SnapshotWriter;

/// One capture run: the resolved filter chain, the accumulated URL sequence,
/// and the snapshot writer, threaded through every tick.
pub struct CaptureSession {
    chain: FilterChain,
    urls: UrlSequence,
    writer: SnapshotWriter,
}

impl CaptureSession {
    pub fn new(chain: FilterChain, writer: SnapshotWriter) -> Self {
        Self {
            chain,
            urls: UrlSequence::new(),
            writer,
        }
    }

    /// Parse and filter a batch of raw log entries, appending the response
    /// URLs of accepted events. A malformed entry fails the whole run.
    /// Returns how many URLs were new.
    pub fn ingest(&mut self, entries: Vec<Value>) -> Result<usize> {
        let mut added = 0;
        for raw in entries {
            let event = NetworkEvent::parse(raw)?;
            if !self.chain.accept(&event) {
                continue;
            }
            if self.urls.push(event.response_url().to_string()) {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Rewrite the snapshot file with the full URL sequence.
    pub fn persist(&self) -> Result<()> {
        self.writer.write(self.urls.urls())
    }

    pub fn urls(&self) -> &[String] {
        self.urls.urls()
    }

    pub fn total(&self) -> usize {
        self.urls.len()
    }

    pub fn snapshot_path(&self) -> &Path {
        self.writer.path()
    }
}
