//! End-to-end capture pipeline tests: raw log entries in, snapshot file out.

use nettrap::capture::filter::FilterChain;
use nettrap::capture::snapshot::SnapshotWriter;
use nettrap::capture::CaptureSession;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;

fn entry(url: &str, mime: &str) -> Value {
    json!({
        "method": "Network.responseReceived",
        "params": { "response": { "url": url, "mimeType": mime, "status": 200 } }
    })
}

fn snapshot_urls(capture: &CaptureSession) -> Vec<String> {
    serde_json::from_str(&fs::read_to_string(capture.snapshot_path()).unwrap()).unwrap()
}

#[test]
fn repeated_urls_snapshot_once() {
    let dir = TempDir::new().unwrap();
    let writer = SnapshotWriter::timestamped(dir.path()).unwrap();
    let mut capture = CaptureSession::new(FilterChain::empty(), writer);

    capture
        .ingest(vec![entry("a", ""), entry("b", ""), entry("a", "")])
        .unwrap();
    capture.persist().unwrap();

    assert_eq!(snapshot_urls(&capture), vec!["a", "b"]);
}

#[test]
fn css_rejecting_chain_filters_the_snapshot() {
    let dir = TempDir::new().unwrap();
    let writer = SnapshotWriter::timestamped(dir.path()).unwrap();
    let chain = FilterChain::resolve(&["no-css".to_string()]).unwrap();
    let mut capture = CaptureSession::new(chain, writer);

    capture
        .ingest(vec![
            entry("x.png", "image/png"),
            entry("y.css", "text/css"),
            entry("z.png", "image/png"),
        ])
        .unwrap();
    capture.persist().unwrap();

    assert_eq!(snapshot_urls(&capture), vec!["x.png", "z.png"]);
}

#[test]
fn snapshot_after_many_ticks_stays_a_unique_array() {
    let dir = TempDir::new().unwrap();
    let writer = SnapshotWriter::timestamped(dir.path()).unwrap();
    let mut capture = CaptureSession::new(FilterChain::empty(), writer);

    // Several ticks, with overlapping batches and idle ticks in between.
    for tick in 0..10 {
        let batch: Vec<Value> = (0..5)
            .map(|i| entry(&format!("https://h/{}", (tick + i) % 7), ""))
            .collect();
        capture.ingest(batch).unwrap();
        capture.persist().unwrap();
        capture.ingest(Vec::new()).unwrap();
        capture.persist().unwrap();
    }

    let urls = snapshot_urls(&capture);
    let unique: HashSet<&String> = urls.iter().collect();
    assert_eq!(urls.len(), unique.len(), "snapshot must hold unique URLs");
    assert_eq!(urls.len(), 7);
}

#[test]
fn image_chain_records_only_image_responses() {
    let dir = TempDir::new().unwrap();
    let writer = SnapshotWriter::timestamped(dir.path()).unwrap();
    let chain = FilterChain::resolve(&["images".to_string()]).unwrap();
    let mut capture = CaptureSession::new(chain, writer);

    capture
        .ingest(vec![
            entry("https://h/photo.jpg", "image/jpeg"),
            entry("https://h/page", "text/html"),
            entry("https://h/icon", "image/svg+xml"),
        ])
        .unwrap();
    capture.persist().unwrap();

    assert_eq!(
        snapshot_urls(&capture),
        vec!["https://h/photo.jpg", "https://h/icon"]
    );
}
