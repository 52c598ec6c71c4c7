//! `nettrap capture` — record network response URLs from a browsing session.

use crate::browser::BrowserSession;
use crate::capture::autonav::{self, Autonav};
use crate::capture::filter::{self, FilterChain};
use crate::capture::snapshot::SnapshotWriter;
use crate::capture::CaptureSession;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Fixed capture period.
const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Startup configuration, resolved before any browser process exists so a bad
/// identifier never launches Chromium or touches the output directory.
#[derive(Debug)]
pub struct CaptureConfig {
    pub chain: FilterChain,
    pub script: Option<Arc<dyn Autonav>>,
}

/// Split a comma-separated filter list, ignoring empty segments.
pub fn parse_filter_list(filters: &str) -> Vec<String> {
    filters
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Resolve filter and autonav identifiers against their registries.
pub fn resolve_config(filters: &str, autonav_name: Option<&str>) -> Result<CaptureConfig> {
    let names = parse_filter_list(filters);
    let chain = FilterChain::resolve(&names)
        .with_context(|| format!("registered filters: {}", filter::available().join(", ")))?;
    let script = autonav_name
        .map(autonav::resolve)
        .transpose()
        .with_context(|| {
            format!("registered autonav scripts: {}", autonav::available().join(", "))
        })?;
    Ok(CaptureConfig { chain, script })
}

/// Run the capture command until externally interrupted.
pub async fn run(
    url: &str,
    autonav_name: Option<&str>,
    filters: &str,
    output_dir: &Path,
) -> Result<()> {
    let config = resolve_config(filters, autonav_name)?;

    let session = Arc::new(BrowserSession::launch().await?);
    session.navigate(url).await?;

    let cancel = CancellationToken::new();
    let runner = config.script.map(|script| {
        println!("Running autonav script `{}`.", script.name());
        autonav::spawn(script, Arc::clone(&session), cancel.clone())
    });

    let writer = SnapshotWriter::timestamped(output_dir)?;
    println!("Recording URLs to {}", writer.path().display());
    let mut capture = CaptureSession::new(config.chain, writer);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut ticker = tokio::time::interval(TICK_PERIOD);
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                let entries = session.drain_log().await;
                capture.ingest(entries)?;
                capture.persist()?;
                println!("Total URLs recorded: {}", capture.total());
            }
        }
    }

    // External interruption: cancel the runner, abandon it if it won't stop,
    // and leave one final complete snapshot behind.
    cancel.cancel();
    if let Some(task) = runner {
        task.abort();
        let _ = task.await;
    }
    capture.persist()?;
    tracing::info!(
        total = capture.total(),
        snapshot = %capture.snapshot_path().display(),
        "capture interrupted"
    );

    // An abandoned runner may still hold a session handle; in that case
    // process exit tears the browser down.
    if let Ok(session) = Arc::try_unwrap(session) {
        session.close().await?;
    }
    Ok(())
}
