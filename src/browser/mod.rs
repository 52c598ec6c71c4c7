//! Chromium session handle built on chromiumoxide.
//!
//! Owns the headless browser, one page with CDP network tracking enabled, and
//! a buffer of raw `Network.responseReceived` log entries. The session exposes
//! two disjoint command categories: the capture loop only drains the buffered
//! log, and autonav scripts only navigate and evaluate JS. Each concurrent
//! user must stay on its own side of that split.

use anyhow::{bail, Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{EnableParams, EventResponseReceived};
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// How long a navigation may take before the run fails.
const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. NETTRAP_CHROMIUM_PATH env
    if let Ok(p) = std::env::var("NETTRAP_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. ~/.nettrap/chromium/
    if let Some(home) = dirs::home_dir() {
        let candidates = if cfg!(target_os = "macos") {
            vec![
                home.join(".nettrap/chromium/chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".nettrap/chromium/chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".nettrap/chromium/chrome"),
            ]
        } else {
            vec![
                home.join(".nettrap/chromium/chrome-linux64/chrome"),
                home.join(".nettrap/chromium/chrome"),
            ]
        };
        for c in candidates {
            if c.exists() {
                return Some(c);
            }
        }
    }

    // 3. System PATH
    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    // 4. Common macOS locations
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// One controlled browser instance: navigation, JS evaluation, and buffered
/// network-log retrieval.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    log: Arc<Mutex<Vec<Value>>>,
    handler_task: JoinHandle<()>,
    listener_task: JoinHandle<()>,
}

impl BrowserSession {
    /// Launch headless Chromium, enable CDP network tracking on a fresh page,
    /// and start buffering response events.
    pub async fn launch() -> Result<Self> {
        let chrome_path = find_chromium()
            .context("Chromium not found. Set NETTRAP_CHROMIUM_PATH or install google-chrome.")?;

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        // Drive the CDP connection
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("failed to open page")?;
        page.execute(EnableParams::default())
            .await
            .context("failed to enable network tracking")?;

        let log = Arc::new(Mutex::new(Vec::new()));
        let mut responses = page
            .event_listener::<EventResponseReceived>()
            .await
            .context("failed to subscribe to network events")?;

        let buffer = Arc::clone(&log);
        let listener_task = tokio::spawn(async move {
            while let Some(event) = responses.next().await {
                // Buffered in the raw log-entry shape the capture loop parses.
                match serde_json::to_value(&*event) {
                    Ok(params) => buffer.lock().await.push(json!({
                        "method": "Network.responseReceived",
                        "params": params,
                    })),
                    Err(e) => tracing::warn!("failed to encode network event: {e}"),
                }
            }
        });

        Ok(Self {
            browser,
            page,
            log,
            handler_task,
            listener_task,
        })
    }

    /// Navigate the page, waiting for the load to settle.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        let result = tokio::time::timeout(NAVIGATION_TIMEOUT, self.page.goto(url)).await;
        match result {
            Ok(Ok(_)) => {
                let _ = self.page.wait_for_navigation().await;
                Ok(())
            }
            Ok(Err(e)) => bail!("navigation to {url} failed: {e}"),
            Err(_) => bail!(
                "navigation to {url} timed out after {}s",
                NAVIGATION_TIMEOUT.as_secs()
            ),
        }
    }

    /// Evaluate a JS expression on the page. Returns `None` when the
    /// expression produced no value (e.g. `window.scrollBy(...)`).
    pub async fn evaluate(&self, script: &str) -> Result<Option<Value>> {
        let result = self
            .page
            .evaluate(script)
            .await
            .context("JS evaluation failed")?;
        Ok(result.value().cloned())
    }

    /// Return and clear every buffered log entry since the last call.
    pub async fn drain_log(&self) -> Vec<Value> {
        std::mem::take(&mut *self.log.lock().await)
    }

    /// Close the page and shut the browser down.
    pub async fn close(mut self) -> Result<()> {
        self.listener_task.abort();
        let _ = self.page.close().await;
        let _ = self.browser.close().await;
        self.handler_task.abort();
        Ok(())
    }
}
