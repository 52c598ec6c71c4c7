//! Autonav scripts: scripted page interaction run concurrently with capture.
//!
//! A script receives the shared browser session and a cancellation token and
//! is expected to poll the token between steps. Shutdown cancels the token and
//! then aborts the task, so a script that never polls is abandoned rather than
//! joined. Scripts only issue navigation/interaction commands; draining the
//! buffered network log belongs to the capture loop alone.

use crate::browser::BrowserSession;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum AutonavError {
    #[error("no autonav script named `{0}` is registered")]
    Unknown(String),
}

/// A scripted browser interaction driven on its own task.
#[async_trait]
pub trait Autonav: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &'static str;

    /// Drive the session until cancelled or the script finishes naturally.
    async fn run(&self, session: Arc<BrowserSession>, cancel: CancellationToken) -> Result<()>;
}

/// Resolve a script name against the registry. An unknown name is a
/// startup-fatal configuration error.
pub fn resolve(name: &str) -> Result<Arc<dyn Autonav>, AutonavError> {
    match name {
        "scroll" => Ok(Arc::new(Scroll)),
        "reload" => Ok(Arc::new(Reload)),
        other => Err(AutonavError::Unknown(other.to_string())),
    }
}

/// The names of every registered script.
pub fn available() -> Vec<&'static str> {
    vec!["scroll", "reload"]
}

/// Spawn `script` on its own task. The capture loop never joins the runner;
/// the returned handle exists so shutdown can abort a script that ignores its
/// token. A script error ends the task with a warning, never the capture run.
pub fn spawn(
    script: Arc<dyn Autonav>,
    session: Arc<BrowserSession>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::debug!(script = script.name(), "autonav started");
        match script.run(session, cancel).await {
            Ok(()) => tracing::debug!(script = script.name(), "autonav finished"),
            Err(e) => tracing::warn!(script = script.name(), "autonav stopped: {e:#}"),
        }
    })
}

/// Scroll one viewport height per second to trigger lazy-loaded resources.
#[derive(Debug)]
struct Scroll;

#[async_trait]
impl Autonav for Scroll {
    fn name(&self) -> &'static str {
        "scroll"
    }

    async fn run(&self, session: Arc<BrowserSession>, cancel: CancellationToken) -> Result<()> {
        loop {
            if cancel.is_cancelled() {
                return Ok(());
            }
            session.evaluate("window.scrollBy(0, window.innerHeight)").await?;
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                _ = tokio::time::sleep(Duration::from_secs(1)) => {}
            }
        }
    }
}

/// Reload the page every ten seconds to re-trigger its resource requests.
#[derive(Debug)]
struct Reload;

#[async_trait]
impl Autonav for Reload {
    fn name(&self) -> &'static str {
        "reload"
    }

    async fn run(&self, session: Arc<BrowserSession>, cancel: CancellationToken) -> Result<()> {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                _ = tokio::time::sleep(Duration::from_secs(10)) => {}
            }
            session.evaluate("location.reload()").await?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_registered_scripts() {
        assert_eq!(resolve("scroll").unwrap().name(), "scroll");
        assert_eq!(resolve("reload").unwrap().name(), "reload");
    }

    #[test]
    fn unknown_script_is_a_config_error() {
        let err = resolve("doesnotexist").unwrap_err();
        assert!(matches!(err, AutonavError::Unknown(name) if name == "doesnotexist"));
    }

    #[test]
    fn registry_names_are_listed() {
        assert_eq!(available(), vec!["scroll", "reload"]);
    }
}
