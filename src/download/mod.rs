//! Sequential downloader: fetch URLs and store the bodies content-addressed.
//!
//! Downloads are strictly sequential with a courtesy delay between requests.
//! Any fetch or write failure aborts the remaining batch; there are no
//! retries. Output files are named by the SHA-256 of their exact bytes, so
//! byte-identical responses collapse to a single file.

use anyhow::{bail, Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Per-request timeout.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Extension given to every stored file. The capture targets are images, so
/// the name is fixed rather than derived from the response Content-Type.
const OUTPUT_EXT: &str = "png";

/// Read a JSON array of URL strings, typically a capture snapshot.
pub fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read URL list {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("{} is not a JSON array of URL strings", path.display()))
}

/// Content-addressed file name for a payload.
pub fn content_file_name(body: &[u8]) -> String {
    let digest = Sha256::digest(body);
    format!("{}.{OUTPUT_EXT}", hex::encode(digest))
}

/// Fetch every URL in order, writing each body to
/// `<output_dir>/<sha256>.<ext>`. Returns the written paths, one per URL; a
/// path repeats when two responses carried identical bytes.
pub async fn run(urls: &[String], output_dir: &Path, delay: Duration) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("failed to build HTTP client")?;

    let mut written = Vec::with_capacity(urls.len());
    for url in urls {
        let response = client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?;
        let status = response.status();
        if !status.is_success() {
            bail!("GET {url} returned HTTP {status}");
        }
        let body = response
            .bytes()
            .await
            .with_context(|| format!("failed to read body of {url}"))?;

        let path = output_dir.join(content_file_name(&body));
        fs::write(&path, &body)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(url = %url, path = %path.display(), bytes = body.len(), "downloaded");
        written.push(path);

        tokio::time::sleep(delay).await;
    }
    Ok(written)
}
