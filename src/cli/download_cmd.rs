//! `nettrap download <file>` — fetch every URL in a snapshot, content-addressed.

use crate::download;
use anyhow::Result;
use std::path::Path;
use std::time::Duration;

/// Run the download command.
pub async fn run(file_path: &Path, output_dir: &Path, delay_ms: u64) -> Result<()> {
    let urls = download::read_url_list(file_path)?;
    println!("Downloading from {} URLs.", urls.len());

    let written = download::run(&urls, output_dir, Duration::from_millis(delay_ms)).await?;
    println!("Downloaded {} URLs into {}", written.len(), output_dir.display());
    Ok(())
}
