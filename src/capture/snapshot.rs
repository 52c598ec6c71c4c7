//! Snapshot persistence: the full URL sequence, rewritten wholesale each tick.

use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes the running URL list to one timestamped JSON file.
///
/// Every write lands in a sibling temp file first and is renamed into place,
/// so the file on disk is always either the previous or the new complete
/// snapshot, never a partial one.
#[derive(Debug)]
pub struct SnapshotWriter {
    path: PathBuf,
}

impl SnapshotWriter {
    /// Bind a fresh `dir/<YYYYMMDD-HHMMSS>.json` path for this run.
    pub fn timestamped(dir: &Path) -> Result<Self> {
        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        Self::at(dir.join(format!("{stamp}.json")))
    }

    /// Bind an explicit snapshot path, creating parent directories.
    pub fn at(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the snapshot with `urls` as a pretty-printed JSON array.
    pub fn write(&self, urls: &[String]) -> Result<()> {
        let json =
            serde_json::to_string_pretty(urls).context("failed to serialize URL list")?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn read_urls(path: &Path) -> Vec<String> {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn writes_pretty_json_array() {
        let dir = TempDir::new().unwrap();
        let writer = SnapshotWriter::at(dir.path().join("run.json")).unwrap();
        let urls = vec!["https://h/a".to_string(), "https://h/b".to_string()];
        writer.write(&urls).unwrap();

        let content = fs::read_to_string(writer.path()).unwrap();
        assert!(content.contains('\n'), "snapshot should be pretty-printed");
        assert_eq!(read_urls(writer.path()), urls);
    }

    #[test]
    fn leaves_no_temp_file_behind() {
        let dir = TempDir::new().unwrap();
        let writer = SnapshotWriter::at(dir.path().join("run.json")).unwrap();
        writer.write(&["https://h/a".to_string()]).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries, vec!["run.json"]);
    }

    #[test]
    fn rewriting_same_urls_is_byte_stable() {
        let dir = TempDir::new().unwrap();
        let writer = SnapshotWriter::at(dir.path().join("run.json")).unwrap();
        let urls = vec!["https://h/a".to_string()];

        writer.write(&urls).unwrap();
        let first = fs::read(writer.path()).unwrap();
        writer.write(&urls).unwrap();
        let second = fs::read(writer.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn overwrites_wholesale() {
        let dir = TempDir::new().unwrap();
        let writer = SnapshotWriter::at(dir.path().join("run.json")).unwrap();
        writer.write(&["https://h/a".to_string()]).unwrap();
        writer.write(&["https://h/a".to_string(), "https://h/b".to_string()]).unwrap();
        assert_eq!(read_urls(writer.path()).len(), 2);
    }

    #[test]
    fn timestamped_name_matches_layout() {
        let dir = TempDir::new().unwrap();
        let writer = SnapshotWriter::timestamped(dir.path()).unwrap();
        let name = writer.path().file_name().unwrap().to_string_lossy().into_owned();
        // YYYYMMDD-HHMMSS.json
        assert_eq!(name.len(), "20240101-120000.json".len());
        assert_eq!(&name[8..9], "-");
        assert!(name.ends_with(".json"));
        assert!(name[..8].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn creates_missing_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("deep").join("run.json");
        let writer = SnapshotWriter::at(nested.clone()).unwrap();
        writer.write(&[]).unwrap();
        assert!(nested.exists());
    }
}
