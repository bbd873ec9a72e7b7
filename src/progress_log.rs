//! Append-only record of successfully downloaded URLs
//!
//! One URL per line, UTF-8, created on first append. Lines are written in completion
//! order and never rewritten or deduplicated.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Shared handle to the progress log file
///
/// Every append opens the file, writes one full line, syncs and closes it while holding
/// an async mutex, so concurrent workers never interleave partial lines.
#[derive(Debug)]
pub struct ProgressLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ProgressLog {
    /// Create a handle; the file itself is created on the first append
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `url` as a single line
    pub async fn append(&self, url: &str) -> Result<()> {
        let _guard = self.lock.lock().await;

        self.write_line(url).await.map_err(|source| Error::ProgressLog {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(url = %url, log = %self.path.display(), "Recorded completed download");
        Ok(())
    }

    async fn write_line(&self, url: &str) -> std::io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        let mut line = String::with_capacity(url.len() + 1);
        line.push_str(url);
        line.push('\n');

        file.write_all(line.as_bytes()).await?;
        file.sync_data().await?;
        Ok(())
    }

    /// Every recorded URL, oldest first; a missing file has no entries
    pub async fn entries(&self) -> Result<Vec<String>> {
        let _guard = self.lock.lock().await;

        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(text.lines().map(str::to_string).collect()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}
