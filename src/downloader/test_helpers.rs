//! Shared test helpers: scripted fetchers and a downloader wired to a temp directory.

use crate::downloader::BatchDownloader;
use crate::fetch::{DownloadOptions, FetchReport, MediaFetcher};
use crate::progress_log::ProgressLog;
use crate::types::Task;
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;

/// Fetcher that sleeps, then writes one file per URL into the task's directory
///
/// Tracks how many fetches ran at once so tests can check the concurrency bound.
pub(crate) struct MockFetcher {
    delay: Duration,
    fail_urls: HashSet<String>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

impl MockFetcher {
    pub(crate) fn new(delay: Duration) -> Self {
        Self {
            delay,
            fail_urls: HashSet::new(),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Make fetches of `url` fail after the delay
    pub(crate) fn failing_on(mut self, url: &str) -> Self {
        self.fail_urls.insert(url.to_string());
        self
    }

    pub(crate) fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// File name the mock writes for `url`
pub(crate) fn file_name_for(url: &str) -> String {
    let stem: String = url
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{stem}.mp4")
}

#[async_trait]
impl MediaFetcher for MockFetcher {
    async fn extract_and_download(
        &self,
        url: &str,
        options: &DownloadOptions,
    ) -> crate::Result<FetchReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_urls.contains(url) {
            return Err(crate::Error::ExternalTool("simulated failure".into()));
        }

        let dir = options
            .output_template
            .parent()
            .unwrap_or_else(|| Path::new("."));
        let path = dir.join(file_name_for(url));
        tokio::fs::write(&path, url.as_bytes()).await?;

        Ok(FetchReport {
            produced_files: vec![path],
            nominal_filename: None,
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Fetcher whose downloads never finish
pub(crate) struct StalledFetcher {
    started: AtomicUsize,
}

impl StalledFetcher {
    pub(crate) fn new() -> Self {
        Self {
            started: AtomicUsize::new(0),
        }
    }

    pub(crate) fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaFetcher for StalledFetcher {
    async fn extract_and_download(
        &self,
        _url: &str,
        _options: &DownloadOptions,
    ) -> crate::Result<FetchReport> {
        self.started.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }

    fn name(&self) -> &'static str {
        "stalled"
    }
}

/// Downloader with its progress log inside a fresh temp dir.
/// Returns the downloader and the tempdir (which must be kept alive).
pub(crate) fn create_test_downloader(fetcher: Arc<dyn MediaFetcher>) -> (BatchDownloader, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let log = Arc::new(ProgressLog::new(temp_dir.path().join("downloads.txt")));
    (BatchDownloader::new(fetcher, log), temp_dir)
}

/// Video tasks for `urls`, each with its own directory under `root`
pub(crate) fn tasks_in(root: &Path, urls: &[&str]) -> Vec<Task> {
    urls.iter()
        .enumerate()
        .map(|(i, url)| Task::new(*url).target_dir(root.join(format!("task-{i}"))))
        .collect()
}
