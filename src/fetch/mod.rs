//! Media fetch adapter
//!
//! This module wraps the external media provider behind the [`MediaFetcher`] trait and
//! turns a provider invocation into a single resolved output path.
//!
//! ## Architecture
//!
//! - [`YtDlpFetcher`]: runs the external `yt-dlp` binary
//! - [`NoOpFetcher`]: stub used when yt-dlp is unavailable; every fetch fails
//! - [`fetch_media`]: validation, directory creation, option building, provider call and
//!   [output resolution](resolve_output)
//!
//! ## Usage
//!
//! ```no_run
//! use media_batch_dl::fetch::{YtDlpFetcher, fetch_audio};
//! use media_batch_dl::Quality;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetcher = YtDlpFetcher::from_path().expect("yt-dlp binary not found");
//!
//!     let path = fetch_audio(
//!         &fetcher,
//!         "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
//!         Path::new("./music"),
//!         Quality::Highest,
//!         Some("never-gonna"),
//!     )
//!     .await?;
//!     println!("saved to {}", path.display());
//!     Ok(())
//! }
//! ```

mod cli;
mod noop;
mod options;
mod parser;
mod resolve;
mod traits;

pub use cli::YtDlpFetcher;
pub use noop::NoOpFetcher;
pub use options::{
    AUDIO_CODEC, AUDIO_QUALITY_KBPS, DownloadOptions, FetchPolicy, PostProcessor,
    VIDEO_CONTAINER,
};
pub use parser::{ExitStatus, parse_ytdlp_output};
pub use resolve::resolve_output;
pub use traits::{FetchReport, MediaFetcher};

use crate::config::ToolsConfig;
use crate::error::Result;
use crate::types::{Quality, Task, validate_url};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Download one URL and return the path of the produced file
///
/// The URL is validated before any I/O. The target directory is created if needed.
/// Provider and resolution errors carry the URL in their message.
pub async fn fetch_media(
    fetcher: &dyn MediaFetcher,
    url: &str,
    target_dir: &Path,
    only_audio: bool,
    quality: Quality,
    title: Option<&str>,
) -> Result<PathBuf> {
    validate_url(url)?;

    tokio::fs::create_dir_all(target_dir)
        .await
        .map_err(|e| crate::Error::from(e).with_url(url))?;

    let options = DownloadOptions::new(target_dir, only_audio, quality, title);

    let report = fetcher
        .extract_and_download(url, &options)
        .await
        .map_err(|e| e.with_url(url))?;

    let path = resolve_output(url, &report, target_dir).map_err(|e| e.with_url(url))?;

    tracing::debug!(url = %url, path = %path.display(), fetcher = fetcher.name(), "Resolved output file");
    Ok(path)
}

/// [`fetch_media`] for a [`Task`]
pub async fn fetch_task(fetcher: &dyn MediaFetcher, task: &Task) -> Result<PathBuf> {
    fetch_media(
        fetcher,
        &task.url,
        &task.target_dir,
        task.only_audio,
        task.quality,
        task.title.as_deref(),
    )
    .await
}

/// Download the audio track of `url`, converted to mp3
pub async fn fetch_audio(
    fetcher: &dyn MediaFetcher,
    url: &str,
    target_dir: &Path,
    quality: Quality,
    title: Option<&str>,
) -> Result<PathBuf> {
    fetch_media(fetcher, url, target_dir, true, quality, title).await
}

/// Download `url` as an mp4 video
pub async fn fetch_video(
    fetcher: &dyn MediaFetcher,
    url: &str,
    target_dir: &Path,
    quality: Quality,
    title: Option<&str>,
) -> Result<PathBuf> {
    fetch_media(fetcher, url, target_dir, false, quality, title).await
}

/// Pick a fetcher from the tools configuration
///
/// An explicit `ytdlp_path` always wins; otherwise PATH is searched when
/// `search_path` is set. Without a binary the [`NoOpFetcher`] is used so batches still
/// complete (with every task failing).
pub fn fetcher_from_config(tools: &ToolsConfig) -> Arc<dyn MediaFetcher> {
    let cli = if let Some(ref path) = tools.ytdlp_path {
        Some(YtDlpFetcher::new(path.clone()))
    } else if tools.search_path {
        YtDlpFetcher::from_path()
    } else {
        None
    };

    let fetcher: Arc<dyn MediaFetcher> = match cli {
        Some(mut fetcher) => {
            fetcher = fetcher.with_leading_args(tools.ytdlp_args.iter().cloned());
            if let Some(ref ffmpeg) = tools.ffmpeg_path {
                fetcher = fetcher.with_ffmpeg_location(ffmpeg.clone());
            }
            Arc::new(fetcher)
        }
        None => {
            tracing::warn!("yt-dlp not found; every download will fail until it is configured");
            Arc::new(NoOpFetcher)
        }
    };

    tracing::info!(fetcher = fetcher.name(), "Media fetcher initialized");
    fetcher
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Writes `file_name` into the template's directory and reports it (or not)
    struct WritingFetcher {
        file_name: &'static str,
        report_files: bool,
        calls: AtomicUsize,
        seen: Mutex<Vec<DownloadOptions>>,
    }

    impl WritingFetcher {
        fn new(file_name: &'static str, report_files: bool) -> Self {
            Self {
                file_name,
                report_files,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MediaFetcher for WritingFetcher {
        async fn extract_and_download(
            &self,
            _url: &str,
            options: &DownloadOptions,
        ) -> crate::Result<FetchReport> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(options.clone());

            let dir = options.output_template.parent().unwrap();
            let path = dir.join(self.file_name);
            std::fs::write(&path, b"media")?;

            Ok(FetchReport {
                produced_files: if self.report_files {
                    vec![path]
                } else {
                    vec![]
                },
                nominal_filename: None,
            })
        }

        fn name(&self) -> &'static str {
            "writing"
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl MediaFetcher for FailingFetcher {
        async fn extract_and_download(
            &self,
            _url: &str,
            _options: &DownloadOptions,
        ) -> crate::Result<FetchReport> {
            Err(crate::Error::ExternalTool("network unreachable".into()))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    #[tokio::test]
    async fn blank_url_fails_before_any_io() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("not-created");
        let fetcher = WritingFetcher::new("x.mp4", true);

        let err = fetch_media(&fetcher, "   ", &target, false, Quality::Highest, None)
            .await
            .unwrap_err();

        assert!(matches!(err, crate::Error::InvalidInput(_)));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert!(!target.exists(), "target dir must not be created for invalid input");
    }

    #[tokio::test]
    async fn creates_nested_target_dir_and_returns_reported_file() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("a").join("b");
        let fetcher = WritingFetcher::new("song.mp3", true);

        let path = fetch_audio(&fetcher, "https://y/1", &target, Quality::Lowest, Some("song"))
            .await
            .unwrap();

        assert_eq!(path, target.join("song.mp3"));
        assert!(target.is_dir());

        let seen = fetcher.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].format, "worstaudio");
        assert!(seen[0].is_audio());
    }

    #[tokio::test]
    async fn unreported_file_is_found_by_listing() {
        let temp = TempDir::new().unwrap();
        let fetcher = WritingFetcher::new("Provider Title.mp4", false);

        let path = fetch_video(&fetcher, "https://y/2", temp.path(), Quality::Highest, None)
            .await
            .unwrap();

        assert_eq!(path, temp.path().join("Provider Title.mp4"));
    }

    #[tokio::test]
    async fn provider_errors_are_wrapped_with_url() {
        let temp = TempDir::new().unwrap();

        let err = fetch_media(&FailingFetcher, "https://y/3", temp.path(), false, Quality::Highest, None)
            .await
            .unwrap_err();

        match err {
            crate::Error::Fetch { url, message } => {
                assert_eq!(url, "https://y/3");
                assert!(message.contains("network unreachable"));
            }
            other => panic!("expected Fetch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_task_uses_task_fields() {
        let temp = TempDir::new().unwrap();
        let fetcher = WritingFetcher::new("t.mp4", true);
        let task = Task::new("https://y/4")
            .target_dir(temp.path())
            .quality(Quality::Lowest)
            .title("t");

        let path = fetch_task(&fetcher, &task).await.unwrap();

        assert_eq!(path, temp.path().join("t.mp4"));
        let seen = fetcher.seen.lock().unwrap();
        assert_eq!(seen[0].output_template, temp.path().join("t.mp4"));
    }

    #[test]
    fn config_without_binary_or_search_uses_noop() {
        let tools = ToolsConfig {
            search_path: false,
            ..ToolsConfig::default()
        };
        assert_eq!(fetcher_from_config(&tools).name(), "noop");
    }

    #[test]
    fn config_with_explicit_binary_uses_cli() {
        let tools = ToolsConfig {
            ytdlp_path: Some(PathBuf::from("/opt/yt-dlp")),
            search_path: false,
            ..ToolsConfig::default()
        };
        assert_eq!(fetcher_from_config(&tools).name(), "cli-yt-dlp");
    }
}
