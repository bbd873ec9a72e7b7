//! Traits and types for media fetch providers

use super::options::DownloadOptions;
use async_trait::async_trait;
use std::path::PathBuf;

/// What a provider reports about one invocation
#[must_use]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// Files the provider says it produced (after post-processing)
    pub produced_files: Vec<PathBuf>,
    /// Output path the provider intended to write, as it printed it (yt-dlp prints the
    /// full path built from the output template)
    pub nominal_filename: Option<String>,
}

/// Trait for media fetch providers
///
/// A provider downloads (and post-processes) the media behind a URL according to
/// [`DownloadOptions`]. Retries, timeouts and resume live inside the provider; callers
/// see a single success or failure per invocation.
///
/// # Examples
///
/// ```no_run
/// use media_batch_dl::fetch::{DownloadOptions, MediaFetcher, YtDlpFetcher};
/// use media_batch_dl::Quality;
/// use std::path::Path;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = YtDlpFetcher::from_path().expect("yt-dlp binary not found");
///
/// let options = DownloadOptions::new(Path::new("./downloads"), true, Quality::Highest, None);
/// let report = fetcher
///     .extract_and_download("https://www.youtube.com/watch?v=dQw4w9WgXcQ", &options)
///     .await?;
/// println!("produced: {:?}", report.produced_files);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Download `url` with the given options
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The provider cannot be started (for CLI implementations)
    /// - The provider reports a network, format, decode or post-processing failure
    /// - The operation is not supported (for stub implementations)
    async fn extract_and_download(
        &self,
        url: &str,
        options: &DownloadOptions,
    ) -> crate::Result<FetchReport>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
