//! No-op fetcher for graceful degradation

use super::options::DownloadOptions;
use super::traits::{FetchReport, MediaFetcher};
use async_trait::async_trait;

/// Fetcher used when no yt-dlp binary is available or configured
///
/// Every fetch fails with `Error::NotSupported`, so a batch still completes with one
/// failure per task instead of aborting.
///
/// # Examples
///
/// ```
/// use media_batch_dl::fetch::{DownloadOptions, MediaFetcher, NoOpFetcher};
/// use media_batch_dl::Quality;
/// use std::path::Path;
///
/// # #[tokio::main]
/// # async fn main() {
/// let options = DownloadOptions::new(Path::new("out"), false, Quality::Highest, None);
/// let result = NoOpFetcher.extract_and_download("https://example.com", &options).await;
/// assert!(result.is_err());
/// # }
/// ```
pub struct NoOpFetcher;

#[async_trait]
impl MediaFetcher for NoOpFetcher {
    async fn extract_and_download(
        &self,
        _url: &str,
        _options: &DownloadOptions,
    ) -> crate::Result<FetchReport> {
        Err(crate::Error::NotSupported(
            "media downloads require the external yt-dlp binary. \
             Configure ytdlp_path in config or ensure yt-dlp is in PATH."
                .into(),
        ))
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
