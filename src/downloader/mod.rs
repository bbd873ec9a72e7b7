//! Batch download orchestration
//!
//! [`BatchDownloader`] runs a list of [`Task`](crate::Task)s with bounded concurrency:
//! - [`batch`] - the worker pool, per-task execution and the concurrency bound
//!
//! Every task yields exactly one [`DownloadOutcome`](crate::DownloadOutcome); a failing
//! task never stops its siblings. Successful URLs are appended to the shared
//! [`ProgressLog`].

mod batch;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use batch::effective_concurrency;

use crate::config::Config;
use crate::fetch::{MediaFetcher, fetcher_from_config};
use crate::progress_log::ProgressLog;
use crate::types::Event;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Capacity of the event channel; slower subscribers see `RecvError::Lagged`
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Runs batches of downloads against one fetcher and one progress log
///
/// Cloning is cheap: the fetcher, progress log and event channel are shared.
///
/// # Examples
///
/// ```no_run
/// use media_batch_dl::{BatchDownloader, Config, task_source};
///
/// #[tokio::main]
/// async fn main() {
///     let config = Config::default();
///     let downloader = BatchDownloader::from_config(&config);
///
///     let tasks = task_source::load_tasks("configuration.json");
///     for outcome in downloader.run(tasks, config.max_concurrent_downloads).await {
///         println!("{outcome}");
///     }
/// }
/// ```
#[derive(Clone)]
pub struct BatchDownloader {
    fetcher: Arc<dyn MediaFetcher>,
    progress_log: Arc<ProgressLog>,
    event_tx: broadcast::Sender<Event>,
    cancel: Option<CancellationToken>,
}

impl BatchDownloader {
    /// Create a downloader from an explicit fetcher and progress log
    pub fn new(fetcher: Arc<dyn MediaFetcher>, progress_log: Arc<ProgressLog>) -> Self {
        let (event_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            fetcher,
            progress_log,
            event_tx,
            cancel: None,
        }
    }

    /// Create a downloader from runtime configuration
    ///
    /// The fetcher is chosen by [`fetcher_from_config`]; the progress log is
    /// `config.progress_log`.
    pub fn from_config(config: &Config) -> Self {
        let fetcher = fetcher_from_config(&config.tools);
        let progress_log = Arc::new(ProgressLog::new(config.progress_log.clone()));
        Self::new(fetcher, progress_log)
    }

    /// Stop the batch when `token` is cancelled
    ///
    /// Tasks that have not started fail with "cancelled" without touching the network
    /// or disk. Running fetches are dropped (killing the yt-dlp child) and fail the
    /// same way.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Subscribe to batch events
    ///
    /// Multiple subscribers are supported. Each subscriber receives all events
    /// independently.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use media_batch_dl::{BatchDownloader, Config, Event};
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let downloader = BatchDownloader::from_config(&Config::default());
    ///
    ///     let mut events = downloader.subscribe();
    ///     tokio::spawn(async move {
    ///         while let Ok(event) = events.recv().await {
    ///             if let Event::TaskFailed { url, error } = event {
    ///                 eprintln!("{url}: {error}");
    ///             }
    ///         }
    ///     });
    /// }
    /// ```
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// The fetcher downloads go through
    pub fn fetcher(&self) -> &Arc<dyn MediaFetcher> {
        &self.fetcher
    }

    /// The progress log successful URLs are appended to
    pub fn progress_log(&self) -> &Arc<ProgressLog> {
        &self.progress_log
    }

    /// Emit an event to all subscribers
    ///
    /// If there are no active subscribers, the event is silently dropped.
    pub(crate) fn emit_event(&self, event: Event) {
        self.event_tx.send(event).ok();
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }
}
