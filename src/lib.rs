//! # media-batch-dl
//!
//! Batch downloader for online video and audio, driving the external `yt-dlp` tool.
//!
//! ## Design Philosophy
//!
//! media-batch-dl is designed to be:
//! - **Bounded** - A batch never runs more downloads at once than its worker cap
//! - **Failure-isolated** - One broken URL never stops the rest of the batch
//! - **Durable** - Every finished download is appended to a progress log as it completes
//! - **Event-driven** - Consumers subscribe to events, no polling required
//!
//! ## Quick Start
//!
//! ```no_run
//! use media_batch_dl::{BatchDownloader, Config, task_source};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config {
//!         max_concurrent_downloads: 4,
//!         ..Default::default()
//!     };
//!     let downloader = BatchDownloader::from_config(&config);
//!
//!     // Subscribe to events
//!     let mut events = downloader.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let tasks = task_source::load_tasks("configuration.json");
//!     for outcome in downloader.run(tasks, config.max_concurrent_downloads).await {
//!         println!("{outcome}");
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Batch orchestration with bounded concurrency
pub mod downloader;
/// Error types
pub mod error;
/// yt-dlp adapter and output resolution
pub mod fetch;
/// Append-only record of completed downloads
pub mod progress_log;
/// Task lists from batch configuration files
pub mod task_source;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use config::{BatchConfig, Config, TaskDefaults, ToolsConfig};
pub use downloader::{BatchDownloader, effective_concurrency};
pub use error::{Error, Result};
pub use fetch::{MediaFetcher, NoOpFetcher, YtDlpFetcher, fetch_audio, fetch_video};
pub use progress_log::ProgressLog;
pub use types::{DownloadOutcome, Event, Quality, Task};

use tokio_util::sync::CancellationToken;

/// Token that is cancelled when the process receives a termination signal.
///
/// Pass it to [`BatchDownloader::with_cancellation`] so Ctrl+C stops running downloads
/// (and their yt-dlp processes) while every task still gets an outcome.
///
/// On Unix both SIGTERM and SIGINT count; elsewhere only Ctrl+C does.
///
/// Must be called from within a Tokio runtime.
///
/// # Example
///
/// ```no_run
/// use media_batch_dl::{BatchDownloader, Config, cancel_on_shutdown_signal};
///
/// #[tokio::main]
/// async fn main() {
///     let downloader = BatchDownloader::from_config(&Config::default())
///         .with_cancellation(cancel_on_shutdown_signal());
///     let outcomes = downloader.run(Vec::new(), 10).await;
///     assert!(outcomes.is_empty());
/// }
/// ```
pub fn cancel_on_shutdown_signal() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::info!("Cancelling remaining downloads");
        trigger.cancel();
    });

    token
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = sigterm.recv() => tracing::info!("Received SIGTERM"),
                Ok(()) = tokio::signal::ctrl_c() => tracing::info!("Received SIGINT"),
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "SIGTERM handler unavailable, listening for Ctrl+C only");
            wait_for_ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C"),
        Err(e) => {
            tracing::error!(error = %e, "Cannot listen for Ctrl+C, downloads run to completion");
            std::future::pending::<()>().await;
        }
    }
}
