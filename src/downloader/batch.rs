//! Bounded-concurrency batch execution

use super::BatchDownloader;
use crate::error::Error;
use crate::fetch::fetch_task;
use crate::types::{DownloadOutcome, Event, Task};
use futures::stream::{self, StreamExt};

/// Number of tasks allowed to run at once
///
/// This is `min(max_concurrency, task_count)`. A cap of zero still lets one task run at
/// a time so a non-empty batch always makes progress; an empty batch needs no workers.
pub fn effective_concurrency(max_concurrency: usize, task_count: usize) -> usize {
    if task_count == 0 {
        return 0;
    }
    max_concurrency.min(task_count).max(1)
}

impl BatchDownloader {
    /// Run every task and return one outcome per task
    ///
    /// At most [`effective_concurrency`] downloads run at once. Outcomes are returned in
    /// completion order, not input order.
    pub async fn run(&self, tasks: Vec<Task>, max_concurrency: usize) -> Vec<DownloadOutcome> {
        let total = tasks.len();
        let concurrency = effective_concurrency(max_concurrency, total);

        tracing::info!(
            tasks = total,
            concurrency,
            fetcher = self.fetcher.name(),
            "Starting batch"
        );

        let outcomes: Vec<DownloadOutcome> = if total == 0 {
            Vec::new()
        } else {
            stream::iter(tasks)
                .map(|task| self.run_task(task))
                .buffer_unordered(concurrency)
                .collect()
                .await
        };

        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        let failed = outcomes.len() - succeeded;

        tracing::info!(succeeded, failed, "Batch completed");
        self.emit_event(Event::BatchCompleted { succeeded, failed });

        outcomes
    }

    /// Run one task to its outcome; errors never escape
    async fn run_task(&self, task: Task) -> DownloadOutcome {
        if self.is_cancelled() {
            return self.fail(task.url, Error::Cancelled);
        }

        self.emit_event(Event::TaskStarted {
            url: task.url.clone(),
        });
        tracing::debug!(url = %task.url, audio = task.only_audio, quality = %task.quality, "Task started");

        let fetch = fetch_task(self.fetcher.as_ref(), &task);
        let result = match &self.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(Error::Cancelled),
                result = fetch => result,
            },
            None => fetch.await,
        };

        match result {
            Ok(path) => {
                if let Err(e) = self.progress_log.append(&task.url).await {
                    tracing::error!(url = %task.url, error = %e, "Downloaded file could not be recorded");
                    self.emit_event(Event::ProgressLogFailed {
                        url: task.url.clone(),
                        error: e.to_string(),
                    });
                }

                tracing::info!(url = %task.url, path = %path.display(), "Download completed");
                self.emit_event(Event::TaskCompleted {
                    url: task.url.clone(),
                    path: path.clone(),
                });

                DownloadOutcome::Success {
                    url: task.url,
                    path,
                }
            }
            Err(e) => self.fail(task.url, e),
        }
    }

    fn fail(&self, url: String, error: Error) -> DownloadOutcome {
        let error = error.to_string();

        tracing::warn!(url = %url, error = %error, "Download failed");
        self.emit_event(Event::TaskFailed {
            url: url.clone(),
            error: error.clone(),
        });

        DownloadOutcome::Failure { url, error }
    }
}
