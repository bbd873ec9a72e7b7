use crate::downloader::test_helpers::{MockFetcher, create_test_downloader, tasks_in};
use crate::downloader::BatchDownloader;
use crate::progress_log::ProgressLog;
use crate::types::Event;
use std::sync::Arc;
use std::time::Duration;

fn drain(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn events_cover_start_finish_and_batch_summary() {
    let fetcher = Arc::new(MockFetcher::new(Duration::ZERO).failing_on("https://bad"));
    let (downloader, temp) = create_test_downloader(fetcher);
    let mut rx = downloader.subscribe();

    downloader
        .run(tasks_in(temp.path(), &["https://ok", "https://bad"]), 2)
        .await;

    let events = drain(&mut rx);

    let started = events
        .iter()
        .filter(|e| matches!(e, Event::TaskStarted { .. }))
        .count();
    assert_eq!(started, 2);
    assert!(events.iter().any(
        |e| matches!(e, Event::TaskCompleted { url, .. } if url == "https://ok")
    ));
    assert!(events.iter().any(
        |e| matches!(e, Event::TaskFailed { url, .. } if url == "https://bad")
    ));
    assert_eq!(
        events.last(),
        Some(&Event::BatchCompleted {
            succeeded: 1,
            failed: 1
        })
    );
}

#[tokio::test]
async fn progress_log_failure_keeps_success_and_is_reported() {
    let temp = tempfile::TempDir::new().unwrap();
    // A directory cannot be appended to
    let log = Arc::new(ProgressLog::new(temp.path()));
    let downloader = BatchDownloader::new(Arc::new(MockFetcher::new(Duration::ZERO)), log);
    let mut rx = downloader.subscribe();

    let outcomes = downloader
        .run(tasks_in(temp.path(), &["https://a"]), 1)
        .await;

    assert!(outcomes[0].is_success());
    assert!(outcomes[0].path().unwrap().is_file());

    let events = drain(&mut rx);
    assert!(events.iter().any(
        |e| matches!(e, Event::ProgressLogFailed { url, .. } if url == "https://a")
    ));
    assert!(events.iter().any(|e| matches!(e, Event::TaskCompleted { .. })));
}

#[tokio::test]
async fn running_without_subscribers_is_fine() {
    let (downloader, temp) = create_test_downloader(Arc::new(MockFetcher::new(Duration::ZERO)));

    let outcomes = downloader.run(tasks_in(temp.path(), &["https://a"]), 1).await;

    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_success());
}
