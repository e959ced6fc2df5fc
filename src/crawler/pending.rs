//! Quiescence detection for the crawl pipeline
//!
//! Every URL placed on the download queue is counted as pending until the
//! worker that finishes with it says so. Children are counted before their
//! parent is released, so the count only reaches zero when no task is queued
//! or being processed anywhere in the pipeline.

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// In-flight task counter with a zero-reached signal
#[derive(Debug, Default)]
pub struct PendingWork {
    count: AtomicUsize,
    idle: Notify,
}

impl PendingWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a task about to be enqueued
    pub fn add(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    /// Marks a task as fully processed
    pub fn done(&self) {
        let previous = self.count.fetch_sub(1, Ordering::SeqCst);
        debug_assert!(previous > 0, "PendingWork::done called more often than add");
        if previous == 1 {
            self.idle.notify_one();
        }
    }

    /// Number of tasks currently in flight
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Waits until no task is in flight
    ///
    /// Meant for a single waiter (the coordinator).
    pub async fn wait_idle(&self) {
        while self.count() > 0 {
            self.idle.notified().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_idle_when_nothing_added() {
        let pending = PendingWork::new();
        tokio::time::timeout(Duration::from_millis(100), pending.wait_idle())
            .await
            .expect("should already be idle");
    }

    #[tokio::test]
    async fn test_waits_for_children_before_idle() {
        let pending = Arc::new(PendingWork::new());
        pending.add();

        let worker = {
            let pending = Arc::clone(&pending);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                // Parent discovers a child before finishing itself
                pending.add();
                pending.done();
                tokio::time::sleep(Duration::from_millis(20)).await;
                pending.done();
            })
        };

        tokio::time::timeout(Duration::from_secs(1), pending.wait_idle())
            .await
            .expect("should become idle");
        assert_eq!(pending.count(), 0);
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_notification_before_wait_is_not_lost() {
        let pending = PendingWork::new();
        pending.add();
        pending.done();
        tokio::time::timeout(Duration::from_millis(100), pending.wait_idle())
            .await
            .expect("zero reached before waiting");
    }

    #[tokio::test]
    async fn test_not_idle_while_work_remains() {
        let pending = PendingWork::new();
        pending.add();
        let result = tokio::time::timeout(Duration::from_millis(50), pending.wait_idle()).await;
        assert!(result.is_err());
    }
}
