//! Outstanding-work accounting for the crawl barrier

use std::sync::Arc;
use tokio::sync::watch;

/// Counts claimed URLs whose unit of work has not finished
///
/// The count goes up when a URL is enqueued and down when the [`WorkGuard`] issued
/// for it is dropped, so queued and in-flight work are both covered. The crawl is
/// over exactly when the count is zero.
#[derive(Debug)]
pub struct WorkTracker {
    outstanding: Arc<watch::Sender<usize>>,
}

impl WorkTracker {
    /// Creates a tracker with no outstanding work
    pub fn new() -> Self {
        let (outstanding, _) = watch::channel(0);
        Self {
            outstanding: Arc::new(outstanding),
        }
    }

    /// Registers one unit of work and returns the guard that completes it
    pub fn begin(&self) -> WorkGuard {
        self.outstanding.send_modify(|n| *n += 1);
        WorkGuard {
            outstanding: Arc::clone(&self.outstanding),
        }
    }

    /// Current number of outstanding units
    pub fn outstanding(&self) -> usize {
        *self.outstanding.borrow()
    }

    /// Waits until no work is outstanding
    pub async fn wait_idle(&self) {
        let mut rx = self.outstanding.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait
        let _ = rx.wait_for(|n| *n == 0).await;
    }
}

impl Default for WorkTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Marks one unit of work complete when dropped
#[derive(Debug)]
pub struct WorkGuard {
    outstanding: Arc<watch::Sender<usize>>,
}

impl Drop for WorkGuard {
    fn drop(&mut self) {
        self.outstanding.send_modify(|n| *n = n.saturating_sub(1));
    }
}
