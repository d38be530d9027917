use crate::state::PageStatus;
use crate::{CrawlError, Result};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Outcome of one claimed URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRecord {
    /// Absolute URL (the frontier key)
    pub url: String,

    /// Current status; `Pending` until the fetch completes
    pub status: PageStatus,

    /// Time taken by the fetch
    pub latency: Duration,

    /// Failure reason for `PageStatus::Failed` records
    pub error: Option<String>,
}

impl CrawlRecord {
    fn pending(url: &str) -> Self {
        Self {
            url: url.to_string(),
            status: PageStatus::Pending,
            latency: Duration::ZERO,
            error: None,
        }
    }
}

#[derive(Debug, Default)]
struct FrontierInner {
    records: HashMap<String, CrawlRecord>,
    tally: BTreeMap<PageStatus, u64>,
}

/// Every URL ever claimed during a run, with its outcome and a status tally
///
/// All decisions and writes happen inside one lock acquisition per operation:
/// `claim` is a single test-and-insert, and `record` writes the outcome and bumps
/// the tally together. Presence of a key, pending or not, is what prevents a second
/// fetch of the same URL.
#[derive(Debug, Default)]
pub struct Frontier {
    inner: Mutex<FrontierInner>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FrontierInner> {
        // Critical sections never leave the maps half-updated, so a poisoned lock
        // still guards consistent data.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Claims `url` for fetching
    ///
    /// # Returns
    ///
    /// * `true` - The URL was absent; a pending placeholder now holds it and the
    ///   caller owns the fetch
    /// * `false` - The URL was already claimed or fetched; do nothing
    pub fn claim(&self, url: &str) -> bool {
        let mut inner = self.lock();
        if inner.records.contains_key(url) {
            return false;
        }
        inner
            .records
            .insert(url.to_string(), CrawlRecord::pending(url));
        true
    }

    /// Records the HTTP status of a completed fetch
    pub fn record(&self, url: &str, status: u16, latency: Duration) -> Result<()> {
        self.finish(url, PageStatus::Http(status), latency, None)
    }

    /// Records a fetch that produced no usable response
    pub fn record_failure(
        &self,
        url: &str,
        reason: impl Into<String>,
        latency: Duration,
    ) -> Result<()> {
        self.finish(url, PageStatus::Failed, latency, Some(reason.into()))
    }

    fn finish(
        &self,
        url: &str,
        status: PageStatus,
        latency: Duration,
        error: Option<String>,
    ) -> Result<()> {
        let mut inner = self.lock();
        let record = inner
            .records
            .get_mut(url)
            .ok_or_else(|| CrawlError::UnclaimedUrl {
                url: url.to_string(),
            })?;

        if record.status.is_terminal() {
            return Err(CrawlError::AlreadyRecorded {
                url: url.to_string(),
            });
        }

        record.status = status;
        record.latency = latency;
        record.error = error;
        *inner.tally.entry(status).or_insert(0) += 1;
        Ok(())
    }

    /// Returns true if `url` has been claimed
    pub fn contains(&self, url: &str) -> bool {
        self.lock().records.contains_key(url)
    }

    /// Number of claimed URLs
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    /// Returns true if nothing has been claimed
    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    /// Number of claimed URLs whose fetch has not completed
    pub fn pending_count(&self) -> usize {
        self.lock()
            .records
            .values()
            .filter(|r| !r.status.is_terminal())
            .count()
    }

    /// Copy of every record, sorted by URL
    pub fn snapshot(&self) -> Vec<CrawlRecord> {
        let mut records: Vec<CrawlRecord> = self.lock().records.values().cloned().collect();
        records.sort_by(|a, b| a.url.cmp(&b.url));
        records
    }

    /// Copy of the per-status tally
    pub fn tally(&self) -> BTreeMap<PageStatus, u64> {
        self.lock().tally.clone()
    }
}
