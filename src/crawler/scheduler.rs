//! Scheduler for bounded-concurrency crawling
//!
//! This module handles:
//! - Claiming discovered URLs in the frontier before anything is fetched
//! - A work queue of claimed URLs
//! - Global concurrency limiting via a semaphore at admission
//! - Link expansion: every fetched page feeds its same-host links back in
//! - The outstanding-work barrier that ends the run

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::extract_links;
use crate::crawler::tracker::{WorkGuard, WorkTracker};
use crate::state::Frontier;
use crate::url::same_host;
use crate::CrawlError;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use url::Url;

/// Scheduler tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerOptions {
    /// Maximum number of fetch units running at once
    pub max_concurrency: usize,

    /// Log a line for every URL as it begins fetching
    pub verbose: bool,
}

impl From<&CrawlerConfig> for SchedulerOptions {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_concurrency: config.max_concurrency as usize,
            verbose: config.verbose,
        }
    }
}

/// A claimed URL waiting for a concurrency slot
struct Job {
    url: Url,
    guard: WorkGuard,
}

/// State shared by the dispatcher and every unit of work
struct Shared<F> {
    fetcher: F,
    frontier: Arc<Frontier>,
    tracker: WorkTracker,
    queue: mpsc::UnboundedSender<Job>,
    verbose: bool,
}

impl<F: Fetcher> Shared<F> {
    fn enqueue(&self, url: Url) -> bool {
        if !self.frontier.claim(url.as_str()) {
            return false;
        }

        let job = Job {
            guard: self.tracker.begin(),
            url,
        };
        if let Err(mpsc::error::SendError(job)) = self.queue.send(job) {
            // Only possible once the scheduler itself is gone
            tracing::error!("Work queue closed; dropping {}", job.url);
            if let Err(e) = self.frontier.record_failure(
                job.url.as_str(),
                "scheduler stopped",
                std::time::Duration::ZERO,
            ) {
                tracing::error!("Failed to record outcome for {}: {}", job.url, e);
            }
        }
        true
    }

    /// One unit of work: fetch, record, expand
    async fn process(&self, url: &Url) {
        if self.verbose {
            tracing::info!("Crawling: {}", url);
        }

        let started = Instant::now();
        let result = self.fetcher.fetch(url).await;
        let latency = started.elapsed();

        let recorded = match result {
            Ok(page) => {
                let recorded = self.frontier.record(url.as_str(), page.status, latency);
                if same_host(url, &page.final_url) {
                    // Relative links resolve against where the body came from
                    let links = extract_links(&page.body, &page.final_url);
                    tracing::debug!("{} returned {} with {} same-host links", url, page.status, links.len());
                    for link in links {
                        self.enqueue(link);
                    }
                } else {
                    tracing::debug!("{} was served from {}; not expanding", url, page.final_url);
                }
                recorded
            }
            Err(e) => {
                tracing::warn!("Error fetching {}: {}", url, e);
                self.frontier.record_failure(url.as_str(), e.to_string(), latency)
            }
        };

        if let Err(e) = recorded {
            tracing::error!("Failed to record outcome for {}: {}", url, e);
        }
    }
}

/// Scheduler runs one unit of work per claimed URL under a global concurrency cap
///
/// URLs enter through [`Scheduler::enqueue`], which claims them in the frontier and
/// queues them without blocking. [`Scheduler::run`] admits queued URLs as semaphore
/// permits free up and returns once no work is queued or in flight.
///
/// # Example
///
/// ```no_run
/// use sitecrawl::crawler::{HttpFetcher, Scheduler, SchedulerOptions};
/// use sitecrawl::config::Config;
/// use sitecrawl::state::Frontier;
/// use std::sync::Arc;
/// use url::Url;
///
/// # async fn example() -> Result<(), sitecrawl::CrawlError> {
/// let config = Config::default();
/// let fetcher = HttpFetcher::new(&config.crawler, &config.request)?;
/// let options = SchedulerOptions { max_concurrency: 10, verbose: false };
/// let mut scheduler = Scheduler::new(fetcher, Arc::new(Frontier::new()), options);
/// scheduler.start([Url::parse("https://example.com/").unwrap()]).await?;
/// println!("{} pages", scheduler.frontier().len());
/// # Ok(())
/// # }
/// ```
pub struct Scheduler<F: Fetcher> {
    shared: Arc<Shared<F>>,
    queue: mpsc::UnboundedReceiver<Job>,
    semaphore: Arc<Semaphore>,
}

impl<F: Fetcher> Scheduler<F> {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `fetcher` - The fetch capability used for every page
    /// * `frontier` - The dedup set shared with whoever reads the results
    /// * `options` - Concurrency cap and verbosity; a cap of 0 is raised to 1
    pub fn new(fetcher: F, frontier: Arc<Frontier>, options: SchedulerOptions) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            fetcher,
            frontier,
            tracker: WorkTracker::new(),
            queue: tx,
            verbose: options.verbose,
        });

        Self {
            shared,
            queue: rx,
            semaphore: Arc::new(Semaphore::new(options.max_concurrency.max(1))),
        }
    }

    /// Claims `url` and queues it for fetching
    ///
    /// # Returns
    ///
    /// * `true` - The URL was new and is now queued
    /// * `false` - The URL was already claimed; nothing happens
    pub fn enqueue(&self, url: Url) -> bool {
        self.shared.enqueue(url)
    }

    /// Enqueues the seeds and runs until all transitively discovered work is done
    pub async fn start<I>(&mut self, seeds: I) -> Result<(), CrawlError>
    where
        I: IntoIterator<Item = Url>,
    {
        for seed in seeds {
            self.enqueue(seed);
        }
        self.run().await
    }

    /// Runs queued work until the outstanding-work counter drains to zero
    ///
    /// Admission waits for a semaphore permit, so queued URLs are delayed, never
    /// dropped, while the cap is saturated. The permit is held for the whole
    /// fetch, parse and expand cycle.
    pub async fn run(&mut self) -> Result<(), CrawlError> {
        let mut tasks = JoinSet::new();

        loop {
            tokio::select! {
                biased;

                Some(job) = self.queue.recv() => {
                    let permit = Arc::clone(&self.semaphore)
                        .acquire_owned()
                        .await
                        .map_err(|e| CrawlError::Scheduler(e.to_string()))?;
                    tracing::trace!("Admitted {}", job.url);

                    let shared = Arc::clone(&self.shared);
                    tasks.spawn(async move {
                        let Job { url, guard } = job;
                        shared.process(&url).await;
                        drop(permit);
                        drop(guard);
                    });
                }

                Some(joined) = tasks.join_next() => {
                    if let Err(e) = joined {
                        tracing::error!("Crawl task failed: {}", e);
                    }
                }

                _ = self.shared.tracker.wait_idle() => break,
            }
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Crawl task failed: {}", e);
            }
        }

        Ok(())
    }

    /// The frontier this scheduler claims into
    pub fn frontier(&self) -> &Arc<Frontier> {
        &self.shared.frontier
    }

    /// The fetch capability, shared with the sitemap expander
    pub fn fetcher(&self) -> &F {
        &self.shared.fetcher
    }

    /// Number of claimed URLs not yet finished
    pub fn outstanding(&self) -> usize {
        self.shared.tracker.outstanding()
    }
}
