//! Crawler coordinator - main crawl orchestration logic
//!
//! This module wires the pieces of one run together:
//! - Resolving the entry point (seed page or sitemap)
//! - Expanding the sitemap tree before any page is fetched
//! - Running the scheduler until all discovered work is done
//! - Snapshotting the frontier for the report

use crate::config::{entry_point, validate, Config, EntryPoint};
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::scheduler::{Scheduler, SchedulerOptions};
use crate::crawler::sitemap::{SitemapExpander, SitemapStats};
use crate::state::{CrawlRecord, Frontier, PageStatus};
use crate::Result;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Everything a finished crawl produced
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// One record per claimed URL, ordered by URL
    pub records: Vec<CrawlRecord>,

    /// Number of finished records per status
    pub tally: BTreeMap<PageStatus, u64>,

    /// Sitemap counters; `None` for a seed-page crawl
    pub sitemap: Option<SitemapStats>,

    /// Wall-clock time of the whole run
    pub elapsed: Duration,
}

/// Main crawler coordinator structure
pub struct Coordinator<F: Fetcher> {
    scheduler: Scheduler<F>,
    entry: EntryPoint,
}

impl Coordinator<HttpFetcher> {
    /// Creates a coordinator that fetches over HTTP
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Configuration is valid and the client was built
    /// * `Err(CrawlError)` - Invalid configuration or client construction failure
    pub fn from_config(config: &Config) -> Result<Self> {
        validate(config)?;
        let entry = entry_point(&config.crawler)?;
        let fetcher = HttpFetcher::new(&config.crawler, &config.request)?;
        Ok(Self::new(fetcher, entry, SchedulerOptions::from(&config.crawler)))
    }
}

impl<F: Fetcher> Coordinator<F> {
    /// Creates a coordinator around any fetcher
    pub fn new(fetcher: F, entry: EntryPoint, options: SchedulerOptions) -> Self {
        Self {
            scheduler: Scheduler::new(fetcher, Arc::new(Frontier::new()), options),
            entry,
        }
    }

    /// Runs the crawl to completion
    ///
    /// Only a failure to read the root sitemap ends the run early; every per-page
    /// failure is part of the returned records.
    pub async fn run(mut self) -> Result<CrawlOutcome> {
        let started = Instant::now();

        let sitemap = match &self.entry {
            EntryPoint::Seed(seed) => {
                tracing::info!("Starting crawl at {}", seed);
                self.scheduler.enqueue(seed.clone());
                None
            }
            EntryPoint::Sitemap(root) => {
                tracing::info!("Starting crawl from sitemap {}", root);
                let stats = SitemapExpander::new().expand(&self.scheduler, root).await?;
                Some(stats)
            }
        };

        self.scheduler.run().await?;

        let frontier = self.scheduler.frontier();
        let outcome = CrawlOutcome {
            records: frontier.snapshot(),
            tally: frontier.tally(),
            sitemap,
            elapsed: started.elapsed(),
        };

        tracing::info!(
            "Crawl finished: {} pages in {:.2?}",
            outcome.records.len(),
            outcome.elapsed
        );
        Ok(outcome)
    }
}

/// Runs a complete crawl operation over HTTP
///
/// # Arguments
///
/// * `config` - The crawler configuration, CLI overrides already applied
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Crawl completed
/// * `Err(CrawlError)` - Invalid configuration or unreadable root sitemap
pub async fn run_crawl(config: &Config) -> Result<CrawlOutcome> {
    Coordinator::from_config(config)?.run().await
}
