//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetcher` trait
//! - HTML parsing and same-host link extraction
//! - Bounded-concurrency scheduling with an outstanding-work barrier
//! - Sitemap expansion
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;
mod sitemap;
mod tracker;

#[cfg(test)]
pub(crate) mod test_support;

pub use coordinator::{run_crawl, Coordinator, CrawlOutcome};
pub use fetcher::{build_header_map, build_http_client, FetchedPage, Fetcher, HttpFetcher, USER_AGENT};
pub use parser::extract_links;
pub use scheduler::{Scheduler, SchedulerOptions};
pub use sitemap::{parse_sitemap, SitemapDocument, SitemapExpander, SitemapStats};
pub use tracker::{WorkGuard, WorkTracker};
