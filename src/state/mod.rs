//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageStatus`: The status of a claimed page (pending, HTTP code, failed)
//! - `Frontier`: The dedup set mapping each claimed URL to its `CrawlRecord`, plus
//!   the per-status tally

mod frontier;
mod page_status;

// Re-export main types
pub use frontier::{CrawlRecord, Frontier};
pub use page_status::PageStatus;
