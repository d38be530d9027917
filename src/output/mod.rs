//! Output module for the crawl report
//!
//! This module handles:
//! - Rendering the per-URL lines, status breakdown and summary
//! - Printing the report to the terminal with flagged pages highlighted

mod report;
mod terminal;

pub use report::{render, Report, ReportLine};
pub use terminal::{print_report, write_report};
