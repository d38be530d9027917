//! Plain-text crawl report

use crate::state::{CrawlRecord, PageStatus};
use reqwest::StatusCode;
use std::collections::BTreeMap;
use std::fmt;

/// One line of the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub text: String,

    /// Non-2xx or failed page; rendered in red on a colour terminal
    pub flagged: bool,
}

impl ReportLine {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            flagged: false,
        }
    }
}

/// The report for a finished crawl
#[derive(Debug, Clone)]
pub struct Report {
    records: Vec<CrawlRecord>,
    tally: BTreeMap<PageStatus, u64>,
}

impl Report {
    /// Creates a report from a frontier snapshot and its tally
    ///
    /// Records are sorted by URL, whatever order they arrive in.
    pub fn new(mut records: Vec<CrawlRecord>, tally: BTreeMap<PageStatus, u64>) -> Self {
        records.sort_by(|a, b| a.url.cmp(&b.url));
        Self { records, tally }
    }

    /// Number of pages listed in the detailed section
    pub fn total_pages(&self) -> usize {
        self.records.len()
    }

    /// Number of pages with a non-2xx status or a failed fetch
    pub fn flagged_pages(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.status.is_flagged())
            .count()
    }

    /// All report lines in output order
    pub fn lines(&self) -> Vec<ReportLine> {
        let mut lines = vec![
            ReportLine::plain("Crawling completed"),
            ReportLine::plain(""),
            ReportLine::plain("Detailed Report:"),
        ];

        for record in &self.records {
            lines.push(ReportLine {
                text: format!(
                    "{} : {} | Response Time: {:?}",
                    record.url,
                    status_text(record),
                    record.latency
                ),
                flagged: record.status.is_flagged(),
            });
        }

        lines.push(ReportLine::plain(""));
        lines.push(ReportLine::plain("Status Breakdown:"));
        for (status, count) in &self.tally {
            let label = match status {
                PageStatus::Http(code) => format!("Status {}", code),
                PageStatus::Failed => "Failed".to_string(),
                PageStatus::Pending => "Pending".to_string(),
            };
            lines.push(ReportLine::plain(format!("{}: {} pages", label, count)));
        }

        lines.push(ReportLine::plain(""));
        lines.push(ReportLine::plain("Summary:"));
        lines.push(ReportLine::plain(format!(
            "Total pages crawled: {}",
            self.total_pages()
        )));
        lines
    }

    /// Renders the report as one string, one line per report line
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line.text)?;
        }
        Ok(())
    }
}

/// Renders a snapshot and tally without keeping the report around
pub fn render(records: Vec<CrawlRecord>, tally: BTreeMap<PageStatus, u64>) -> String {
    Report::new(records, tally).render()
}

fn status_text(record: &CrawlRecord) -> String {
    match record.status {
        PageStatus::Http(code) => match StatusCode::from_u16(code)
            .ok()
            .and_then(|s| s.canonical_reason())
        {
            Some(reason) => format!("{} {}", code, reason),
            None => code.to_string(),
        },
        PageStatus::Failed => match &record.error {
            Some(reason) => format!("FAILED ({})", reason),
            None => "FAILED".to_string(),
        },
        PageStatus::Pending => "PENDING".to_string(),
    }
}
