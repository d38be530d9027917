//! Instrumented in-memory fetcher for crawl engine tests

use crate::crawler::fetcher::{FetchedPage, Fetcher};
use crate::FetchError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub(crate) enum Response {
    Page { status: u16, body: String },
    Timeout,
}

/// Builds an HTML page with one anchor per link
pub(crate) fn page(status: u16, links: &[&str]) -> Response {
    let anchors: String = links
        .iter()
        .map(|href| format!("<a href=\"{}\">link</a>", href))
        .collect();
    Response::Page {
        status,
        body: format!("<html><body>{}</body></html>", anchors),
    }
}

/// Serves a fixed site graph, counting calls per URL and peak parallelism
#[derive(Debug, Default)]
pub(crate) struct MockFetcher {
    responses: HashMap<String, Response>,
    redirects: HashMap<String, String>,
    delay: Duration,
    calls: Mutex<HashMap<String, usize>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_page(mut self, url: &str, response: Response) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    pub(crate) fn with_body(self, url: &str, status: u16, body: &str) -> Self {
        self.with_page(
            url,
            Response::Page {
                status,
                body: body.to_string(),
            },
        )
    }

    pub(crate) fn with_timeout(self, url: &str) -> Self {
        self.with_page(url, Response::Timeout)
    }

    /// Serves `to`'s response for requests to `from`, as a followed redirect would
    pub(crate) fn with_redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.insert(from.to_string(), to.to_string());
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_insert(0) += 1;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        // Always yield so overlapping units actually overlap
        tokio::time::sleep(self.delay.max(Duration::from_millis(1))).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let final_url = match self.redirects.get(url.as_str()) {
            Some(to) => Url::parse(to).map_err(|e| FetchError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })?,
            None => url.clone(),
        };

        match self.responses.get(final_url.as_str()) {
            Some(Response::Page { status, body }) => Ok(FetchedPage {
                status: *status,
                final_url,
                body: body.clone(),
            }),
            Some(Response::Timeout) => Err(FetchError::Timeout {
                url: url.to_string(),
            }),
            None => Ok(FetchedPage {
                status: 404,
                final_url,
                body: String::new(),
            }),
        }
    }
}
