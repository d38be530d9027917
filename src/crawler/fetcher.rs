//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the per-request timeout
//! - Applying custom headers and basic auth to every request
//! - GET requests returning status and body
//! - Error classification (timeout vs. other request failures)
//!
//! The crawl engine only sees the [`Fetcher`] trait, so tests can substitute an
//! instrumented implementation.

use crate::config::{parse_header_pairs, CrawlerConfig, RequestConfig};
use crate::FetchError;
use crate::url::same_host;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{redirect::Policy, Client};
use std::future::Future;
use std::time::Duration;
use url::Url;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Maximum number of same-host redirects followed for one request
pub const MAX_REDIRECTS: usize = 10;

/// A response that was received and read in full
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// HTTP status code
    pub status: u16,

    /// URL the response was served from, after any redirects
    pub final_url: Url,

    /// Response body
    pub body: String,
}

/// Capability to GET a URL
///
/// Implementations must be cheap to share between tasks; the scheduler calls
/// `fetch` from many units of work at once.
pub trait Fetcher: Send + Sync + 'static {
    /// Performs a GET request for `url`
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}

/// The production fetcher backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    headers: HeaderMap,
    auth: Option<(String, String)>,
}

impl HttpFetcher {
    /// Creates a fetcher from the crawler and request configuration
    ///
    /// # Returns
    ///
    /// * `Ok(HttpFetcher)` - Ready to issue requests
    /// * `Err(reqwest::Error)` - Failed to build the HTTP client
    pub fn new(crawler: &CrawlerConfig, request: &RequestConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(Duration::from_millis(crawler.request_timeout_ms))?;
        let auth = request
            .basic_auth()
            .map(|(user, pass)| (user.to_string(), pass.to_string()));

        let mut headers = build_header_map(request.headers.as_deref().unwrap_or(""));
        if auth.is_some() {
            // Basic auth is applied after custom headers and wins over them
            headers.remove(AUTHORIZATION);
        }

        Ok(Self {
            client,
            headers,
            auth,
        })
    }

    /// Custom headers sent with every request
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let mut request = self.client.get(url.clone()).headers(self.headers.clone());
        if let Some((user, pass)) = &self.auth {
            request = request.basic_auth(user, Some(pass));
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;
        let status = response.status().as_u16();
        let final_url = response.url().clone();

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        Ok(FetchedPage {
            status,
            final_url,
            body,
        })
    }
}

/// Builds an HTTP client with the crawler's user agent and timeout
///
/// Redirects are followed only while they stay on the host of the requested URL.
/// A redirect to another host is not followed; the 3xx response itself becomes the
/// page's result.
///
/// # Arguments
///
/// * `timeout` - Total time allowed for one request, body included
///
/// # Example
///
/// ```no_run
/// use sitecrawl::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .redirect(same_host_redirects())
        .build()
}

fn same_host_redirects() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() > MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }
        let leaves_host = attempt
            .previous()
            .first()
            .is_some_and(|origin| !same_host(origin, attempt.url()));
        if leaves_host {
            tracing::debug!("Not following cross-host redirect to {}", attempt.url());
            attempt.stop()
        } else {
            attempt.follow()
        }
    })
}

/// Converts a `Name:Value,...` string into a header map
///
/// Pairs with a missing separator, an invalid header name, or an invalid value are
/// skipped. A repeated name keeps the last value.
pub fn build_header_map(raw: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in parse_header_pairs(raw) {
        let parsed_name = HeaderName::from_bytes(name.as_bytes());
        let parsed_value = HeaderValue::from_str(&value);
        match (parsed_name, parsed_value) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::debug!("Skipping invalid header {:?}: {:?}", name, value),
        }
    }
    headers
}

fn classify_error(url: &Url, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if e.is_connect() {
        FetchError::Request {
            url: url.to_string(),
            message: "Connection refused".to_string(),
        }
    } else {
        FetchError::Request {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}
