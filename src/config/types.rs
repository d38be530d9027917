use serde::Deserialize;

/// Default maximum number of simultaneous fetch units
pub const DEFAULT_MAX_CONCURRENCY: u32 = 10;

/// Default per-request timeout (milliseconds)
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Main configuration structure for sitecrawl
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub request: RequestConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Seed URL to start crawling from
    #[serde(default)]
    pub url: Option<String>,

    /// Sitemap URL whose pages seed the crawl
    #[serde(default)]
    pub sitemap: Option<String>,

    /// Maximum number of concurrent page fetches
    #[serde(rename = "max-concurrency", default = "default_max_concurrency")]
    pub max_concurrency: u32,

    /// Per-request timeout (milliseconds)
    #[serde(rename = "request-timeout-ms", default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Emit a line for every URL as it begins fetching
    #[serde(default)]
    pub verbose: bool,
}

/// Options applied to every outgoing request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestConfig {
    /// HTTP basic auth username
    #[serde(default)]
    pub username: Option<String>,

    /// HTTP basic auth password
    #[serde(default)]
    pub password: Option<String>,

    /// Custom headers, `Name:Value` pairs separated by commas
    #[serde(default)]
    pub headers: Option<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            url: None,
            sitemap: None,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            verbose: false,
        }
    }
}

fn default_max_concurrency() -> u32 {
    DEFAULT_MAX_CONCURRENCY
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

impl RequestConfig {
    /// Returns the credentials when both halves are non-empty
    pub fn basic_auth(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }
}

/// Values supplied on the command line; `None` leaves the file value untouched
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub url: Option<String>,
    pub sitemap: Option<String>,
    pub max_concurrency: Option<u32>,
    pub request_timeout_ms: Option<u64>,
    pub verbose: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub headers: Option<String>,
}

impl Config {
    /// Layers command-line values on top of this configuration
    ///
    /// An entry flag (`url` or `sitemap`) on the command line replaces both entry
    /// keys from the file, so the two entry modes never mix across sources.
    pub fn apply_overrides(&mut self, cli: CliOverrides) {
        if cli.url.is_some() || cli.sitemap.is_some() {
            self.crawler.url = cli.url;
            self.crawler.sitemap = cli.sitemap;
        }
        if let Some(n) = cli.max_concurrency {
            self.crawler.max_concurrency = n;
        }
        if let Some(ms) = cli.request_timeout_ms {
            self.crawler.request_timeout_ms = ms;
        }
        self.crawler.verbose |= cli.verbose;
        if cli.username.is_some() {
            self.request.username = cli.username;
        }
        if cli.password.is_some() {
            self.request.password = cli.password;
        }
        if cli.headers.is_some() {
            self.request.headers = cli.headers;
        }
    }
}
