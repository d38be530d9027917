use crate::config::types::{Config, CrawlerConfig, RequestConfig};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Where a crawl begins
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPoint {
    /// A single seed page
    Seed(Url),
    /// A sitemap (or sitemap index) listing the seed pages
    Sitemap(Url),
}

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_request_config(&config.request);
    Ok(())
}

/// Resolves the configured entry mode
///
/// Exactly one of `url` and `sitemap` must be present.
pub fn entry_point(config: &CrawlerConfig) -> ConfigResult<EntryPoint> {
    let url = config.url.as_deref().filter(|s| !s.trim().is_empty());
    let sitemap = config.sitemap.as_deref().filter(|s| !s.trim().is_empty());

    match (url, sitemap) {
        (None, None) => Err(ConfigError::MissingEntry),
        (Some(_), Some(_)) => Err(ConfigError::Validation(
            "url and sitemap are mutually exclusive".to_string(),
        )),
        (Some(seed), None) => Ok(EntryPoint::Seed(parse_entry_url("url", seed)?)),
        (None, Some(sitemap)) => Ok(EntryPoint::Sitemap(parse_entry_url("sitemap", sitemap)?)),
    }
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    entry_point(config)?;

    if config.max_concurrency < 1 {
        return Err(ConfigError::Validation(format!(
            "max_concurrency must be at least 1, got {}",
            config.max_concurrency
        )));
    }

    if config.request_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_ms must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Checks request options; problems here are never fatal
fn validate_request_config(config: &RequestConfig) {
    let has_user = config.username.as_deref().is_some_and(|u| !u.is_empty());
    let has_pass = config.password.as_deref().is_some_and(|p| !p.is_empty());
    if has_user != has_pass {
        tracing::warn!("Basic auth needs both username and password; sending requests without auth");
    }
}

fn parse_entry_url(field: &str, raw: &str) -> ConfigResult<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, raw
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!("{} '{}' has no host", field, raw)));
    }

    Ok(url)
}
