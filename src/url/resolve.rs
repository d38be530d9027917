use crate::{UrlError, UrlResult};
use url::Url;

/// Resolves a link href against the page it was found on
///
/// The result is the absolute URL whose serialised form is the frontier key.
/// No further normalisation is applied: query strings and fragments stay part of
/// the URL's identity.
///
/// Links are rejected when they are empty, fail to parse, or resolve to anything
/// other than an `http`/`https` URL with a host (`mailto:`, `javascript:`, `data:`
/// and friends all fall out here).
///
/// # Arguments
///
/// * `base` - URL of the page containing the link
/// * `href` - Raw `href` attribute value
///
/// # Examples
///
/// ```
/// use sitecrawl::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/intro").unwrap();
/// let resolved = resolve_link(&base, "../about?lang=en").unwrap();
/// assert_eq!(resolved.as_str(), "https://example.com/about?lang=en");
/// ```
pub fn resolve_link(base: &Url, href: &str) -> UrlResult<Url> {
    let href = href.trim();
    if href.is_empty() {
        return Err(UrlError::Empty);
    }

    let absolute = base
        .join(href)
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;

    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return Err(UrlError::InvalidScheme(absolute.scheme().to_string()));
    }

    if absolute.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(absolute)
}
