//! URL handling module for sitecrawl
//!
//! This module resolves discovered links against their containing page and
//! applies the same-host filter.

mod host;
mod resolve;

// Re-export main functions
pub use host::same_host;
pub use resolve::resolve_link;

use url::Url;

/// Resolves `href` against `page` and keeps it only if it stays on the page's host
///
/// Returns `None` for unresolvable links and for links to other hosts. Neither case
/// is an error worth recording: the link was never claimed.
pub fn same_host_link(page: &Url, href: &str) -> Option<Url> {
    match resolve_link(page, href) {
        Ok(link) if same_host(page, &link) => Some(link),
        Ok(link) => {
            tracing::trace!("Dropping cross-host link {} on {}", link, page);
            None
        }
        Err(e) => {
            tracing::debug!("Dropping link {:?} on {}: {}", href, page, e);
            None
        }
    }
}
