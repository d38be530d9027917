//! HTML parser for extracting links
//!
//! Every `<a href>` in the document is resolved against the page it came from and
//! kept only if it stays on that page's host.

use crate::url::same_host_link;
use scraper::{Html, Selector};
use url::Url;

/// Extracts same-host links from an HTML page
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `page_url` - URL of the page being parsed; relative links resolve against it
///
/// # Returns
///
/// Absolute same-host URLs in document order. Duplicates are kept; the frontier
/// deduplicates them.
///
/// # Example
///
/// ```
/// use sitecrawl::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href="/a">A</a><a href="https://other.com/">B</a>"#;
/// let page = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(html, &page);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].as_str(), "https://example.com/a");
/// ```
pub fn extract_links(html: &str, page_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| same_host_link(page_url, href))
        .collect()
}
