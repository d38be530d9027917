//! Sitemap expansion
//!
//! A sitemap document is either an index (`<sitemapindex>` with `<sitemap><loc>`
//! entries pointing at more sitemaps) or a URL set (`<urlset>` with `<url><loc>`
//! entries pointing at pages). Expansion follows index entries depth-first and
//! hands every page entry to the scheduler as a seed.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::scheduler::Scheduler;
use crate::url::resolve_link;
use crate::{CrawlError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashSet;
use url::Url;

/// The `<loc>` entries of one sitemap document, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapDocument {
    /// Locations of nested sitemaps (`<sitemap><loc>`)
    pub sitemaps: Vec<String>,

    /// Locations of pages (`<url><loc>`)
    pub pages: Vec<String>,
}

impl SitemapDocument {
    /// Whether this document is a sitemap index
    ///
    /// A document carrying both kinds of entry is treated as an index.
    pub fn is_index(&self) -> bool {
        !self.sitemaps.is_empty()
    }
}

/// Parses the `<loc>` entries out of sitemap XML
///
/// Element names are matched on their local name, so namespaced documents work.
/// A `<loc>` counts only as the direct child of `<url>` or `<sitemap>`; extension
/// entries such as `<image:image><image:loc>` are ignored. Empty `<loc>` elements
/// are skipped.
///
/// # Example
///
/// ```
/// use sitecrawl::crawler::parse_sitemap;
///
/// let xml = r#"<urlset><url><loc>https://example.com/a</loc></url></urlset>"#;
/// let doc = parse_sitemap(xml).unwrap();
/// assert_eq!(doc.pages, vec!["https://example.com/a"]);
/// assert!(doc.sitemaps.is_empty());
/// ```
pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut document = SitemapDocument::default();
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut loc: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.local_name().as_ref().to_ascii_lowercase();
                if name == b"loc" {
                    loc = Some(String::new());
                }
                path.push(name);
            }
            Ok(Event::End(_)) => {
                let Some(name) = path.pop() else { continue };
                if name != b"loc" {
                    continue;
                }
                let Some(text) = loc.take() else { continue };
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }

                match path.last().map(Vec::as_slice) {
                    Some(b"sitemap") => document.sitemaps.push(text.to_string()),
                    Some(b"url") => document.pages.push(text.to_string()),
                    _ => tracing::trace!("Ignoring <loc> outside <url> or <sitemap>: {}", text),
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(buf) = loc.as_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| CrawlError::SitemapXml(e.to_string()))?;
                    buf.push_str(&text);
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(buf) = loc.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(CrawlError::SitemapXml(format!(
                    "at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(document)
}

/// Counters from one or more sitemap expansions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SitemapStats {
    /// Sitemap documents fetched and parsed
    pub sitemaps_fetched: usize,

    /// Nested sitemaps skipped because they could not be fetched or parsed
    pub sitemaps_failed: usize,

    /// Page URLs newly claimed in the frontier
    pub pages_enqueued: usize,
}

/// Walks a sitemap tree, feeding page URLs into a scheduler
///
/// Each sitemap URL is fetched at most once per expander, which bounds the walk
/// even when sitemaps reference each other.
#[derive(Debug, Default)]
pub struct SitemapExpander {
    seen: HashSet<String>,
}

impl SitemapExpander {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expands `root` and every sitemap reachable from it
    ///
    /// Page URLs are enqueued as seeds: they are claimed in the frontier but not
    /// host-filtered. A failure on `root` is returned; a failure on a nested sitemap
    /// is logged and that branch is skipped.
    ///
    /// # Returns
    ///
    /// * `Ok(SitemapStats)` - Counters for this call
    /// * `Err(CrawlError)` - The root sitemap could not be fetched or parsed
    pub async fn expand<F: Fetcher>(
        &mut self,
        scheduler: &Scheduler<F>,
        root: &Url,
    ) -> Result<SitemapStats> {
        let mut stats = SitemapStats::default();
        let mut stack = vec![(root.clone(), true)];

        while let Some((sitemap_url, is_root)) = stack.pop() {
            if !self.seen.insert(sitemap_url.to_string()) {
                tracing::debug!("Sitemap {} already expanded", sitemap_url);
                continue;
            }

            tracing::info!("Expanding sitemap: {}", sitemap_url);
            let document = match fetch_document(scheduler.fetcher(), &sitemap_url).await {
                Ok(document) => document,
                Err(e) if is_root => return Err(e),
                Err(e) => {
                    tracing::warn!("Skipping sitemap: {}", e);
                    stats.sitemaps_failed += 1;
                    continue;
                }
            };
            stats.sitemaps_fetched += 1;

            if document.is_index() {
                // Reversed so the stack pops them in document order
                for loc in document.sitemaps.iter().rev() {
                    match resolve_link(&sitemap_url, loc) {
                        Ok(nested) => stack.push((nested, false)),
                        Err(e) => {
                            tracing::warn!("Invalid sitemap location {:?} in {}: {}", loc, sitemap_url, e)
                        }
                    }
                }
                if !document.pages.is_empty() {
                    tracing::debug!(
                        "Ignoring {} page entries in sitemap index {}",
                        document.pages.len(),
                        sitemap_url
                    );
                }
            } else {
                for loc in &document.pages {
                    match resolve_link(&sitemap_url, loc) {
                        Ok(page) => {
                            if scheduler.enqueue(page) {
                                stats.pages_enqueued += 1;
                            }
                        }
                        Err(e) => {
                            tracing::warn!("Invalid page location {:?} in {}: {}", loc, sitemap_url, e)
                        }
                    }
                }
            }
        }

        tracing::info!(
            "Sitemap expansion found {} pages in {} sitemaps ({} skipped)",
            stats.pages_enqueued,
            stats.sitemaps_fetched,
            stats.sitemaps_failed
        );

        Ok(stats)
    }
}

async fn fetch_document<F: Fetcher>(fetcher: &F, url: &Url) -> Result<SitemapDocument> {
    let sitemap_error = |message: String| CrawlError::Sitemap {
        url: url.to_string(),
        message,
    };

    let page = fetcher
        .fetch(url)
        .await
        .map_err(|e| sitemap_error(e.to_string()))?;

    if !(200..300).contains(&page.status) {
        return Err(sitemap_error(format!("HTTP {}", page.status)));
    }

    parse_sitemap(&page.body).map_err(|e| sitemap_error(e.to_string()))
}
