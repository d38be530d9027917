use url::Url;

/// Returns true if both URLs point at the same host
///
/// The comparison is exact on the serialised host plus any explicit port; the
/// scheme is ignored. Default ports are elided by the URL parser, so
/// `http://example.com/` and `https://example.com/` share a host while
/// `http://example.com:8080/` does not.
///
/// # Examples
///
/// ```
/// use sitecrawl::url::same_host;
/// use url::Url;
///
/// let page = Url::parse("https://example.com/a").unwrap();
/// assert!(same_host(&page, &Url::parse("http://example.com/b").unwrap()));
/// assert!(!same_host(&page, &Url::parse("https://blog.example.com/").unwrap()));
/// ```
pub fn same_host(a: &Url, b: &Url) -> bool {
    match (a.host_str(), b.host_str()) {
        (Some(ha), Some(hb)) => ha == hb && a.port() == b.port(),
        _ => false,
    }
}
