//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end over real HTTP.

use sitecrawl::config::{parse_config, Config, CrawlerConfig, RequestConfig};
use sitecrawl::crawler::{run_crawl, USER_AGENT};
use sitecrawl::output::Report;
use sitecrawl::{CrawlError, PageStatus};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration starting at `url`
fn seed_config(url: String) -> Config {
    Config {
        crawler: CrawlerConfig {
            url: Some(url),
            max_concurrency: 4,
            request_timeout_ms: 2_000,
            ..Default::default()
        },
        request: RequestConfig::default(),
    }
}

fn html(links: &[&str]) -> ResponseTemplate {
    let anchors: String = links
        .iter()
        .map(|href| format!("<a href=\"{}\">link</a>", href))
        .collect();
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", anchors))
        .insert_header("content-type", "text/html")
}

fn xml(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "application/xml")
}

async fn mount_page(server: &MockServer, page: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_host() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html(&["/about", "/blog", "https://external.example.org/x", "mailto:a@b.c"]),
    )
    .await;
    mount_page(&mock_server, "/about", html(&["/", "/blog", "/about"])).await;
    mount_page(&mock_server, "/blog", html(&["/about", "/blog/post"])).await;
    mount_page(&mock_server, "/blog/post", html(&["../about"])).await;

    let outcome = run_crawl(&seed_config(format!("{}/", base_url)))
        .await
        .expect("Crawl failed");

    let urls: Vec<String> = outcome.records.iter().map(|r| r.url.clone()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/", base_url),
            format!("{}/about", base_url),
            format!("{}/blog", base_url),
            format!("{}/blog/post", base_url),
        ]
    );
    assert!(outcome
        .records
        .iter()
        .all(|r| r.status == PageStatus::Http(200)));
    assert_eq!(outcome.tally.get(&PageStatus::Http(200)), Some(&4));
    assert!(outcome.sitemap.is_none());
}

#[tokio::test]
async fn test_missing_page_is_flagged_in_report() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", html(&["/missing"])).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<a href=\"/from-404\">x</a>"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/from-404", html(&[])).await;

    let outcome = run_crawl(&seed_config(format!("{}/", base_url)))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.records.len(), 3);
    let report = Report::new(outcome.records, outcome.tally);
    let text = report.render();
    assert!(text.contains(&format!("{}/missing : 404 Not Found", base_url)));
    assert!(text.contains("Status 200: 2 pages"));
    assert!(text.contains("Status 404: 1 pages"));
    assert!(text.contains("Total pages crawled: 3"));
    assert_eq!(report.flagged_pages(), 1);
}

#[tokio::test]
async fn test_timeout_is_isolated() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", html(&["/fast", "/slow"])).await;
    mount_page(&mock_server, "/fast", html(&[])).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html(&[]).set_delay(Duration::from_millis(1_500)))
        .mount(&mock_server)
        .await;

    let mut config = seed_config(format!("{}/", base_url));
    config.crawler.request_timeout_ms = 200;

    let outcome = run_crawl(&config).await.expect("Crawl failed");

    assert_eq!(outcome.records.len(), 3);
    let slow = outcome
        .records
        .iter()
        .find(|r| r.url.ends_with("/slow"))
        .unwrap();
    assert_eq!(slow.status, PageStatus::Failed);
    assert!(slow.error.as_deref().unwrap().contains("timeout"));
    assert_eq!(outcome.tally.get(&PageStatus::Http(200)), Some(&2));
    assert_eq!(outcome.tally.get(&PageStatus::Failed), Some(&1));
}

#[tokio::test]
async fn test_sitemap_index_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/sitemap.xml",
        xml(format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>{0}/sitemap-1.xml</loc></sitemap>
  <sitemap><loc>{0}/sitemap-2.xml</loc></sitemap>
  <sitemap><loc>{0}/sitemap.xml</loc></sitemap>
</sitemapindex>"#,
            base_url
        )),
    )
    .await;
    mount_page(
        &mock_server,
        "/sitemap-1.xml",
        xml(format!(
            r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{0}/one</loc></url>
  <url><loc>{0}/two</loc></url>
</urlset>"#,
            base_url
        )),
    )
    .await;
    mount_page(
        &mock_server,
        "/sitemap-2.xml",
        xml(format!(
            r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{0}/two</loc></url>
  <url><loc>{0}/three</loc></url>
</urlset>"#,
            base_url
        )),
    )
    .await;
    mount_page(&mock_server, "/one", html(&["/four"])).await;
    mount_page(&mock_server, "/two", html(&["/one"])).await;
    mount_page(&mock_server, "/three", html(&[])).await;
    mount_page(&mock_server, "/four", html(&[])).await;

    let config = Config {
        crawler: CrawlerConfig {
            sitemap: Some(format!("{}/sitemap.xml", base_url)),
            max_concurrency: 2,
            ..Default::default()
        },
        request: RequestConfig::default(),
    };

    let outcome = run_crawl(&config).await.expect("Crawl failed");

    assert_eq!(outcome.records.len(), 4);
    assert!(outcome.records.iter().all(|r| !r.url.ends_with(".xml")));
    let stats = outcome.sitemap.expect("sitemap stats");
    assert_eq!(stats.sitemaps_fetched, 3);
    assert_eq!(stats.pages_enqueued, 3);
}

#[tokio::test]
async fn test_unreadable_root_sitemap_fails_run() {
    let mock_server = MockServer::start().await;

    let config = Config {
        crawler: CrawlerConfig {
            sitemap: Some(format!("{}/sitemap.xml", mock_server.uri())),
            ..Default::default()
        },
        request: RequestConfig::default(),
    };

    let result = run_crawl(&config).await;
    assert!(matches!(result, Err(CrawlError::Sitemap { .. })));
}

#[tokio::test]
async fn test_headers_and_basic_auth_sent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("x-token", "abc"))
        .and(header("accept-language", "en"))
        // base64("user:pass")
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .and(header("user-agent", USER_AGENT))
        .respond_with(html(&[]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = parse_config(&format!(
        r#"
[crawler]
url = "{}/"

[request]
username = "user"
password = "pass"
headers = "X-Token:abc,Accept-Language:en,Authorization:Bearer nope,broken"
"#,
        base_url
    ))
    .expect("Failed to parse config");

    let outcome = run_crawl(&config).await.expect("Crawl failed");

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].status, PageStatus::Http(200));
}

#[tokio::test]
async fn test_cross_host_redirect_not_followed() {
    let site = MockServer::start().await;
    let other = MockServer::start().await;
    let base_url = site.uri();

    mount_page(&site, "/", html(&["/out"])).await;
    Mock::given(method("GET"))
        .and(path("/out"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", format!("{}/landing", other.uri()).as_str()),
        )
        .expect(1)
        .mount(&site)
        .await;
    Mock::given(method("GET"))
        .and(path("/landing"))
        .respond_with(html(&["/only-on-other-host"]))
        .expect(0)
        .mount(&other)
        .await;

    let outcome = run_crawl(&seed_config(format!("{}/", base_url)))
        .await
        .expect("Crawl failed");

    let urls: Vec<String> = outcome.records.iter().map(|r| r.url.clone()).collect();
    assert_eq!(urls, vec![format!("{}/", base_url), format!("{}/out", base_url)]);
    assert_eq!(outcome.records[1].status, PageStatus::Http(302));
}

#[tokio::test]
async fn test_same_host_redirect_followed() {
    let site = MockServer::start().await;
    let base_url = site.uri();

    mount_page(&site, "/", html(&["/old"])).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new/"))
        .expect(1)
        .mount(&site)
        .await;
    mount_page(&site, "/new/", html(&["child"])).await;
    mount_page(&site, "/new/child", html(&[])).await;

    let outcome = run_crawl(&seed_config(format!("{}/", base_url)))
        .await
        .expect("Crawl failed");

    let old = outcome
        .records
        .iter()
        .find(|r| r.url.ends_with("/old"))
        .unwrap();
    assert_eq!(old.status, PageStatus::Http(200));
    assert!(outcome
        .records
        .iter()
        .any(|r| r.url == format!("{}/new/child", base_url)));
}
