//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end over real HTTP.

use sift_crawl::config::{load_config, Config};
use sift_crawl::crawler::{Coordinator, CrawlReport, Primitives};
use sift_crawl::index::{Index, InMemoryIndex};
use sift_crawl::CrawlError;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with no default delay
fn create_test_config(fetch_workers: usize, index_workers: usize) -> Config {
    let mut config = Config::default();
    config.crawler.fetch_workers = fetch_workers;
    config.crawler.index_workers = index_workers;
    config.crawler.default_crawl_delay = 0.0;
    config.crawler.request_timeout = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    config
}

async fn mount_page(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn run(config: Config, seed: &str) -> (sift_crawl::Result<CrawlReport>, Arc<InMemoryIndex>) {
    let index = Arc::new(InMemoryIndex::new());
    let primitives = Primitives::http(&config).expect("Failed to build HTTP client");
    let coordinator = Coordinator::new(config, primitives).expect("Invalid config");
    let report = tokio::time::timeout(
        Duration::from_secs(30),
        coordinator.run(seed, index.clone()),
    )
    .await
    .expect("Crawl did not terminate");
    (report, index)
}

#[tokio::test]
async fn test_full_crawl_single_host() {
    // Start a mock server
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nCrawl-delay: 0\n").await;

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<html><head><title>Home</title></head><body>
            <p>Welcome to the crawling test</p>
            <a href="{}/page1">Page 1</a>
            <a href="/page2">Page 2</a>
            <a href="page1#section">Page 1 again</a>
            </body></html>"#,
            base_url
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/page1",
        r#"<html><body><p>Crabs are crawling</p><a href="/">home</a></body></html>"#.to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/page2",
        r#"<html><body><p>Trees and leaves</p><a href="/page1">p1</a></body></html>"#.to_string(),
    )
    .await;

    let (report, index) = run(create_test_config(2, 2), &format!("{}/", base_url)).await;
    let report = report.expect("Crawl failed");

    assert_eq!(report.pages_fetched, 3);
    assert_eq!(report.pages_indexed, 3);
    assert_eq!(report.urls_visited, 3);
    assert_eq!(
        index.urls(),
        vec![
            format!("{}/", base_url),
            format!("{}/page1", base_url),
            format!("{}/page2", base_url),
        ]
    );

    let hits = index.search("crawl");
    let urls: Vec<&str> = hits.iter().map(|h| h.url.as_str()).collect();
    assert_eq!(urls.len(), 2);
    assert_eq!(urls[0], format!("{}/page1", base_url));

    // Each page mock expects exactly one request
    mock_server.verify().await;
}

#[tokio::test]
async fn test_robots_disallow_prevents_fetch() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(
        &mock_server,
        "User-agent: *\nDisallow: /private/*\nCrawl-delay: 0\n",
    )
    .await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/private/secret">secret</a><a href="/public">public</a>"#.to_string(),
    )
    .await;
    mount_page(&mock_server, "/public", "<p>open</p>".to_string()).await;

    // Disallowed page must never be fetched
    Mock::given(method("GET"))
        .and(path("/private/secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string("secret"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (report, index) = run(create_test_config(1, 1), &format!("{}/", base_url)).await;
    let report = report.expect("Crawl failed");

    assert_eq!(report.pages_disallowed, 1);
    assert!(!index.contains(&format!("{}/private/secret", base_url)));
    assert!(index.contains(&format!("{}/public", base_url)));
}

#[tokio::test]
async fn test_robots_for_other_agents_is_ignored() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(
        &mock_server,
        "User-agent: SomeOtherBot\nDisallow: /\n\nUser-agent: *\nCrawl-delay: 0\n",
    )
    .await;
    mount_page(&mock_server, "/", r#"<a href="/next">next</a>"#.to_string()).await;
    mount_page(&mock_server, "/next", "<p>fine</p>".to_string()).await;

    let (report, _) = run(create_test_config(1, 1), &format!("{}/", base_url)).await;
    assert_eq!(report.expect("Crawl failed").pages_indexed, 2);
}

#[tokio::test]
async fn test_missing_robots_allows_everything() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/", r#"<a href="/a">a</a>"#.to_string()).await;
    mount_page(&mock_server, "/a", "<p>a</p>".to_string()).await;

    let mut config = create_test_config(1, 1);
    config.crawler.default_crawl_delay = 0.1;

    let started = Instant::now();
    let (report, index) = run(config, &format!("{}/", base_url)).await;
    let report = report.expect("Crawl failed");

    assert_eq!(index.len(), 2);
    assert_eq!(report.pages_disallowed, 0);
    // Default delay applies after each of the two downloads
    assert!(started.elapsed() >= Duration::from_millis(200));
}

#[tokio::test]
async fn test_other_host_is_never_fetched() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let port = url::Url::parse(&base_url)
        .expect("Failed to parse base URL")
        .port()
        .expect("Mock server URI has a port");

    mount_robots(&mock_server, "Crawl-delay: 0\n").await;
    // Same server, but reached through a different host name
    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<a href="http://localhost:{}/elsewhere">elsewhere</a><a href="/b">b</a>"#,
            port
        ),
    )
    .await;
    mount_page(&mock_server, "/b", "<p>b</p>".to_string()).await;

    Mock::given(method("GET"))
        .and(path("/elsewhere"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (report, index) = run(create_test_config(1, 1), &format!("{}/", base_url)).await;
    let report = report.expect("Crawl failed");

    assert_eq!(report.pages_indexed, 2);
    assert_eq!(index.len(), 2);
}

#[tokio::test]
async fn test_server_errors_do_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "Crawl-delay: 0\n").await;
    mount_page(
        &mock_server,
        "/",
        r#"<a href="/broken">broken</a><a href="/ok">ok</a>"#.to_string(),
    )
    .await;
    mount_page(&mock_server, "/ok", "<p>ok</p>".to_string()).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (report, index) = run(create_test_config(1, 1), &format!("{}/", base_url)).await;
    let report = report.expect("Crawl failed");

    assert_eq!(report.fetch_failures, 1);
    assert_eq!(report.pages_indexed, 2);
    assert!(!index.contains(&format!("{}/broken", base_url)));
}

#[tokio::test]
async fn test_crawl_with_config_file() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nCrawl-delay: 0\n").await;
    mount_page(&mock_server, "/", "<p>configured</p>".to_string()).await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[crawler]
fetch-workers = 3
index-workers = 2
queue-capacity = 10
default-crawl-delay = 0.0

[user-agent]
crawler-name = "FileBot"
"#
    )
    .unwrap();

    let config = load_config(file.path()).expect("Failed to load config");
    assert_eq!(config.crawler.fetch_workers, 3);

    let (report, index) = run(config, &format!("{}/", base_url)).await;
    assert_eq!(report.expect("Crawl failed").pages_indexed, 1);
    assert_eq!(index.search("configured").len(), 1);
}

#[tokio::test]
async fn test_invalid_seed_is_rejected() {
    let (report, index) = run(create_test_config(1, 1), "not a url").await;
    assert!(matches!(report, Err(CrawlError::InvalidBaseUrl { .. })));
    assert!(index.is_empty());
}
