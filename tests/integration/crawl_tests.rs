//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use site_crawler::config::{CrawlOptions, UserAgentConfig};
use site_crawler::crawler::{crawl, Coordinator};
use site_crawler::output::write_csv_report_to_path;
use site_crawler::state::VisitState;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0".to_string(),
    }
}

fn bounded(seed: &str, max_concurrency: usize, max_pages: usize) -> CrawlOptions {
    CrawlOptions {
        seed: seed.to_string(),
        max_concurrency,
        max_pages,
        fetch_timeout: Some(Duration::from_secs(5)),
    }
}

/// Host and port of the mock server, which is the key prefix of its pages
fn host_key(server: &MockServer) -> String {
    server.address().to_string()
}

async fn mount_page(server: &MockServer, route: &str, html: String, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html"),
        )
        .expect(expected_hits)
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
        r#"<html><body>
            <h1>Home</h1>
            <main><p>Welcome home.</p></main>
            <a href="/page1">Page 1</a>
            <a href="/page2">Page 2</a>
            <a href="https://example.org/elsewhere">Elsewhere</a>
            <img src="/logo.png">
        </body></html>"#
            .to_string(),
        1,
    )
    .await;

    mount_page(
        &mock_server,
        "/page1",
        format!(
            r#"<html><body><h1>Page 1</h1><p>First page.</p>
            <a href="{}/">Home</a><a href="/page2">Page 2</a></body></html>"#,
            base_url
        ),
        1,
    )
    .await;

    mount_page(
        &mock_server,
        "/page2",
        r#"<html><body><h1>Page 2</h1><a href="/page1/">Page 1 again</a></body></html>"#
            .to_string(),
        1,
    )
    .await;

    let outcome = crawl(bounded(&base_url, 3, 50), &user_agent())
        .await
        .expect("crawl should start");

    let host = host_key(&mock_server);
    let keys: Vec<String> = outcome.pages.keys().cloned().collect();
    assert_eq!(
        keys,
        vec![
            host.clone(),
            format!("{}/page1", host),
            format!("{}/page2", host)
        ]
    );

    let home = &outcome.pages[&host];
    assert_eq!(home.heading, "Home");
    assert_eq!(home.first_paragraph, "Welcome home.");
    assert_eq!(
        home.outgoing_links,
        vec![
            format!("{}/page1", base_url),
            format!("{}/page2", base_url),
            "https://example.org/elsewhere".to_string(),
        ]
    );
    assert_eq!(home.image_urls, vec![format!("{}/logo.png", base_url)]);

    let page1 = &outcome.pages[&format!("{}/page1", host)];
    assert_eq!(page1.url, format!("{}/page1", base_url));
    assert_eq!(page1.first_paragraph, "First page.");

    assert_eq!(outcome.statistics.count(VisitState::Completed), 3);
    assert_eq!(outcome.statistics.count(VisitState::Rejected), 1);
    assert!(outcome.statistics.count(VisitState::Skipped) >= 3);
}

#[tokio::test]
async fn test_error_status_is_failed_and_not_stored() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/missing">Missing</a><a href="/broken">Broken</a><a href="/ok">Ok</a>"#
            .to_string(),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/ok",
        r#"<a href="/missing">Missing again</a>"#.to_string(),
        1,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = crawl(bounded(&base_url, 2, 50), &user_agent())
        .await
        .expect("crawl should start");

    let host = host_key(&mock_server);
    assert_eq!(outcome.pages.len(), 2);
    assert!(outcome.pages.contains_key(&format!("{}/ok", host)));
    assert!(!outcome.pages.contains_key(&format!("{}/missing", host)));
    assert_eq!(outcome.statistics.failures("fetch"), 2);
}

#[tokio::test]
async fn test_out_of_scope_links_not_fetched() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let seed = format!("{}/docs", base_url);

    mount_page(
        &mock_server,
        "/docs",
        format!(
            r#"<a href="{0}/docs/intro">Intro</a><a href="{0}/blog">Blog</a><a href="{0}/docs2">Docs 2</a>"#,
            base_url
        ),
        1,
    )
    .await;
    mount_page(&mock_server, "/docs/intro", "<h1>Intro</h1>".to_string(), 1).await;
    mount_page(&mock_server, "/blog", "<h1>Blog</h1>".to_string(), 0).await;
    mount_page(&mock_server, "/docs2", "<h1>Docs 2</h1>".to_string(), 0).await;

    let outcome = crawl(bounded(&seed, 2, 50), &user_agent())
        .await
        .expect("crawl should start");

    assert_eq!(outcome.pages.len(), 2);
    assert_eq!(outcome.statistics.count(VisitState::Rejected), 2);
}

#[tokio::test]
async fn test_page_budget_limits_requests() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let links: String = (0..10)
        .map(|i| format!(r#"<a href="/p{}">p{}</a>"#, i, i))
        .collect();
    mount_page(&mock_server, "/", links, 1).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>leaf</p>"))
        .mount(&mock_server)
        .await;

    let outcome = crawl(bounded(&base_url, 4, 4), &user_agent())
        .await
        .expect("crawl should start");

    let requests = mock_server
        .received_requests()
        .await
        .expect("request recording is enabled");
    assert_eq!(requests.len(), 4);
    assert_eq!(outcome.pages.len(), 4);
    assert_eq!(outcome.statistics.count(VisitState::Skipped), 7);
}

#[tokio::test]
async fn test_sends_configured_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestBot/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Hi</h1>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = crawl(
        CrawlOptions::sequential(mock_server.uri(), None),
        &user_agent(),
    )
    .await
    .expect("crawl should start");

    assert_eq!(outcome.pages.len(), 1);
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/slow">Slow</a><a href="/fast">Fast</a>"#.to_string(),
        1,
    )
    .await;
    mount_page(&mock_server, "/fast", "<h1>Fast</h1>".to_string(), 1).await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<h1>Slow</h1>")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let mut options = bounded(&base_url, 2, 10);
    options.fetch_timeout = Some(Duration::from_millis(200));
    let outcome = crawl(options, &user_agent())
        .await
        .expect("crawl should start");

    assert_eq!(outcome.pages.len(), 2);
    assert_eq!(outcome.statistics.failures("timeout"), 1);
}

#[tokio::test]
async fn test_invalid_options_fail_before_crawling() {
    let mock_server = MockServer::start().await;

    let result = Coordinator::with_http(bounded(&mock_server.uri(), 0, 10), &user_agent());
    assert!(result.is_err());

    let result = Coordinator::with_http(bounded("ftp://example.com", 1, 10), &user_agent());
    assert!(result.is_err());

    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_report_written_from_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<h1>Home</h1><p>Hello, world</p><a href="/about">About</a><img src="/a.png"><img src="/b.png">"#
            .to_string(),
        1,
    )
    .await;
    mount_page(&mock_server, "/about", "<h1>About</h1>".to_string(), 1).await;

    let outcome = crawl(bounded(&base_url, 2, 10), &user_agent())
        .await
        .expect("crawl should start");

    let dir = TempDir::new().unwrap();
    let report_path = dir.path().join("report.csv");
    write_csv_report_to_path(&outcome.pages, &report_path).unwrap();

    let mut reader = csv::Reader::from_path(&report_path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec![
            "page_url",
            "heading",
            "first_paragraph",
            "outgoing_link_urls",
            "image_urls"
        ]
    );

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], base_url.as_str());
    assert_eq!(&rows[0][1], "Home");
    assert_eq!(&rows[0][2], "Hello, world");
    assert_eq!(rows[0][3], format!("{}/about", base_url));
    assert_eq!(rows[0][4], format!("{0}/a.png;{0}/b.png", base_url));
    assert_eq!(&rows[1][1], "About");
}
