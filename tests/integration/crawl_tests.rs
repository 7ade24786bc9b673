//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run full crawl
//! cycles end-to-end.

use koala_search::config::{CrawlerConfig, UserAgentConfig};
use koala_search::crawler::Crawler;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    }
}

/// Crawler settings with no politeness delay and a low word floor
fn test_config(max_pages: usize, max_depth: u32) -> CrawlerConfig {
    CrawlerConfig {
        max_pages,
        max_depth,
        request_delay_ms: 0,
        request_timeout_secs: 5,
        min_word_count: 5,
        ..CrawlerConfig::default()
    }
}

fn test_crawler(config: CrawlerConfig) -> Crawler {
    Crawler::new(config, &test_user_agent()).expect("Failed to build crawler")
}

/// Builds a small HTML page with a title, body text and links
fn html_page(title: &str, text: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!("<a href=\"{}\">link</a>", href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body>\
         <nav>Menu Home About</nav>\
         <main><p>{}</p>{}</main></body></html>",
        title, text, anchors
    )
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_budget_and_depth_bound_the_crawl() {
    let server = MockServer::start().await;

    mount_html(
        &server,
        "/",
        html_page(
            "Home",
            "Welcome to the seed page with plenty of words to pass",
            &["/a", "/b", "/c"],
        ),
    )
    .await;
    mount_html(
        &server,
        "/a",
        html_page("A", "Page a talks about alpha topics in enough detail", &["/deeper"]),
    )
    .await;
    mount_html(
        &server,
        "/b",
        html_page("B", "Page b talks about beta topics in enough detail", &[]),
    )
    .await;
    mount_html(
        &server,
        "/c",
        html_page("C", "Page c talks about gamma topics in enough detail", &[]),
    )
    .await;

    let crawler = test_crawler(test_config(2, 1));
    let outcome = crawler
        .crawl(&format!("{}/", server.uri()))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.accepted, 2);
    assert_eq!(outcome.documents.len(), 2);
    assert_eq!(outcome.frontier_remaining, 2);
    assert_eq!(outcome.visited, 2);

    assert!(outcome.documents[0].url.ends_with('/'));
    assert_eq!(outcome.documents[0].title, "Home");
    assert!(outcome.documents[1].url.ends_with("/a"));
    assert_eq!(outcome.documents[1].title, "A");

    // Boilerplate is stripped from the stored content
    assert!(!outcome.documents[0].content.contains("Menu"));
    assert!(outcome.documents[0].word_count >= 5);
}

#[tokio::test]
async fn test_depth_limit_stops_link_following() {
    let server = MockServer::start().await;

    mount_html(
        &server,
        "/",
        html_page("Home", "Seed page text with more than five words", &["/child"]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/child"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            html_page("Child", "Child text that should never be fetched here", &[]),
            "text/html",
        ))
        .expect(0)
        .mount(&server)
        .await;

    let crawler = test_crawler(test_config(10, 0));
    let outcome = crawler.crawl(&format!("{}/", server.uri())).await.unwrap();

    assert_eq!(outcome.accepted, 1);
    assert_eq!(outcome.frontier_remaining, 0);
}

#[tokio::test]
async fn test_robots_failure_allows_crawl() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_html(
        &server,
        "/",
        html_page("Home", "Seed page text with more than five words", &["/next"]),
    )
    .await;
    mount_html(
        &server,
        "/next",
        html_page("Next", "Second page text with more than five words", &[]),
    )
    .await;

    let crawler = test_crawler(test_config(10, 1));
    let outcome = crawler.crawl(&format!("{}/", server.uri())).await.unwrap();

    assert_eq!(outcome.accepted, 2);
    assert_eq!(outcome.failed, 0);
}

#[tokio::test]
async fn test_robots_disallow_is_honored() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private\n"),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_html(
        &server,
        "/",
        html_page(
            "Home",
            "Seed page text with more than five words",
            &["/private/secret", "/public"],
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/private/secret"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            html_page("Secret", "Hidden text that must never be requested", &[]),
            "text/html",
        ))
        .expect(0)
        .mount(&server)
        .await;
    mount_html(
        &server,
        "/public",
        html_page("Public", "Public page text with more than five words", &[]),
    )
    .await;

    let crawler = test_crawler(test_config(10, 1));
    let outcome = crawler.crawl(&format!("{}/", server.uri())).await.unwrap();

    let urls: Vec<&str> = outcome.documents.iter().map(|d| d.url.as_str()).collect();
    assert_eq!(outcome.accepted, 2);
    assert!(urls.iter().any(|u| u.ends_with("/public")));
    assert!(!urls.iter().any(|u| u.contains("/private")));
    assert_eq!(outcome.rejected, 1);
}

#[tokio::test]
async fn test_duplicate_content_is_rejected() {
    let server = MockServer::start().await;

    let shared = "Identical article body repeated on two different addresses";
    mount_html(
        &server,
        "/",
        html_page("Home", "Seed page text with more than five words", &["/one", "/two"]),
    )
    .await;
    mount_html(&server, "/one", html_page("One", shared, &[])).await;
    mount_html(&server, "/two", html_page("Two", shared, &[])).await;

    let crawler = test_crawler(test_config(10, 1));
    let outcome = crawler.crawl(&format!("{}/", server.uri())).await.unwrap();

    assert_eq!(outcome.accepted, 2);
    assert_eq!(outcome.rejected, 1);
    assert!(outcome.documents[1].url.ends_with("/one"));
    assert_ne!(
        outcome.documents[0].content_fingerprint,
        outcome.documents[1].content_fingerprint
    );
}

#[tokio::test]
async fn test_non_html_and_error_pages_are_rejected() {
    let server = MockServer::start().await;

    mount_html(
        &server,
        "/",
        html_page(
            "Home",
            "Seed page text with more than five words",
            &["/feed", "/missing", "/short"],
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"items": ["many", "words", "here"]}"#, "application/json"),
        )
        .mount(&server)
        .await;
    mount_html(&server, "/short", html_page("Short", "Too few", &[])).await;

    let crawler = test_crawler(test_config(10, 1));
    let outcome = crawler.crawl(&format!("{}/", server.uri())).await.unwrap();

    // /missing falls through to the mock server's 404
    assert_eq!(outcome.accepted, 1);
    assert_eq!(outcome.rejected, 3);
    assert_eq!(outcome.failed, 0);
    assert_eq!(outcome.visited, 4);
}

#[tokio::test]
async fn test_out_of_scope_links_are_not_followed() {
    let server = MockServer::start().await;

    mount_html(
        &server,
        "/",
        html_page(
            "Home",
            "Seed page text with more than five words",
            &[
                "https://elsewhere.invalid/page",
                "mailto:someone@example.com",
                "/report.pdf",
                "#section",
            ],
        ),
    )
    .await;

    let crawler = test_crawler(test_config(10, 2));
    let outcome = crawler.crawl(&format!("{}/", server.uri())).await.unwrap();

    assert_eq!(outcome.accepted, 1);
    assert_eq!(outcome.visited, 1);
    assert_eq!(outcome.frontier_remaining, 0);
}
