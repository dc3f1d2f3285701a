//! Integration tests for single-domain crawls
//!
//! These tests run the orchestrator end-to-end, either against a wiremock
//! server through the HTTP renderer or against an in-memory site.

use crate::support::{config_in, read_lines, FakeSite};
use product_discoverer::crawler::{HttpRenderer, Orchestrator};
use product_discoverer::state::CrawlState;
use product_discoverer::url::CrawlTarget;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_over_http() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/",
        r##"<html><body>
            <a href="/products/1">Product 1</a>
            <a href="/products/2">Product 2</a>
            <a href="/products/2">Product 2 again</a>
            <a href="https://other.com/x">Elsewhere</a>
            <a href="/account/login">Sign in</a>
            <a href="/img/photo.jpg">Photo</a>
            <a href="#top">Top</a>
            <a href="/catalog?b=2&a=1">Catalog</a>
        </body></html>"##,
    )
    .await;
    mount_html(
        &server,
        "/products/1",
        r#"<a href="/">Home</a><a href="/products/3">Next</a><a href="/catalog?a=1&b=2">Catalog</a>"#,
    )
    .await;
    mount_html(&server, "/products/2", r#"<a href="/products/1/">Back</a>"#).await;
    mount_html(&server, "/catalog", "<p>empty catalog</p>").await;
    Mock::given(method("GET"))
        .and(path("/products/3"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = Arc::new(config_in(dir.path()));
    let renderer = Arc::new(HttpRenderer::new(&config.renderer, &config.user_agent).unwrap());
    let orchestrator = Orchestrator::new(Arc::clone(&config), renderer);

    let target = CrawlTarget::new(&base).unwrap();
    let outcome = orchestrator.crawl(&target).await.unwrap();

    let lines = read_lines(&outcome.output);
    assert_eq!(lines[0], base);

    let expected: HashSet<String> = [
        base.clone(),
        format!("{}/products/1", base),
        format!("{}/products/2", base),
        format!("{}/products/3", base),
        format!("{}/catalog?a=1&b=2", base),
    ]
    .into_iter()
    .collect();
    assert_eq!(lines.len(), expected.len(), "duplicate lines: {:?}", lines);
    assert_eq!(lines.into_iter().collect::<HashSet<_>>(), expected);

    assert_eq!(outcome.discovered, 5);
    assert_eq!(outcome.visited, 5);
    assert_eq!(outcome.render_failures, 1);
}

#[tokio::test]
async fn test_end_to_end_product_scenario() {
    let site = FakeSite::new()
        .page(
            "https://www.example.com",
            r#"<a href="/products/1">1</a><a href="/products/2">2</a>
               <a href="/products/2">2</a><a href="https://other.com/x">x</a>"#,
        )
        .page("https://www.example.com/products/1", "<p>one</p>")
        .page("https://www.example.com/products/2", "<p>two</p>");

    let dir = TempDir::new().unwrap();
    let orchestrator = Orchestrator::new(Arc::new(config_in(dir.path())), Arc::new(site));
    let target = CrawlTarget::new("https://www.example.com").unwrap();

    let outcome = orchestrator.crawl(&target).await.unwrap();

    assert_eq!(
        outcome.output,
        dir.path().join("output_files").join("example.txt")
    );
    assert_eq!(
        read_lines(&outcome.output),
        vec![
            "https://www.example.com",
            "https://www.example.com/products/1",
            "https://www.example.com/products/2",
        ]
    );
}

#[tokio::test]
async fn test_concurrency_bound_across_a_crawl() {
    let mut home = String::new();
    for i in 0..20 {
        home.push_str(&format!(r#"<a href="/p/{}">{}</a>"#, i, i));
    }
    let mut site = FakeSite::new()
        .page("https://www.example.com", &home)
        .with_delay(Duration::from_millis(15));
    for i in 0..20 {
        site = site.page(&format!("https://www.example.com/p/{}", i), "<p>leaf</p>");
    }
    let site = Arc::new(site);

    let dir = TempDir::new().unwrap();
    let mut config = config_in(dir.path());
    config.crawler.max_concurrency = 3;
    let orchestrator = Orchestrator::new(Arc::new(config), site.clone());

    let target = CrawlTarget::new("https://www.example.com").unwrap();
    let outcome = orchestrator.crawl(&target).await.unwrap();

    assert_eq!(outcome.discovered, 21);
    assert_eq!(site.calls(), 21);
    assert!(site.peak() <= 3, "peak concurrency {}", site.peak());
    assert_eq!(read_lines(&outcome.output).len(), 21);
}

#[tokio::test]
async fn test_small_chunk_size_keeps_every_record() {
    let mut home = String::new();
    for i in 0..12 {
        home.push_str(&format!(r#"<a href="/item/{}">{}</a>"#, i, i));
    }
    let site = FakeSite::new().page("https://www.example.com", &home);

    let dir = TempDir::new().unwrap();
    let mut config = config_in(dir.path());
    config.crawler.chunk_size = 5;
    let orchestrator = Orchestrator::new(Arc::new(config), Arc::new(site));

    let target = CrawlTarget::new("https://www.example.com").unwrap();
    let outcome = orchestrator.crawl(&target).await.unwrap();

    let lines = read_lines(&outcome.output);
    assert_eq!(lines.len(), 13);
    assert_eq!(lines.iter().collect::<HashSet<_>>().len(), 13);
    // Item pages are missing from the site; only the root renders
    assert_eq!(outcome.render_failures, 12);
}

#[tokio::test]
async fn test_spawned_crawl_handle() {
    let site = FakeSite::new().page(
        "https://www.example.com",
        r#"<a href="/products/9">9</a>"#,
    );

    let dir = TempDir::new().unwrap();
    let orchestrator = Orchestrator::new(Arc::new(config_in(dir.path())), Arc::new(site));
    let target = CrawlTarget::new("https://www.example.com").unwrap();

    let handle = orchestrator.spawn(target);
    let mut states = handle.subscribe();

    let outcome = handle.wait().await.unwrap();
    assert_eq!(outcome.discovered, 2);
    assert_eq!(*states.borrow_and_update(), CrawlState::Completed);
}
