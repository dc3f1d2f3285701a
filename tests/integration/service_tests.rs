//! Integration tests for the batch request boundary

use crate::support::{config_in, read_lines, FakeProbe, FakeSite};
use product_discoverer::service::{DiscoveryService, HttpProbe};
use product_discoverer::state::CrawlState;
use product_discoverer::DiscovererError;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn shops(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("shop{}.com", i)).collect()
}

fn shop_site(n: usize) -> FakeSite {
    let mut site = FakeSite::new();
    for i in 0..n {
        site = site
            .page(
                &format!("https://www.shop{}.com", i),
                r#"<a href="/items/1">item</a><a href="/help">help</a>"#,
            )
            .page(&format!("https://www.shop{}.com/items/1", i), "<p>item</p>");
    }
    site
}

#[tokio::test]
async fn test_batch_with_unreachable_domain_starts_nothing() {
    let healthy = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&healthy)
        .await;
    let broken = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&broken)
        .await;

    let mut domains: Vec<String> = (0..9)
        .map(|i| format!("{}/shop{}", healthy.uri(), i))
        .collect();
    domains.push(broken.uri());

    let dir = TempDir::new().unwrap();
    let config = Arc::new(config_in(dir.path()));
    let probe = HttpProbe::new(&config.validation, &config.user_agent).unwrap();
    let site = Arc::new(FakeSite::new());
    let service = DiscoveryService::new(Arc::clone(&config), site.clone(), Arc::new(probe));

    let err = service.start(&domains).await.unwrap_err();
    match &err {
        DiscovererError::Unreachable { domains } => assert_eq!(domains, &[broken.uri()]),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains(&broken.uri()));

    // No crawl was started
    assert_eq!(site.calls(), 0);
    assert!(!config.output.directory.exists());
}

#[tokio::test]
async fn test_batch_sharing_a_result_file_starts_nothing() {
    let mut domains = shops(8);
    domains.push("example.com".to_string());
    domains.push("www.example.org".to_string());

    let dir = TempDir::new().unwrap();
    let config = Arc::new(config_in(dir.path()));
    let site = Arc::new(shop_site(8));
    let service = DiscoveryService::new(
        Arc::clone(&config),
        site.clone(),
        Arc::new(FakeProbe::default()),
    );

    let err = service.start(&domains).await.unwrap_err();
    match &err {
        DiscovererError::OutputCollision { domains } => assert_eq!(
            domains,
            &["https://www.example.com", "https://www.example.org"]
        ),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("https://www.example.org"));

    assert_eq!(site.calls(), 0);
    assert!(!config.output.directory.exists());
}

#[tokio::test]
async fn test_batch_below_minimum_is_rejected() {
    let dir = TempDir::new().unwrap();
    let service = DiscoveryService::new(
        Arc::new(config_in(dir.path())),
        Arc::new(FakeSite::new()),
        Arc::new(FakeProbe::default()),
    );

    let err = service.start(&shops(3)).await.unwrap_err();
    assert!(matches!(
        err,
        DiscovererError::BatchTooSmall {
            minimum: 10,
            actual: 3
        }
    ));
}

#[tokio::test]
async fn test_batch_crawls_every_domain() {
    let dir = TempDir::new().unwrap();
    let config = Arc::new(config_in(dir.path()));
    let service = DiscoveryService::new(
        Arc::clone(&config),
        Arc::new(shop_site(10)),
        Arc::new(FakeProbe::default()),
    );

    let handles = service.start(&shops(10)).await.unwrap();
    assert_eq!(handles.len(), 10);

    for handle in handles {
        let states = handle.subscribe();
        let outcome = handle.wait().await.unwrap();
        assert_eq!(*states.borrow(), CrawlState::Completed);
        assert_eq!(outcome.discovered, 2);
    }

    for i in 0..10 {
        let path = service.locate(&format!("www.shop{}.com", i)).unwrap();
        assert_eq!(path, config.output.directory.join(format!("shop{}.txt", i)));
        assert_eq!(
            read_lines(&path),
            vec![
                format!("https://www.shop{}.com", i),
                format!("https://www.shop{}.com/items/1", i),
            ]
        );
    }
}

#[tokio::test]
async fn test_locate_unknown_domain() {
    let dir = TempDir::new().unwrap();
    let service = DiscoveryService::new(
        Arc::new(config_in(dir.path())),
        Arc::new(FakeSite::new()),
        Arc::new(FakeProbe::default()),
    );

    assert!(matches!(
        service.locate("www.never-crawled.com"),
        Err(DiscovererError::NotFound { .. })
    ));
}
