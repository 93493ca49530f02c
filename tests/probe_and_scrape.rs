// tests/probe_and_scrape.rs
// =============================================================================
// The prober and the whole scrape pipeline against local mock servers.
// =============================================================================

use link_scout::config::{ProbeConfig, ScrapeConfig};
use link_scout::http::ReqwestClient;
use link_scout::links::NormalizedLink;
use link_scout::probe::{probe, ProbeOutcome};
use link_scout::Scraper;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn quick_config(max_concurrent: usize) -> ProbeConfig {
    ProbeConfig {
        max_concurrent,
        head_timeout: Duration::from_millis(300),
        get_timeout: Duration::from_millis(300),
        batch_delay: Duration::ZERO,
    }
}

async fn site() -> MockServer {
    let server = MockServer::start().await;

    // Plain healthy page
    Mock::given(path("/ok"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    // Rejects HEAD but serves GET
    Mock::given(method("HEAD"))
        .and(path("/no-head"))
        .respond_with(ResponseTemplate::new(405))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/no-head"))
        .respond_with(ResponseTemplate::new(200).set_body_string("body"))
        .mount(&server)
        .await;

    // Too slow for either tier
    Mock::given(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    // Anything else is a 404
    server
}

fn link(server: &MockServer, p: &str) -> NormalizedLink {
    NormalizedLink::parse(&format!("{}{}", server.uri(), p)).unwrap()
}

#[tokio::test]
async fn test_probe_classifies_each_link() {
    let server = site().await;
    let client = ReqwestClient::new().unwrap();
    let links = vec![
        link(&server, "/ok"),
        link(&server, "/no-head"),
        link(&server, "/slow"),
        link(&server, "/missing"),
    ];

    let summary = probe(&client, &links, &quick_config(4)).await;

    assert_eq!(summary.total, 4);
    assert_eq!(summary.working_count, 2);
    assert_eq!(summary.unreachable_count, 1);
    assert_eq!(summary.broken_count, 1);

    assert_eq!(summary.unreachable[0].outcome, ProbeOutcome::Timeout);
    assert_eq!(summary.unreachable[0].url, link(&server, "/slow"));
    assert_eq!(summary.broken[0].status_code, Some(404));
}

#[tokio::test]
async fn test_probe_total_with_uneven_batches() {
    let server = site().await;
    let client = ReqwestClient::new().unwrap();
    let links: Vec<_> = (0..12).map(|i| link(&server, &format!("/ok?n={}", i))).collect();

    let summary = probe(&client, &links, &quick_config(5)).await;

    assert_eq!(summary.total, 12);
    assert_eq!(summary.working_count, 12);
}

#[tokio::test]
async fn test_scrape_direct_end_to_end() {
    let server = MockServer::start().await;
    let page = format!(
        r#"<html><head><title>Mock page</title>
             <link rel="stylesheet" href="/site.css"></head>
           <body>
             <a href="/about">About</a>
             <a href="https://other.com/x">Other</a>
             <a href="mailto:someone@example.com">Mail</a>
             <img src="{}/img/logo.png">
           </body></html>"#,
        server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&server)
        .await;

    let config = ScrapeConfig {
        proxy: Some("direct".to_string()),
        ..ScrapeConfig::default()
    };
    let scraper = Scraper::new(ReqwestClient::new().unwrap(), config);
    let result = scraper.scrape(&format!("{}/", server.uri())).await.unwrap();

    assert_eq!(result.base_domain, "127.0.0.1");
    assert_eq!(result.metadata.title, "Mock page");
    assert_eq!(result.unique_internal_links, 3);
    assert_eq!(result.unique_external_links, 1);
    assert_eq!(result.resource_links, 2);
    assert_eq!(result.proxy_used, "direct");
}
