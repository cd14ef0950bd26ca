//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small catalog and exercise the
//! listing and detail phases end-to-end.

use std::sync::Arc;
use std::time::Duration;
use watch_etl::config::Config;
use watch_etl::crawler::{Coordinator, FetchResult, Fetcher, NetworkErrorKind};
use watch_etl::EtlError;
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NAME_CLASS: &str =
    "color_9D font_24 fFamily_mrsEaves fStyle_italic text-transform-none fWeight_regular d-block";

/// Creates a test configuration pointed at the mock server with short delays
fn create_test_config(base_url: &str, total_pages: u32) -> Config {
    let mut config = Config::for_catalog(base_url);
    config.catalog.total_pages = total_pages;
    config.listing.batch_size = 2;
    config.listing.inter_batch_delay_ms = 10;
    config.detail.batch_size = 2;
    config.detail.inter_batch_delay_ms = 10;
    config.fetch.timeout_secs = 5;
    config.fetch.max_attempts = 3;
    config.fetch.backoff_base_ms = 10;
    config.fetch.backoff_max_ms = 40;
    config
}

fn listing_page(hrefs: &[&str]) -> String {
    let tiles: String = hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<div class="product_image"><a href="{}"><img src="thumb.jpg"></a></div>"#,
                href
            )
        })
        .collect();
    format!("<html><body><div class=\"grid\">{}</div></body></html>", tiles)
}

fn detail_page(name: &str, price: &str, limited: &str) -> String {
    format!(
        r#"<html><body>
            <h1><span class="{NAME_CLASS}">{name}</span></h1>
            <div class="price">{price}</div>
            <div class="specColWidth specFirstRow">
                <div class="specCol"><span class="specName">Case Size</span><span class="specValue">42 mm</span></div>
                <div class="specCol"><span class="specName">Limited Edition</span><span class="specValue">{limited}</span></div>
            </div>
            <div class="specRow"><span class="specName">Lug Width</span><span class="specValue">20 mm</span></div>
            <div class="calibre_sepcColumn specRow"><span class="specName">Frequency</span><span class="specValue">28800 bph</span></div>
        </body></html>"#
    )
}

async fn mount_listing(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path("/brands.html"))
        .and(query_param("p", page))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_detail(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_extraction_two_listing_pages() {
    // Start a mock server
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(
        &mock_server,
        "1",
        listing_page(&["/watch-1.html", &format!("{}/watch-2.html", base_url)]),
    )
    .await;
    mount_listing(&mock_server, "2", listing_page(&["/watch-3.html"])).await;

    mount_detail(&mock_server, "/watch-1.html", detail_page("Watch 1", "₹1,23,456", "Yes")).await;
    mount_detail(&mock_server, "/watch-2.html", detail_page("Watch 2", "₹45,678", "No")).await;
    mount_detail(&mock_server, "/watch-3.html", detail_page("Watch 3", "₹9,99,000", "No")).await;

    let config = Arc::new(create_test_config(&base_url, 2));
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");

    let report = coordinator.run().await.expect("Extraction failed");

    assert_eq!(report.listing_pages, 2);
    assert_eq!(report.links, 3);
    assert_eq!(report.records.len(), 3);
    assert_eq!(report.dropped(), 0);

    let names: Vec<&str> = report.records.iter().map(|r| r["name"].as_str()).collect();
    assert_eq!(names, vec!["Watch 1", "Watch 2", "Watch 3"]);

    let first = &report.records[0];
    assert_eq!(first["price"], "₹1,23,456");
    assert_eq!(first["Limited Edition"], "Yes");
    assert_eq!(first["Lug Width"], "20 mm");
    assert_eq!(first["Frequency"], "28800 bph");
}

#[tokio::test]
async fn test_links_resolved_against_base_url() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(&mock_server, "1", listing_page(&["/watch-1.html", "watch-2.html"])).await;

    let config = Arc::new(create_test_config(&base_url, 1));
    let coordinator = Coordinator::new(config).unwrap();

    let links = coordinator.extract_links().await.unwrap();
    assert_eq!(
        links,
        vec![
            format!("{}/watch-1.html", base_url),
            format!("{}/watch-2.html", base_url),
        ]
    );
}

#[tokio::test]
async fn test_duplicate_links_are_kept() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(&mock_server, "1", listing_page(&["/watch-1.html"])).await;
    mount_listing(&mock_server, "2", listing_page(&["/watch-1.html"])).await;

    let config = Arc::new(create_test_config(&base_url, 2));
    let links = Coordinator::new(config).unwrap().extract_links().await.unwrap();

    assert_eq!(links.len(), 2);
    assert_eq!(links[0], links[1]);
}

#[tokio::test]
async fn test_failed_pages_are_dropped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(
        &mock_server,
        "1",
        listing_page(&["/watch-1.html", "/missing.html", "/no-price.html"]),
    )
    .await;
    mount_detail(&mock_server, "/watch-1.html", detail_page("Watch 1", "₹1,000", "No")).await;
    mount_detail(
        &mock_server,
        "/no-price.html",
        format!(
            r#"<html><body><span class="{NAME_CLASS}">Watch X</span>
               <div class="specColWidth specFirstRow"></div></body></html>"#
        ),
    )
    .await;
    // "/missing.html" is not mounted: wiremock answers 404 with an empty body

    let config = Arc::new(create_test_config(&base_url, 1));
    let report = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(report.links, 3);
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.dropped(), 2);
    assert_eq!(report.records[0]["name"], "Watch 1");
}

#[tokio::test]
async fn test_listing_pages_without_products_fail_run() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(&mock_server, "1", "<html><body>No products</body></html>".to_string()).await;

    let config = Arc::new(create_test_config(&base_url, 1));
    let result = Coordinator::new(config).unwrap().run().await;

    assert!(matches!(result, Err(EtlError::NoLinks)));
}

#[tokio::test]
async fn test_no_parsable_detail_pages_fail_run() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(&mock_server, "1", listing_page(&["/watch-1.html"])).await;
    mount_detail(&mock_server, "/watch-1.html", "<html><body></body></html>".to_string()).await;

    let config = Arc::new(create_test_config(&base_url, 1));
    let result = Coordinator::new(config).unwrap().run().await;

    assert!(matches!(result, Err(EtlError::NoRecords)));
}

#[tokio::test]
async fn test_rate_limited_fetch_is_retried() {
    let mock_server = MockServer::start().await;

    // First request gets 429, later ones succeed
    Mock::given(method("GET"))
        .and(path("/watch-1.html"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;
    mount_detail(&mock_server, "/watch-1.html", detail_page("Watch 1", "₹1,000", "No")).await;

    let config = create_test_config(&mock_server.uri(), 1);
    let fetcher = Fetcher::new(&config.fetch).unwrap();

    let url = format!("{}/watch-1.html", mock_server.uri());
    match fetcher.fetch_url(&url).await {
        FetchResult::Success { status_code, body } => {
            assert_eq!(status_code, 200);
            assert!(body.contains("Watch 1"));
        }
        other => panic!("Expected success after retry, got {:?}", other),
    }

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_persistent_rate_limit_gives_up() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/busy.html"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1);
    let fetcher = Fetcher::new(&config.fetch).unwrap();
    let url = format!("{}/busy.html", mock_server.uri());

    assert!(matches!(
        fetcher.fetch_url(&url).await,
        FetchResult::RateLimited { attempts: 3 }
    ));
    assert_eq!(fetcher.fetch(&url).await, None);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 6);
}

#[tokio::test]
async fn test_every_request_sends_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/watch-1.html"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(5)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1);
    let fetcher = Fetcher::new(&config.fetch).unwrap();
    let url = format!("{}/watch-1.html", mock_server.uri());

    for _ in 0..5 {
        assert_eq!(fetcher.fetch(&url).await.as_deref(), Some("ok"));
    }
}

#[tokio::test]
async fn test_slow_page_times_out_as_absent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(detail_page("Watch 1", "₹1,000", "No"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), 1);
    config.fetch.timeout_secs = 1;
    let fetcher = Fetcher::new(&config.fetch).unwrap();
    let url = format!("{}/slow.html", mock_server.uri());

    assert!(matches!(
        fetcher.fetch_url(&url).await,
        FetchResult::NetworkError {
            kind: NetworkErrorKind::Timeout,
            ..
        }
    ));
    assert_eq!(fetcher.fetch(&url).await, None);
}
