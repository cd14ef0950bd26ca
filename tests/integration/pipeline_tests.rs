//! Integration tests for the stage tasks
//!
//! A wiremock catalog feeds the extract stage; artifacts are written to a
//! temporary directory and the load stage publishes into an in-memory store.

use std::path::Path;
use tempfile::TempDir;
use watch_etl::config::load_config;
use watch_etl::pipeline::{self, PipelineContext};
use watch_etl::record::read_record_set;
use watch_etl::storage::{MemoryStore, ObjectStore};
use watch_etl::EtlError;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NAME_CLASS: &str =
    "color_9D font_24 fFamily_mrsEaves fStyle_italic text-transform-none fWeight_regular d-block";

/// Writes a config file for the mock catalog with artifacts under `dir`
fn write_config(dir: &Path, base_url: &str) -> std::path::PathBuf {
    let config_path = dir.join("watch-etl.toml");
    let content = format!(
        r#"
[catalog]
base-url = "{base_url}"
total-pages = 1

[listing]
batch-size = 5
inter-batch-delay-ms = 10

[detail]
batch-size = 1
inter-batch-delay-ms = 10

[fetch]
timeout-secs = 5
max-attempts = 2
backoff-base-ms = 10
backoff-max-ms = 20

[artifacts]
extracted-path = "{extracted}"
transformed-path = "{transformed}"

[storage]
bucket = "watchesdata"
key = "watches/transformed_data.csv"
"#,
        extracted = dir.join("data/extracted_data.json").display(),
        transformed = dir.join("data/transformed_data.csv").display(),
    );
    std::fs::write(&config_path, content).unwrap();
    config_path
}

async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/brands.html"))
        .and(query_param("p", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
                <div class="product_image"><a href="/watch-1.html"><img></a></div>
                <div class="product_image"><a href="/watch-2.html"><img></a></div>
            </body></html>"#,
        ))
        .mount(server)
        .await;

    for (page, name, price, limited) in [
        ("/watch-1.html", "Watch 1", "₹1,23,456", "Yes"),
        ("/watch-2.html", "Watch 2", "₹45,678", "No"),
    ] {
        let body = format!(
            r#"<html><body>
                <span class="{NAME_CLASS}">{name}</span>
                <div class="price">{price}</div>
                <div class="specColWidth specFirstRow">
                    <div class="specCol"><span class="specName">Limited Edition</span><span class="specValue">{limited}</span></div>
                </div>
                <div class="specRow"><span class="specName">Case Size</span><span class="specValue">40 mm</span></div>
            </body></html>"#
        );
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_stages_in_sequence() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server).await;

    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(temp_dir.path(), &mock_server.uri());
    let ctx = PipelineContext::new(load_config(&config_path).unwrap());

    // Extract
    pipeline::extract(&ctx).await.expect("Extract failed");
    let records = read_record_set(&ctx.config().artifacts.extracted_path).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["name"], "Watch 1");
    assert_eq!(records[1]["price"], "₹45,678");

    // Transform
    pipeline::transform(&ctx).await.expect("Transform failed");
    let csv = std::fs::read_to_string(&ctx.config().artifacts.transformed_path).unwrap();
    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let headers = reader.headers().unwrap().clone();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

    let column = |name: &str| -> Vec<String> {
        let index = headers.iter().position(|h| h == name).unwrap();
        rows.iter().map(|row| row[index].to_string()).collect()
    };
    assert_eq!(column("price"), vec!["123456", "45678"]);
    assert_eq!(column("Limited Edition"), vec!["1", "0"]);
    assert_eq!(column("Case Size"), vec!["40", "40"]);

    // Load
    let store = MemoryStore::new("watchesdata");
    pipeline::load(&ctx, &store).await.expect("Load failed");

    let info = store
        .head("watches/transformed_data.csv")
        .await
        .unwrap()
        .expect("object missing after load");
    assert_eq!(info.size as usize, csv.len());
    assert_eq!(
        store.get("watches/transformed_data.csv").unwrap(),
        csv.into_bytes()
    );
}

#[tokio::test]
async fn test_run_all() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server).await;

    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(temp_dir.path(), &mock_server.uri());
    let ctx = PipelineContext::new(load_config(&config_path).unwrap());

    let store = MemoryStore::new("watchesdata");
    pipeline::run_all(&ctx, &store).await.unwrap();

    assert!(store.exists("watches/transformed_data.csv").await.unwrap());
}

#[tokio::test]
async fn test_stage_fails_when_previous_stage_did_not_run() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(temp_dir.path(), "http://127.0.0.1:9");
    let ctx = PipelineContext::new(load_config(&config_path).unwrap());
    let store = MemoryStore::new("watchesdata");

    assert!(matches!(
        pipeline::transform(&ctx).await,
        Err(EtlError::MissingArtifact { .. })
    ));
    assert!(matches!(
        pipeline::load(&ctx, &store).await,
        Err(EtlError::MissingArtifact { .. })
    ));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_run_all_stops_at_failed_extract() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/brands.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(temp_dir.path(), &mock_server.uri());
    let ctx = PipelineContext::new(load_config(&config_path).unwrap());
    let store = MemoryStore::new("watchesdata");

    assert!(matches!(
        pipeline::run_all(&ctx, &store).await,
        Err(EtlError::NoLinks)
    ));
    assert!(!ctx.config().artifacts.extracted_path.exists());
    assert!(store.is_empty());
}
