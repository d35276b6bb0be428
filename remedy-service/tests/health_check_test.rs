mod common;

use axum::http::StatusCode;
use common::{body_bytes, TestApp};
use remedy_service::services::providers::{MockSummarizer, MockSynthesizer};
use remedy_service::services::InMemoryRecordStore;
use remedy_service::utils::ValidationConfig;
use service_core::middleware::REQUEST_ID_HEADER;

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::new();

    let (status, body) = app.get_json("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "remedy-service");

    let response = app.get("/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_check_reports_unreachable_store() {
    let app = TestApp::with(
        InMemoryRecordStore::failing("connection refused"),
        MockSummarizer::replying("unused"),
        MockSynthesizer::returning(vec![]),
        ValidationConfig::default(),
    );

    let (status, body) = app.get_json("/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");

    let response = app.get("/ready").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn every_response_carries_request_id() {
    let app = TestApp::new();

    for uri in ["/health", "/remedies/migraine", "/remedies/asthma", "/remedies/%21"] {
        let response = app.get(uri).await;
        assert!(response.headers().contains_key(REQUEST_ID_HEADER), "{uri}");
    }
}

#[tokio::test]
async fn metrics_endpoint_exposes_lookups() {
    let app = TestApp::new();
    app.get("/remedies/migraine").await;

    let response = app.get("/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);

    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(text.contains("remedy_lookups_total"));
    assert!(text.contains("http_requests_total"));
}
