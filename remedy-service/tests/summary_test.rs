mod common;

use axum::http::StatusCode;
use common::{seeded_store, TestApp};
use remedy_service::services::providers::{MockSummarizer, MockSynthesizer, ProviderError};
use remedy_service::utils::ValidationConfig;

fn app_with_summarizer(summarizer: MockSummarizer) -> TestApp {
    TestApp::with(
        seeded_store(),
        summarizer,
        MockSynthesizer::returning(vec![]),
        ValidationConfig::default(),
    )
}

#[tokio::test]
async fn test_summary_wraps_generation_and_records() {
    let app = TestApp::new();

    let (status, body) = app.get_json("/cohere-summary/migraine").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"], "## Remedies\n- Drink ginger tea.");
    assert_eq!(body["original_data"]["disease"], "migraine");
    assert_eq!(body["original_data"]["remedies"][0]["herb_name"], "Feverfew");

    let prompts = app.summarizer.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].starts_with(
        "Generate a comprehensive herbal remedy summary for migraine using this data:"
    ));
    assert!(prompts[0].contains("**Description**: Recurring headaches"));
    assert!(prompts[0].contains("- **Feverfew**: Capsule (100 mg daily)\n  - Safety Notes: Avoid in pregnancy"));
}

#[tokio::test]
async fn test_summary_validation_error_skips_summarizer() {
    let app = TestApp::new();

    let (status, _) = app.get_json("/cohere-summary/%3Cscript%3E").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.summarizer.prompts().is_empty());
    assert_eq!(app.store.query_count(), 0);
}

#[tokio::test]
async fn test_summary_unknown_disease_is_404() {
    let app = TestApp::new();

    let (status, _) = app.get_json("/cohere-summary/asthma").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(app.summarizer.prompts().is_empty());
}

#[tokio::test]
async fn test_summarizer_error_is_503() {
    let app = app_with_summarizer(MockSummarizer::failing(ProviderError::ApiError(
        "invalid api token".to_string(),
    )));

    let (status, body) = app.get_json("/cohere-summary/migraine").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Service unavailable");
    assert!(body["details"].as_str().unwrap().contains("invalid api token"));
}

#[tokio::test]
async fn test_empty_generation_is_500() {
    let app = app_with_summarizer(MockSummarizer::empty());

    let (status, body) = app.get_json("/cohere-summary/migraine").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["details"], "Empty response from summarizer");
}

#[tokio::test]
async fn test_blank_generation_is_500() {
    let app = app_with_summarizer(MockSummarizer::replying("  \n "));

    let (status, _) = app.get_json("/cohere-summary/migraine").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
