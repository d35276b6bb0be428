#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use remedy_service::models::{Disease, Remedy};
use remedy_service::services::metrics::init_metrics;
use remedy_service::services::providers::{MockSummarizer, MockSynthesizer};
use remedy_service::services::{InMemoryRecordStore, RemedyService};
use remedy_service::startup::{build_router, AppState};
use remedy_service::utils::ValidationConfig;
use std::sync::Arc;
use tower::util::ServiceExt;

/// Router wired to in-memory collaborators, with handles kept for assertions.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryRecordStore>,
    pub summarizer: Arc<MockSummarizer>,
    pub synthesizer: Arc<MockSynthesizer>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(
            seeded_store(),
            MockSummarizer::replying("## Remedies\n- Drink ginger tea."),
            MockSynthesizer::returning(vec![0xff, 0xfb, 0x90, 0x00]),
            ValidationConfig::default(),
        )
    }

    pub fn with(
        store: InMemoryRecordStore,
        summarizer: MockSummarizer,
        synthesizer: MockSynthesizer,
        validation: ValidationConfig,
    ) -> Self {
        init_metrics();

        let store = Arc::new(store);
        let summarizer = Arc::new(summarizer);
        let synthesizer = Arc::new(synthesizer);

        let service = RemedyService::new(store.clone(), summarizer.clone(), synthesizer.clone())
            .with_validation(validation);
        let router = build_router(AppState::new(service));

        Self {
            router,
            store,
            summarizer,
            synthesizer,
        }
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = self.get(uri).await;
        let status = response.status();
        let bytes = body_bytes(response).await;
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub fn remedy(herb: &str, preparation: &str, dosage: &str, notes: Option<&str>) -> Remedy {
    Remedy {
        herb_name: herb.to_string(),
        preparation: preparation.to_string(),
        dosage: dosage.to_string(),
        safety_notes: notes.map(str::to_string),
    }
}

pub fn seeded_store() -> InMemoryRecordStore {
    InMemoryRecordStore::new()
        .with_disease(
            Disease::new("Common Cold", Some("Viral infection of the upper airways".to_string())),
            vec![
                remedy("Echinacea", "Tincture", "2 ml three times daily", Some("Not for autoimmune conditions")),
                remedy("Ginger", "Fresh root tea", "2-3 cups daily", None),
            ],
        )
        .with_disease(
            Disease::new("Migraine", Some("Recurring headaches".to_string())),
            vec![remedy("Feverfew", "Capsule", "100 mg daily", Some("Avoid in pregnancy"))],
        )
        .with_disease(Disease::new("Insomnia", None), vec![])
}
