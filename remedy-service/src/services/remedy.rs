//! Remedy lookup, summary and speech operations.

use crate::models::{RemedyLookup, SummaryResponse};
use crate::services::database::{RecordStore, StoreError};
use crate::services::metrics::{record_lookup, record_provider_call};
use crate::services::prompt::build_summary_prompt;
use crate::services::providers::{
    GenerationParams, ProviderError, SpeechSynthesizer, TextSummarizer,
};
use crate::utils::{normalize, IdentifierError, ValidationConfig};
use service_core::error::AppError;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Maximum characters accepted for speech synthesis.
pub const MAX_SPEECH_CHARS: usize = 500;

/// Errors surfaced by [`RemedyService`].
#[derive(Debug, Error)]
pub enum RemedyError {
    #[error("Invalid disease name: {0}")]
    Identifier(#[from] IdentifierError),

    #[error("Disease '{0}' not found")]
    NotFound(String),

    #[error("Record store error: {0}")]
    StoreFailure(#[from] StoreError),

    #[error("Summarizer error: {0}")]
    SummarizerFailure(ProviderError),

    #[error("Empty response from summarizer")]
    EmptySummary,

    #[error("Invalid text: {0}")]
    InvalidText(String),

    #[error("Speech synthesis error: {0}")]
    SynthesisFailure(ProviderError),
}

impl RemedyError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RemedyError::Identifier(_) => "invalid_identifier",
            RemedyError::NotFound(_) => "not_found",
            RemedyError::StoreFailure(_) => "store_failure",
            RemedyError::SummarizerFailure(_) => "summarizer_failure",
            RemedyError::EmptySummary => "empty_summary",
            RemedyError::InvalidText(_) => "invalid_text",
            RemedyError::SynthesisFailure(_) => "synthesis_failure",
        }
    }
}

impl From<RemedyError> for AppError {
    fn from(err: RemedyError) -> Self {
        match err {
            RemedyError::Identifier(_) | RemedyError::InvalidText(_) => {
                AppError::BadRequest(anyhow::anyhow!(err.to_string()))
            }
            RemedyError::NotFound(_) => AppError::NotFound(anyhow::anyhow!(err.to_string())),
            RemedyError::StoreFailure(e) => AppError::DatabaseError(anyhow::Error::new(e)),
            RemedyError::SummarizerFailure(e) => {
                AppError::ServiceUnavailable(format!("Summarizer error: {}", e))
            }
            RemedyError::EmptySummary => AppError::UpstreamError(err.to_string()),
            RemedyError::SynthesisFailure(e) => {
                AppError::InternalError(anyhow::anyhow!("Speech synthesis error: {}", e))
            }
        }
    }
}

/// Orchestrates the record store, summarizer and synthesizer for one request.
pub struct RemedyService {
    store: Arc<dyn RecordStore>,
    summarizer: Arc<dyn TextSummarizer>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    validation: ValidationConfig,
    generation: GenerationParams,
    speech_language: String,
}

impl RemedyService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        summarizer: Arc<dyn TextSummarizer>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            store,
            summarizer,
            synthesizer,
            validation: ValidationConfig::default(),
            generation: GenerationParams::default(),
            speech_language: "en".to_string(),
        }
    }

    pub fn with_validation(mut self, validation: ValidationConfig) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_generation(mut self, generation: GenerationParams) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_speech_language(mut self, language: impl Into<String>) -> Self {
        self.speech_language = language.into();
        self
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    pub fn validation(&self) -> &ValidationConfig {
        &self.validation
    }

    /// Look up a disease and its remedies by raw (un-normalized) name.
    pub async fn lookup(&self, raw: &str) -> Result<RemedyLookup, RemedyError> {
        let result = self.lookup_inner(raw).await;
        record_lookup("remedies", outcome(&result));
        result
    }

    async fn lookup_inner(&self, raw: &str) -> Result<RemedyLookup, RemedyError> {
        let name = normalize(raw, &self.validation).inspect_err(|e| {
            tracing::info!(reason = %e, "Rejected disease name");
        })?;

        let disease = self
            .store
            .find_disease(&name, self.validation.match_mode)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Disease lookup failed"))?
            .ok_or_else(|| RemedyError::NotFound(name.to_string()))?;

        let remedies = self
            .store
            .list_remedies(disease.id)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Remedy listing failed"))?;

        tracing::info!(
            disease = %name,
            disease_id = %disease.id,
            remedies = remedies.len(),
            "Remedies found"
        );

        Ok(RemedyLookup {
            disease: name.into_inner(),
            description: disease.description.unwrap_or_default(),
            remedies,
        })
    }

    /// Look up a disease and summarize its remedies with the text summarizer.
    pub async fn summarize(&self, raw: &str) -> Result<SummaryResponse, RemedyError> {
        let result = self.summarize_inner(raw).await;
        record_lookup("summary", outcome(&result));
        result
    }

    async fn summarize_inner(&self, raw: &str) -> Result<SummaryResponse, RemedyError> {
        let lookup = self.lookup_inner(raw).await?;
        let prompt = build_summary_prompt(&lookup);

        let provider = self.summarizer.name();
        let start = Instant::now();
        let response = self.summarizer.generate(&prompt, &self.generation).await;
        let elapsed = start.elapsed().as_secs_f64();

        let response = match response {
            Ok(response) => {
                record_provider_call(provider, "ok", elapsed);
                response
            }
            Err(e) => {
                record_provider_call(provider, "error", elapsed);
                tracing::error!(provider = provider, error = %e, "Summary generation failed");
                return Err(RemedyError::SummarizerFailure(e));
            }
        };

        let summary = response
            .text
            .filter(|text| !text.trim().is_empty())
            .ok_or(RemedyError::EmptySummary)?;

        tracing::info!(
            disease = %lookup.disease,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "Summary generated"
        );

        Ok(SummaryResponse {
            summary,
            original_data: lookup,
        })
    }

    /// Convert text to MP3 audio.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, RemedyError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RemedyError::InvalidText("text must not be empty".to_string()));
        }
        let len = text.chars().count();
        if len > MAX_SPEECH_CHARS {
            return Err(RemedyError::InvalidText(format!(
                "text too long ({} chars, max {})",
                len, MAX_SPEECH_CHARS
            )));
        }

        let provider = self.synthesizer.name();
        let start = Instant::now();
        let result = self
            .synthesizer
            .synthesize(text, &self.speech_language)
            .await;
        let elapsed = start.elapsed().as_secs_f64();

        match result {
            Ok(audio) => {
                record_provider_call(provider, "ok", elapsed);
                tracing::info!(
                    text_len = len,
                    audio_bytes = audio.len(),
                    language = %self.speech_language,
                    "Speech synthesized"
                );
                Ok(audio)
            }
            Err(e) => {
                record_provider_call(provider, "error", elapsed);
                tracing::error!(provider = provider, error = %e, "Speech synthesis failed");
                Err(RemedyError::SynthesisFailure(e))
            }
        }
    }
}

fn outcome<T>(result: &Result<T, RemedyError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Disease, Remedy};
    use crate::services::memory::InMemoryRecordStore;
    use crate::services::providers::{MockSummarizer, MockSynthesizer};
    use crate::utils::MatchMode;

    fn cold_store() -> InMemoryRecordStore {
        InMemoryRecordStore::new().with_disease(
            Disease::new("Common Cold", Some("Viral infection of the nose".to_string())),
            vec![Remedy {
                herb_name: "Echinacea".to_string(),
                preparation: "Tincture".to_string(),
                dosage: "2 ml three times daily".to_string(),
                safety_notes: Some("Avoid with autoimmune conditions".to_string()),
            }],
        )
    }

    fn service(
        store: Arc<InMemoryRecordStore>,
        summarizer: Arc<MockSummarizer>,
        synthesizer: Arc<MockSynthesizer>,
    ) -> RemedyService {
        RemedyService::new(store, summarizer, synthesizer)
    }

    fn defaults(store: InMemoryRecordStore) -> (RemedyService, Arc<InMemoryRecordStore>) {
        let store = Arc::new(store);
        let service = service(
            store.clone(),
            Arc::new(MockSummarizer::replying("summary")),
            Arc::new(MockSynthesizer::returning(vec![1, 2, 3])),
        );
        (service, store)
    }

    #[tokio::test]
    async fn test_lookup_normalizes_name() {
        let (service, _) = defaults(cold_store());
        let lookup = service.lookup("Common_Cold").await.unwrap();
        assert_eq!(lookup.disease, "common cold");
        assert_eq!(lookup.description, "Viral infection of the nose");
        assert_eq!(lookup.remedies.len(), 1);
    }

    #[tokio::test]
    async fn test_lookup_missing_description_is_empty() {
        let store = InMemoryRecordStore::new().with_disease(Disease::new("Flu", None), vec![]);
        let (service, _) = defaults(store);
        let lookup = service.lookup("flu").await.unwrap();
        assert_eq!(lookup.description, "");
        assert!(lookup.remedies.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_unknown_disease_is_not_found() {
        let (service, _) = defaults(cold_store());
        let err = service.lookup("Migraine").await.unwrap_err();
        assert!(matches!(err, RemedyError::NotFound(ref name) if name == "migraine"));
    }

    #[tokio::test]
    async fn test_invalid_names_never_reach_store() {
        let (service, store) = defaults(cold_store());
        let too_long = "a".repeat(51);
        for raw in ["___", "flu!!!", too_long.as_str()] {
            let err = service.lookup(raw).await.unwrap_err();
            assert!(matches!(err, RemedyError::Identifier(_)), "{raw}");
        }
        assert_eq!(store.query_count(), 0);
    }

    #[tokio::test]
    async fn test_contains_mode_matches_substring() {
        let (service, _) = defaults(cold_store());
        let service = service.with_validation(ValidationConfig {
            match_mode: MatchMode::Contains,
            ..ValidationConfig::default()
        });
        let lookup = service.lookup("cold").await.unwrap();
        assert_eq!(lookup.disease, "cold");
        assert_eq!(lookup.remedies[0].herb_name, "Echinacea");
    }

    #[tokio::test]
    async fn test_store_failure() {
        let (service, _) = defaults(InMemoryRecordStore::failing("connection reset"));
        let err = service.lookup("cold").await.unwrap_err();
        assert!(matches!(err, RemedyError::StoreFailure(_)));
    }

    #[tokio::test]
    async fn test_summary_uses_prompt_with_records() {
        let summarizer = Arc::new(MockSummarizer::replying("## Common cold\nDrink tea."));
        let service = service(
            Arc::new(cold_store()),
            summarizer.clone(),
            Arc::new(MockSynthesizer::returning(vec![])),
        );

        let response = service.summarize("common-cold").await.unwrap();
        assert_eq!(response.summary, "## Common cold\nDrink tea.");
        assert_eq!(response.original_data.disease, "common cold");

        let prompts = summarizer.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("summary for common cold using this data"));
        assert!(prompts[0].contains("- **Echinacea**: Tincture (2 ml three times daily)"));
        assert!(prompts[0].contains("  - Safety Notes: Avoid with autoimmune conditions"));
    }

    #[tokio::test]
    async fn test_summary_provider_error() {
        let service = service(
            Arc::new(cold_store()),
            Arc::new(MockSummarizer::failing(ProviderError::RateLimited)),
            Arc::new(MockSynthesizer::returning(vec![])),
        );
        let err = service.summarize("common cold").await.unwrap_err();
        assert!(matches!(err, RemedyError::SummarizerFailure(ProviderError::RateLimited)));
    }

    #[tokio::test]
    async fn test_summary_empty_generation() {
        let service = service(
            Arc::new(cold_store()),
            Arc::new(MockSummarizer::empty()),
            Arc::new(MockSynthesizer::returning(vec![])),
        );
        let err = service.summarize("common cold").await.unwrap_err();
        assert!(matches!(err, RemedyError::EmptySummary));
    }

    #[tokio::test]
    async fn test_summary_not_found_skips_summarizer() {
        let summarizer = Arc::new(MockSummarizer::replying("unused"));
        let service = service(
            Arc::new(cold_store()),
            summarizer.clone(),
            Arc::new(MockSynthesizer::returning(vec![])),
        );
        let err = service.summarize("asthma").await.unwrap_err();
        assert!(matches!(err, RemedyError::NotFound(_)));
        assert!(summarizer.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_synthesize_bounds() {
        let synthesizer = Arc::new(MockSynthesizer::returning(vec![0xff, 0xfb]));
        let service = service(
            Arc::new(cold_store()),
            Arc::new(MockSummarizer::replying("unused")),
            synthesizer.clone(),
        )
        .with_speech_language("fr");

        assert_eq!(service.synthesize(" Bonjour ").await.unwrap(), vec![0xff, 0xfb]);
        assert_eq!(
            synthesizer.requests(),
            vec![("Bonjour".to_string(), "fr".to_string())]
        );

        assert!(service.synthesize(&"a".repeat(500)).await.is_ok());
        assert!(matches!(
            service.synthesize(&"a".repeat(501)).await,
            Err(RemedyError::InvalidText(_))
        ));
        assert!(matches!(
            service.synthesize("   ").await,
            Err(RemedyError::InvalidText(_))
        ));
        assert_eq!(synthesizer.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_synthesize_failure() {
        let service = service(
            Arc::new(cold_store()),
            Arc::new(MockSummarizer::replying("unused")),
            Arc::new(MockSynthesizer::failing(ProviderError::NetworkError(
                "timeout".to_string(),
            ))),
        );
        assert!(matches!(
            service.synthesize("hello").await,
            Err(RemedyError::SynthesisFailure(_))
        ));
    }

    #[test]
    fn test_error_status_mapping() {
        use axum::http::StatusCode;

        let cases = [
            (RemedyError::Identifier(IdentifierError::Empty), StatusCode::BAD_REQUEST),
            (
                RemedyError::Identifier(IdentifierError::TooLong { max: 50 }),
                StatusCode::BAD_REQUEST,
            ),
            (RemedyError::NotFound("x".to_string()), StatusCode::NOT_FOUND),
            (
                RemedyError::StoreFailure(StoreError::Query("down".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                RemedyError::SummarizerFailure(ProviderError::RateLimited),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (RemedyError::EmptySummary, StatusCode::INTERNAL_SERVER_ERROR),
            (
                RemedyError::InvalidText("empty".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                RemedyError::SynthesisFailure(ProviderError::RateLimited),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }
}
