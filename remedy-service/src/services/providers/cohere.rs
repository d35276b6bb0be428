//! Cohere provider implementation.
//!
//! Calls the Cohere `generate` endpoint and returns the first generation.

use super::{GenerationParams, ProviderError, ProviderResponse, TextSummarizer};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use service_core::observability::TracedClientExt;
use std::time::Duration;

/// Cohere API base URL.
pub const COHERE_API_BASE: &str = "https://api.cohere.ai";

/// Cohere provider configuration.
#[derive(Debug, Clone)]
pub struct CohereConfig {
    pub api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

/// Cohere text summarizer.
pub struct CohereSummarizer {
    config: CohereConfig,
    client: Client,
}

impl CohereSummarizer {
    pub fn new(config: CohereConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    fn api_url(&self) -> String {
        format!("{}/v1/generate", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl TextSummarizer for CohereSummarizer {
    fn name(&self) -> &'static str {
        "cohere"
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        if self.config.api_key.expose_secret().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Cohere API key not configured".to_string(),
            ));
        }

        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            presence_penalty: params.presence_penalty,
        };

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            max_tokens = params.max_tokens,
            "Sending request to Cohere API"
        );

        let response = self
            .client
            .traced_post(&self.api_url())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }

            let message = serde_json::from_str::<ErrorBody>(&error_text)
                .map(|body| body.message)
                .unwrap_or(error_text);

            return Err(ProviderError::ApiError(format!(
                "Cohere API error {}: {}",
                status, message
            )));
        }

        let api_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        Ok(api_response.into())
    }
}

// ============================================================================
// Cohere API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
    presence_penalty: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    generations: Vec<Generation>,
    #[serde(default)]
    meta: Option<Meta>,
}

#[derive(Debug, Deserialize)]
struct Generation {
    text: String,
}

#[derive(Debug, Default, Deserialize)]
struct Meta {
    #[serde(default)]
    billed_units: Option<BilledUnits>,
}

#[derive(Debug, Default, Deserialize)]
struct BilledUnits {
    #[serde(default)]
    input_tokens: Option<f64>,
    #[serde(default)]
    output_tokens: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl From<GenerateResponse> for ProviderResponse {
    fn from(response: GenerateResponse) -> Self {
        let units = response
            .meta
            .and_then(|m| m.billed_units)
            .unwrap_or_default();

        ProviderResponse {
            text: response.generations.into_iter().next().map(|g| g.text),
            input_tokens: units.input_tokens.unwrap_or(0.0) as u32,
            output_tokens: units.output_tokens.unwrap_or(0.0) as u32,
        }
    }
}
