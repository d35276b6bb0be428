//! Third-party text generation and speech synthesis providers.
//!
//! Handlers never talk to a vendor API directly: they go through the
//! [`TextSummarizer`] and [`SpeechSynthesizer`] traits so tests can swap in
//! the mock implementations.

pub mod cohere;
pub mod google_tts;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

pub use cohere::{CohereConfig, CohereSummarizer};
pub use google_tts::{GoogleTtsConfig, GoogleTtsSynthesizer};
pub use mock::{MockSummarizer, MockSynthesizer};

/// Error type for provider operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Generation parameters for summary requests.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    /// Maximum output tokens.
    pub max_tokens: u32,

    /// Sampling temperature (0.0 - 5.0 for Cohere).
    pub temperature: f32,

    /// Penalty applied to tokens already present in prompt or output.
    pub presence_penalty: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 300,
            temperature: 0.5,
            presence_penalty: 0.3,
        }
    }
}

/// Text returned by a summarizer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderResponse {
    /// First generation, `None` when the provider returned no generations.
    pub text: Option<String>,

    /// Input tokens billed.
    pub input_tokens: u32,

    /// Output tokens billed.
    pub output_tokens: u32,
}

/// Trait for generative text providers (e.g., Cohere).
#[async_trait]
pub trait TextSummarizer: Send + Sync {
    /// Short provider name used in logs and metrics.
    fn name(&self) -> &'static str;

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError>;
}

/// Trait for text-to-speech providers.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Short provider name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Convert `text` to an MP3 byte stream in the given language.
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, ProviderError>;
}
