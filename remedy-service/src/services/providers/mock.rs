//! Mock provider implementations for testing.

use super::{
    GenerationParams, ProviderError, ProviderResponse, SpeechSynthesizer, TextSummarizer,
};
use async_trait::async_trait;
use std::sync::Mutex;

/// Canned reply of a [`MockSummarizer`].
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    NoGenerations,
    Fail(ProviderError),
}

/// Mock text summarizer for testing. Records every prompt it receives.
pub struct MockSummarizer {
    reply: MockReply,
    prompts: Mutex<Vec<String>>,
}

impl MockSummarizer {
    /// Always answers with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_reply(MockReply::Text(text.into()))
    }

    /// Answers successfully but with zero generations.
    pub fn empty() -> Self {
        Self::with_reply(MockReply::NoGenerations)
    }

    /// Always fails with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self::with_reply(MockReply::Fail(error))
    }

    fn with_reply(reply: MockReply) -> Self {
        Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextSummarizer for MockSummarizer {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        match &self.reply {
            MockReply::Text(text) => Ok(ProviderResponse {
                text: Some(text.clone()),
                input_tokens: prompt.len() as u32 / 4,
                output_tokens: text.len() as u32 / 4,
            }),
            MockReply::NoGenerations => Ok(ProviderResponse::default()),
            MockReply::Fail(error) => Err(error.clone()),
        }
    }
}

/// Mock speech synthesizer for testing. Records every `(text, language)` request.
pub struct MockSynthesizer {
    result: Result<Vec<u8>, ProviderError>,
    requests: Mutex<Vec<(String, String)>>,
}

impl MockSynthesizer {
    /// Always answers with `audio`.
    pub fn returning(audio: Vec<u8>) -> Self {
        Self {
            result: Ok(audio),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always fails with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self {
            result: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, ProviderError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((text.to_string(), language.to_string()));
        }
        self.result.clone()
    }
}
