//! Google Translate text-to-speech provider.
//!
//! The public `translate_tts` endpoint answers with MP3 audio but only accepts
//! short inputs, so text is split into chunks on whitespace and the MP3
//! segments are concatenated in order.

use super::{ProviderError, SpeechSynthesizer};
use async_trait::async_trait;
use reqwest::Client;
use service_core::observability::TracedClientExt;
use std::time::Duration;

/// Google Translate base URL.
pub const GOOGLE_TTS_BASE: &str = "https://translate.google.com";

/// Maximum characters the endpoint accepts per request.
pub const MAX_CHUNK_CHARS: usize = 100;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Google TTS provider configuration.
#[derive(Debug, Clone)]
pub struct GoogleTtsConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GoogleTtsConfig {
    fn default() -> Self {
        Self {
            base_url: GOOGLE_TTS_BASE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Google Translate TTS synthesizer.
pub struct GoogleTtsSynthesizer {
    config: GoogleTtsConfig,
    client: Client,
}

impl GoogleTtsSynthesizer {
    pub fn new(config: GoogleTtsConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    fn api_url(&self) -> String {
        format!(
            "{}/translate_tts",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        language: &str,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>, ProviderError> {
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();

        let response = self
            .client
            .traced_get(&self.api_url())
            .header("Referer", "https://translate.google.com/")
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", language),
                ("q", chunk),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }
            return Err(ProviderError::ApiError(format!(
                "Google TTS error {} for chunk {}",
                status, idx
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::NetworkError(e.without_url().to_string()))?;

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTtsSynthesizer {
    fn name(&self) -> &'static str {
        "google_tts"
    }

    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, ProviderError> {
        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(ProviderError::InvalidRequest(
                "No text to speak".to_string(),
            ));
        }

        tracing::debug!(
            language = %language,
            text_len = text.chars().count(),
            chunks = chunks.len(),
            "Sending request to Google TTS"
        );

        let total = chunks.len();
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let segment = self.fetch_chunk(chunk, language, idx, total).await?;
            if segment.is_empty() {
                return Err(ProviderError::ApiError(format!(
                    "Google TTS returned no audio for chunk {}",
                    idx
                )));
            }
            audio.extend_from_slice(&segment);
        }

        Ok(audio)
    }
}

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Chunks break on whitespace; a single word longer than `max_chars` is cut
/// into `max_chars`-sized pieces. Whitespace runs collapse to one space.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() {
            word_len
        } else {
            current_len + 1 + word_len
        };

        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_len = needed;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
