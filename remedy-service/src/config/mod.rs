use crate::services::providers::{CohereConfig, GenerationParams, GoogleTtsConfig};
use crate::services::providers::cohere::COHERE_API_BASE;
use crate::services::providers::google_tts::GOOGLE_TTS_BASE;
use crate::utils::{CharacterPolicy, MatchMode, ValidationConfig};
use crate::utils::identifier::{DEFAULT_MAX_LENGTH, DEFAULT_SEPARATORS};
use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RemedyConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub log_level: String,
    /// OTLP collector; tracing export is disabled when unset.
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseConfig,
    pub cohere: CohereSettings,
    pub speech: SpeechConfig,
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub run_migrations: bool,
}

#[derive(Debug, Clone)]
pub struct CohereSettings {
    pub api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub generation: GenerationParams,
}

impl CohereSettings {
    pub fn provider_config(&self) -> CohereConfig {
        CohereConfig {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpeechConfig {
    pub base_url: String,
    pub language: String,
    pub timeout_secs: u64,
}

impl SpeechConfig {
    pub fn provider_config(&self) -> GoogleTtsConfig {
        GoogleTtsConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl RemedyConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let defaults = GenerationParams::default();

        Ok(RemedyConfig {
            common: common_config,
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "remedy-service".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
            database: DatabaseConfig {
                url: Secret::new(get_env("DATABASE_URL", None, is_prod)?),
                max_connections: get_env("DATABASE_MAX_CONNECTIONS", Some("10"), is_prod)?
                    .parse()
                    .unwrap_or(10),
                min_connections: get_env("DATABASE_MIN_CONNECTIONS", Some("1"), is_prod)?
                    .parse()
                    .unwrap_or(1),
                run_migrations: env::var("DATABASE_RUN_MIGRATIONS")
                    .unwrap_or_else(|_| "true".to_string())
                    .parse()
                    .unwrap_or(true),
            },
            cohere: CohereSettings {
                api_key: Secret::new(get_env("COHERE_API_KEY", Some(""), is_prod)?),
                model: get_env("COHERE_MODEL", Some("command"), is_prod)?,
                base_url: get_env("COHERE_API_BASE", Some(COHERE_API_BASE), is_prod)?,
                timeout_secs: get_env("COHERE_TIMEOUT_SECS", Some("60"), is_prod)?
                    .parse()
                    .unwrap_or(60),
                generation: GenerationParams {
                    max_tokens: env::var("COHERE_MAX_TOKENS")
                        .ok()
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(defaults.max_tokens),
                    temperature: env::var("COHERE_TEMPERATURE")
                        .ok()
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(defaults.temperature),
                    presence_penalty: env::var("COHERE_PRESENCE_PENALTY")
                        .ok()
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(defaults.presence_penalty),
                },
            },
            speech: SpeechConfig {
                base_url: env::var("TTS_BASE_URL").unwrap_or_else(|_| GOOGLE_TTS_BASE.to_string()),
                language: env::var("TTS_LANGUAGE").unwrap_or_else(|_| "en".to_string()),
                timeout_secs: env::var("TTS_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            },
            validation: validation_from_env()?,
        })
    }
}

/// Identifier rules. A value that is set but unparseable is a configuration error.
fn validation_from_env() -> Result<ValidationConfig, AppError> {
    let separator_chars = env::var("IDENTIFIER_SEPARATOR_CHARS")
        .map(|v| v.chars().collect())
        .unwrap_or_else(|_| DEFAULT_SEPARATORS.to_vec());

    let character_policy = match env::var("IDENTIFIER_CHARACTER_POLICY") {
        Ok(v) => v.parse::<CharacterPolicy>().map_err(config_error)?,
        Err(_) => CharacterPolicy::default(),
    };

    let max_length = match env::var("IDENTIFIER_MAX_LENGTH") {
        Ok(v) => v.parse::<usize>().map_err(|e| {
            config_error(format!("IDENTIFIER_MAX_LENGTH must be a number: {}", e))
        })?,
        Err(_) => DEFAULT_MAX_LENGTH,
    };

    let match_mode = match env::var("IDENTIFIER_MATCH_MODE") {
        Ok(v) => v.parse::<MatchMode>().map_err(config_error)?,
        Err(_) => MatchMode::default(),
    };

    Ok(ValidationConfig {
        separator_chars,
        character_policy,
        max_length,
        match_mode,
    })
}

fn config_error(message: String) -> AppError {
    AppError::ConfigError(anyhow::anyhow!(message))
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
