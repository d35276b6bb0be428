//! Application startup and lifecycle management.

use crate::config::RemedyConfig;
use crate::handlers;
use crate::services::metrics::init_metrics;
use crate::services::providers::{
    CohereSummarizer, GoogleTtsSynthesizer, SpeechSynthesizer, TextSummarizer,
};
use crate::services::{PgRecordStore, RecordStore, RemedyService};
use axum::{middleware::from_fn, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware, REQUEST_ID_HEADER};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RemedyService>,
}

impl AppState {
    pub fn new(service: RemedyService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Build the HTTP router with every route and middleware layer.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/remedies/:disease", get(handlers::get_remedies))
        .route("/cohere-summary/:disease", get(handlers::get_summary))
        .route("/text-to-speech", get(handlers::text_to_speech))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: RemedyConfig) -> Result<Self, AppError> {
        init_metrics();

        let store = PgRecordStore::connect(
            &config.database.url,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to PostgreSQL: {}", e);
            AppError::DatabaseError(anyhow::Error::new(e))
        })?;

        if config.database.run_migrations {
            store.run_migrations().await.map_err(|e| {
                tracing::error!("Failed to run database migrations: {}", e);
                AppError::DatabaseError(anyhow::Error::new(e))
            })?;
        }

        let summarizer: Arc<dyn TextSummarizer> = Arc::new(
            CohereSummarizer::new(config.cohere.provider_config())
                .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?,
        );
        tracing::info!(model = %config.cohere.model, "Initialized Cohere summarizer");

        let synthesizer: Arc<dyn SpeechSynthesizer> = Arc::new(
            GoogleTtsSynthesizer::new(config.speech.provider_config())
                .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?,
        );
        tracing::info!(language = %config.speech.language, "Initialized Google TTS synthesizer");

        tracing::info!(
            character_policy = config.validation.character_policy.as_str(),
            match_mode = config.validation.match_mode.as_str(),
            max_length = config.validation.max_length,
            separators = ?config.validation.separator_chars,
            "Identifier validation configured"
        );

        let store: Arc<dyn RecordStore> = Arc::new(store);
        let service = RemedyService::new(store, summarizer, synthesizer)
            .with_validation(config.validation.clone())
            .with_generation(config.cohere.generation.clone())
            .with_speech_language(config.speech.language.clone());

        let router = build_router(AppState::new(service));

        // Port 0 = random port for testing
        let addr = config.common.socket_addr();
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Remedy service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until `shutdown` resolves.
    pub async fn run_until_stopped<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}
