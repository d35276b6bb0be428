//! Record store for disease and remedy records.

use crate::models::{Disease, Remedy};
use crate::services::metrics::DB_QUERY_DURATION;
use crate::utils::{MatchMode, NormalizedIdentifier};
use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};
use uuid::Uuid;

/// Error type for record store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to connect: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),
}

/// Read access to disease and remedy records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Find the disease whose name matches `name` under `mode`.
    ///
    /// When several names match, the shortest one wins.
    async fn find_disease(
        &self,
        name: &NormalizedIdentifier,
        mode: MatchMode,
    ) -> Result<Option<Disease>, StoreError>;

    /// Remedies attached to a disease, ordered by herb name.
    async fn list_remedies(&self, disease_id: Uuid) -> Result<Vec<Remedy>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// PostgreSQL record store backed by a connection pool.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "remedy-service"))]
    pub async fn connect(
        database_url: &Secret<String>,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, StoreError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url.expose_secret())
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Migration(e.to_string()))?;
        info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    #[instrument(skip_all, fields(name = %name, mode = mode.as_str()))]
    async fn find_disease(
        &self,
        name: &NormalizedIdentifier,
        mode: MatchMode,
    ) -> Result<Option<Disease>, StoreError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_disease"])
            .start_timer();

        let disease = sqlx::query_as::<_, Disease>(
            r#"
            SELECT id, name, description
            FROM diseases
            WHERE name ILIKE $1 ESCAPE '\'
            ORDER BY char_length(name), name
            LIMIT 1
            "#,
        )
        .bind(mode.like_pattern(name))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Query(format!("Failed to find disease: {}", e)))?;

        timer.observe_duration();

        Ok(disease)
    }

    #[instrument(skip(self))]
    async fn list_remedies(&self, disease_id: Uuid) -> Result<Vec<Remedy>, StoreError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_remedies"])
            .start_timer();

        let remedies = sqlx::query_as::<_, Remedy>(
            r#"
            SELECT herb_name, preparation, dosage, safety_notes
            FROM herbal_remedies
            WHERE disease_id = $1
            ORDER BY herb_name
            "#,
        )
        .bind(disease_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Query(format!("Failed to list remedies: {}", e)))?;

        timer.observe_duration();

        Ok(remedies)
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), StoreError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["health_check"])
            .start_timer();

        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Query(format!("Health check failed: {}", e)))?;

        timer.observe_duration();
        Ok(())
    }
}
