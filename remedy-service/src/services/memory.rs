//! In-memory record store for testing.

use crate::models::{Disease, Remedy};
use crate::services::database::{RecordStore, StoreError};
use crate::utils::{MatchMode, NormalizedIdentifier};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

/// Record store holding a fixed set of diseases. Matches the way
/// [`PgRecordStore`](crate::services::PgRecordStore) does: case-insensitive,
/// shortest matching name first.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: Vec<(Disease, Vec<Remedy>)>,
    failure: Option<String>,
    queries: AtomicUsize,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_disease(mut self, disease: Disease, remedies: Vec<Remedy>) -> Self {
        self.records.push((disease, remedies));
        self
    }

    /// Number of queries served so far (health checks excluded).
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), StoreError> {
        match &self.failure {
            Some(message) => Err(StoreError::Query(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn find_disease(
        &self,
        name: &NormalizedIdentifier,
        mode: MatchMode,
    ) -> Result<Option<Disease>, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.check()?;

        let needle = name.as_str();
        let found = self
            .records
            .iter()
            .map(|(disease, _)| disease)
            .filter(|disease| {
                let stored = disease.name.to_lowercase();
                match mode {
                    MatchMode::Exact => stored == needle,
                    MatchMode::Contains => stored.contains(needle),
                }
            })
            .min_by(|a, b| {
                a.name
                    .chars()
                    .count()
                    .cmp(&b.name.chars().count())
                    .then_with(|| a.name.cmp(&b.name))
            })
            .cloned();

        Ok(found)
    }

    async fn list_remedies(&self, disease_id: Uuid) -> Result<Vec<Remedy>, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.check()?;

        let mut remedies = self
            .records
            .iter()
            .find(|(disease, _)| disease.id == disease_id)
            .map(|(_, remedies)| remedies.clone())
            .unwrap_or_default();
        remedies.sort_by(|a, b| a.herb_name.cmp(&b.herb_name));

        Ok(remedies)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.check()
    }
}
