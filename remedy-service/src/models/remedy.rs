//! Herbal remedy model and lookup responses.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row of the `herbal_remedies` table (without its keys).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Remedy {
    pub herb_name: String,
    pub preparation: String,
    pub dosage: String,
    pub safety_notes: Option<String>,
}

impl Remedy {
    /// Safety notes, if present and not blank.
    pub fn safety_notes(&self) -> Option<&str> {
        self.safety_notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
    }
}

/// Result of `GET /remedies/{disease}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemedyLookup {
    /// The normalized disease name that was looked up.
    pub disease: String,
    /// Description of the matched disease, empty when the record has none.
    pub description: String,
    pub remedies: Vec<Remedy>,
}

/// Result of `GET /cohere-summary/{disease}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
    pub original_data: RemedyLookup,
}
