use axum::{
    extract::{Path, State},
    Json,
};

use crate::models::SummaryResponse;
use crate::startup::AppState;
use service_core::error::AppError;

/// Look up a disease and return a generated markdown summary of its remedies
/// together with the records it was built from.
#[tracing::instrument(skip(state))]
pub async fn get_summary(
    State(state): State<AppState>,
    Path(disease): Path<String>,
) -> Result<Json<SummaryResponse>, AppError> {
    let response = state.service.summarize(&disease).await?;
    Ok(Json(response))
}
