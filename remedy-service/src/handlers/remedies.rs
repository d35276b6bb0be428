use axum::{
    extract::{Path, State},
    Json,
};

use crate::models::RemedyLookup;
use crate::startup::AppState;
use service_core::error::AppError;

#[tracing::instrument(skip(state))]
pub async fn get_remedies(
    State(state): State<AppState>,
    Path(disease): Path<String>,
) -> Result<Json<RemedyLookup>, AppError> {
    let lookup = state.service.lookup(&disease).await?;
    Ok(Json(lookup))
}
