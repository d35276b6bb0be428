use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;
use validator::Validate;

use crate::startup::AppState;
use service_core::error::AppError;

#[derive(Debug, Deserialize, Validate)]
pub struct TextToSpeechQuery {
    #[validate(length(min = 1, max = 500, message = "text must be 1-500 characters after trimming"))]
    pub text: String,
}

impl TextToSpeechQuery {
    /// The length bound applies to the text without surrounding whitespace.
    pub fn trimmed(self) -> Self {
        Self {
            text: self.text.trim().to_string(),
        }
    }
}

#[tracing::instrument(skip_all)]
pub async fn text_to_speech(
    State(state): State<AppState>,
    Query(query): Query<TextToSpeechQuery>,
) -> Result<impl IntoResponse, AppError> {
    let query = query.trimmed();
    query.validate()?;

    let audio = state.service.synthesize(&query.text).await?;

    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio))
}
