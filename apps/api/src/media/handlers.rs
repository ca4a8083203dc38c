//! Axum route handlers for the media API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::guard::sanitize_input;
use crate::media::thumbnail::{generate_thumbnail, Thumbnail};
use crate::state::AppState;

const PROMPT_MAX_LENGTH: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct ThumbnailRequest {
    pub prompt: String,
    pub size: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ThumbnailResponse {
    pub status: String,
    #[serde(flatten)]
    pub thumbnail: Thumbnail,
}

/// POST /api/media/thumbnail
pub async fn handle_thumbnail(
    State(state): State<AppState>,
    Json(request): Json<ThumbnailRequest>,
) -> Result<Json<ThumbnailResponse>, AppError> {
    let prompt = sanitize_input(&request.prompt, Some(PROMPT_MAX_LENGTH))?;

    let thumbnail = generate_thumbnail(
        state.images.as_ref(),
        &prompt,
        request.size.as_deref(),
    )
    .await?;

    Ok(Json(ThumbnailResponse {
        status: "success".to_string(),
        thumbnail,
    }))
}
