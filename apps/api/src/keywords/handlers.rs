//! Axum route handlers for the keyword API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::guard::validate_topic;
use crate::keywords::analyzer::{analyze_keywords, KeywordInsight};
use crate::state::AppState;

const MIN_RESULTS: usize = 1;
const MAX_RESULTS: usize = 50;
const DEFAULT_RESULTS: usize = 10;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub topic: String,
    pub max_results: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub status: String,
    pub topic: String,
    pub keywords: Vec<KeywordInsight>,
    pub total: usize,
}

/// POST /api/keywords/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let topic = validate_topic(&request.topic)?;

    let max_results = request.max_results.unwrap_or(DEFAULT_RESULTS);
    if !(MIN_RESULTS..=MAX_RESULTS).contains(&max_results) {
        return Err(AppError::Validation(format!(
            "Invalid max_results: {max_results} (must be between {MIN_RESULTS} and {MAX_RESULTS})"
        )));
    }

    let keywords =
        analyze_keywords(state.primary.as_ref(), &state.config, &topic, max_results).await;

    Ok(Json(AnalyzeResponse {
        status: "success".to_string(),
        total: keywords.len(),
        topic,
        keywords,
    }))
}
