//! Axum route handlers for the writer API. Thin: guard the input, call the
//! stage function, wrap the result.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::guard::validate_topic;
use crate::state::AppState;
use crate::writer::fixer::{fix_content, FixMetadata, FixResult};
use crate::writer::refiner::refine_topic;
use crate::writer::validator::{validate_content, ValidationReport};
use crate::writer::{run_pipeline, PipelineResult};

#[derive(Debug, Deserialize)]
pub struct WriteRequest {
    pub topic: String,
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WriteResponse {
    pub status: String,
    pub run_id: Uuid,
    pub input_topic: String,
    pub refined_topic: String,
    pub content: String,
    pub validation: ValidationReport,
}

#[derive(Debug, Deserialize)]
pub struct RefineRequest {
    pub topic: String,
}

#[derive(Debug, Serialize)]
pub struct RefineResponse {
    pub status: String,
    pub input_topic: String,
    pub refined_topic: String,
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub content: String,
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub status: String,
    pub validation: ValidationReport,
}

#[derive(Debug, Deserialize)]
pub struct FixRequest {
    pub content: String,
    pub validation_report: ValidationReport,
    pub metadata: Option<FixMetadata>,
}

#[derive(Debug, Serialize)]
pub struct FixResponse {
    pub status: String,
    pub fixed_content: String,
    pub fix_summary: Vec<String>,
    pub added_faq: bool,
    pub keyword_density: f64,
}

/// POST /api/write
///
/// Full chain: refine → generate (primary, fallback once) → validate.
pub async fn handle_write(
    State(state): State<AppState>,
    Json(request): Json<WriteRequest>,
) -> Result<Json<WriteResponse>, AppError> {
    let topic = validate_topic(&request.topic)?;

    let PipelineResult {
        run_id,
        input_topic,
        refined_topic,
        content,
        validation,
    } = run_pipeline(
        state.primary.as_ref(),
        state.fallback.as_ref(),
        &state.config,
        &topic,
        request.model.as_deref(),
    )
    .await?;

    Ok(Json(WriteResponse {
        status: "success".to_string(),
        run_id,
        input_topic,
        refined_topic,
        content,
        validation,
    }))
}

/// POST /api/write/refine
pub async fn handle_refine(
    State(state): State<AppState>,
    Json(request): Json<RefineRequest>,
) -> Result<Json<RefineResponse>, AppError> {
    let topic = validate_topic(&request.topic)?;

    let refined = refine_topic(state.primary.as_ref(), &state.config, &topic).await;

    Ok(Json(RefineResponse {
        status: "success".to_string(),
        input_topic: topic,
        refined_topic: refined,
    }))
}

/// POST /api/write/validate
pub async fn handle_validate(
    State(state): State<AppState>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>, AppError> {
    if request.content.trim().is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }

    let validation = validate_content(
        state.primary.as_ref(),
        &state.config,
        &request.content,
        request.model.as_deref(),
    )
    .await;

    Ok(Json(ValidateResponse {
        status: "success".to_string(),
        validation,
    }))
}

/// POST /api/write/fix
pub async fn handle_fix(
    State(state): State<AppState>,
    Json(request): Json<FixRequest>,
) -> Result<Json<FixResponse>, AppError> {
    if request.content.trim().is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }

    let metadata = request.metadata.unwrap_or_default();

    let FixResult {
        fixed_content,
        fix_summary,
        added_faq,
        keyword_density,
    } = fix_content(
        state.primary.as_ref(),
        &state.config,
        &request.content,
        &request.validation_report,
        &metadata,
    )
    .await;

    Ok(Json(FixResponse {
        status: "success".to_string(),
        fixed_content,
        fix_summary,
        added_faq,
        keyword_density,
    }))
}
