//! Resume intake handlers: PDF import, optimization, and draft snapshots.

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeData;
use crate::services::drafts::{DraftSnapshot, SaveOutcome};
use crate::services::optimizer::OptimizeRequest;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

// ────────────────────────────────────────────────────────────────────────────
// Import
// ────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub raw_text: String,
}

/// POST /api/v1/import
/// Accepts a multipart PDF upload and returns its extracted text, ready to
/// feed the optimizer as `rawResumeText`.
pub async fn handle_import(
    State(_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
        if data.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }

        // Text extraction is CPU-bound.
        let raw_text = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&data)
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in import: {e}")))?
        .map_err(|e| {
            AppError::UnprocessableEntity(format!("Could not extract text from the PDF: {e}"))
        })?;

        return Ok(Json(ImportResponse { raw_text }));
    }

    Err(AppError::Validation(
        "Multipart field 'file' is required".to_string(),
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Optimize
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeApiRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub request: OptimizeRequest,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    pub resume: ResumeData,
    pub remaining_credits: i64,
}

/// POST /api/v1/optimize
/// Consumes one credit, then runs the optimizer. Credit consumption comes
/// first so a user cannot queue unlimited optimizer calls for free; the
/// billing service refunds on optimizer failure.
pub async fn handle_optimize(
    State(state): State<AppState>,
    Json(req): Json<OptimizeApiRequest>,
) -> Result<Json<OptimizeResponse>, AppError> {
    if req.request.raw_resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Resume text is required before optimizing".to_string(),
        ));
    }
    if req.request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "A job description is required before optimizing".to_string(),
        ));
    }

    let outcome = state.credits.consume_one(req.user_id).await?;
    let resume = state.optimizer.optimize(&req.request).await?;

    Ok(Json(OptimizeResponse {
        resume,
        remaining_credits: outcome.remaining_credits,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Drafts
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSaveRequest {
    pub user_id: Uuid,
    pub snapshot: Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSaveResponse {
    pub outcome: SaveOutcome,
}

/// PUT /api/v1/drafts
pub async fn handle_save_draft(
    State(state): State<AppState>,
    Json(req): Json<DraftSaveRequest>,
) -> Result<Json<DraftSaveResponse>, AppError> {
    let outcome = state.drafts.save(req.user_id, &req.snapshot).await?;
    Ok(Json(DraftSaveResponse { outcome }))
}

/// GET /api/v1/drafts
pub async fn handle_load_draft(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<DraftSnapshot>, AppError> {
    let snapshot = state
        .drafts
        .load(params.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No draft saved for this user".to_string()))?;
    Ok(Json(snapshot))
}
