//! Export and preview handlers.
//!
//! Layout and PDF generation are CPU-bound, so they run inside
//! `tokio::task::spawn_blocking` to keep the async executor unblocked. The
//! duplicate-trigger guard lives here in the route layer: the layout core is
//! pure per run and needs no locking of its own.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    extract::State,
    http::{header, HeaderName},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::preview::{render_preview, PreviewDocument, Viewport};
use crate::export::{export_pdf, export_word, ExportArtifact, ExportKind, ExportSession};
use crate::layout::StyleOptions;
use crate::models::resume::{ExperienceLevel, ResumeData};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Duplicate-export guard
// ────────────────────────────────────────────────────────────────────────────

/// Suppresses duplicate user-triggered downloads: at most one in-flight
/// export per (user, kind). Purely a UX guard, not a data-race concern.
#[derive(Clone, Default)]
pub struct ExportGuard {
    in_flight: Arc<Mutex<HashSet<(Uuid, ExportKind)>>>,
}

impl ExportGuard {
    /// Registers an export run, or fails with 409 when one is in flight.
    pub fn begin(&self, user_id: Uuid, kind: ExportKind) -> Result<ExportTicket, AppError> {
        let mut set = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !set.insert((user_id, kind)) {
            return Err(AppError::Conflict(format!(
                "A {} export is already in progress for this user",
                kind.extension()
            )));
        }
        Ok(ExportTicket {
            guard: self.clone(),
            key: (user_id, kind),
            session: ExportSession::begin(kind),
        })
    }

    fn release(&self, key: (Uuid, ExportKind)) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&key);
    }
}

/// Holds the in-flight slot for one run; released on drop, success or error.
pub struct ExportTicket {
    guard: ExportGuard,
    key: (Uuid, ExportKind),
    pub session: ExportSession,
}

impl std::fmt::Debug for ExportTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportTicket").field("key", &self.key).finish()
    }
}

impl Drop for ExportTicket {
    fn drop(&mut self) {
        self.guard.release(self.key);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub user_id: Uuid,
    pub resume: ResumeData,
    #[serde(default)]
    pub options: StyleOptions,
    pub experience_level: ExperienceLevel,
}

/// POST /api/v1/export/pdf
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    Json(req): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let ticket = state.exports.begin(req.user_id, ExportKind::Pdf)?;
    let session = ticket.session;
    let artifact = tokio::task::spawn_blocking(move || {
        export_pdf(&req.resume, &req.options, req.experience_level)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in export: {e}")))??;
    drop(ticket);
    Ok(artifact_response(artifact, session))
}

/// POST /api/v1/export/word
pub async fn handle_export_word(
    State(state): State<AppState>,
    Json(req): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let ticket = state.exports.begin(req.user_id, ExportKind::Word)?;
    let session = ticket.session;
    let artifact = tokio::task::spawn_blocking(move || {
        export_word(&req.resume, &req.options, req.experience_level)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in export: {e}")))??;
    drop(ticket);
    Ok(artifact_response(artifact, session))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub resume: ResumeData,
    #[serde(default)]
    pub options: StyleOptions,
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub viewport: Option<Viewport>,
}

/// POST /api/v1/preview
pub async fn handle_preview(
    State(_state): State<AppState>,
    Json(req): Json<PreviewRequest>,
) -> Result<Json<PreviewDocument>, AppError> {
    let preview = tokio::task::spawn_blocking(move || {
        render_preview(&req.resume, &req.options, req.experience_level, req.viewport)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in preview: {e}")))??;
    Ok(Json(preview))
}

fn artifact_response(artifact: ExportArtifact, session: ExportSession) -> Response {
    (
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.file_name),
            ),
            (
                // Session token for the UI layer's duplicate-trigger handling.
                HeaderName::from_static("x-export-session"),
                session.token.to_string(),
            ),
        ],
        artifact.bytes,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_rejects_duplicate_kind_for_same_user() {
        let guard = ExportGuard::default();
        let user = Uuid::new_v4();
        let ticket = guard.begin(user, ExportKind::Pdf).expect("first begin");
        let err = guard.begin(user, ExportKind::Pdf).expect_err("duplicate");
        assert!(matches!(err, AppError::Conflict(_)));
        drop(ticket);
        // Released on drop: a new run may start.
        guard.begin(user, ExportKind::Pdf).expect("after release");
    }

    #[test]
    fn test_guard_allows_pdf_and_word_concurrently() {
        let guard = ExportGuard::default();
        let user = Uuid::new_v4();
        let _pdf = guard.begin(user, ExportKind::Pdf).expect("pdf");
        let _word = guard
            .begin(user, ExportKind::Word)
            .expect("word export is independently guarded");
    }

    #[test]
    fn test_guard_is_per_user() {
        let guard = ExportGuard::default();
        let _a = guard.begin(Uuid::new_v4(), ExportKind::Pdf).expect("user a");
        let _b = guard.begin(Uuid::new_v4(), ExportKind::Pdf).expect("user b");
    }

    #[test]
    fn test_ticket_carries_fresh_session_token() {
        let guard = ExportGuard::default();
        let t1 = guard.begin(Uuid::new_v4(), ExportKind::Pdf).expect("t1");
        let t2 = guard.begin(Uuid::new_v4(), ExportKind::Pdf).expect("t2");
        assert_ne!(t1.session.token, t2.session.token);
    }
}
