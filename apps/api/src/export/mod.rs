//! Export Adapters — three realizations of one layout contract.
//!
//! PDF and preview consume the paginated `Document`; Word consumes the same
//! section blocks unpaginated (word processors paginate themselves). The
//! adapters may differ only in pagination and encoding — section ordering,
//! content presence, and field validation all live in `layout` and are shared.

pub mod pdf;
pub mod preview;
pub mod word;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::layout::contact::{validate_for_render, RenderValidationError};
use crate::layout::{layout_document, resolve, StyleOptions};
use crate::models::resume::{ExperienceLevel, ResumeData};

// ────────────────────────────────────────────────────────────────────────────
// Artifact types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Pdf,
    Word,
}

impl ExportKind {
    pub fn content_type(self) -> &'static str {
        match self {
            ExportKind::Pdf => "application/pdf",
            ExportKind::Word => "application/vnd.ms-word",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportKind::Pdf => "pdf",
            ExportKind::Word => "doc",
        }
    }
}

/// A finished download artifact. Produced whole, in memory: a failed export
/// never leaves a partial file visible to anyone.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Bytes,
}

/// A per-run session token. The engine issues one per export; the UI layer
/// uses it to suppress duplicate triggers while a run is in flight. The
/// layout core itself needs no guard: every run owns fresh state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSession {
    pub token: Uuid,
    pub kind: ExportKind,
}

impl ExportSession {
    pub fn begin(kind: ExportKind) -> Self {
        ExportSession {
            token: Uuid::new_v4(),
            kind,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Validation(#[from] RenderValidationError),

    /// Any adapter-internal failure. Reported to the caller as a single
    /// retryable condition; details go to the log, not the user.
    #[error("Export failed: {0}")]
    Backend(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Entry points
// ────────────────────────────────────────────────────────────────────────────

/// Renders a resume to a downloadable vector PDF.
pub fn export_pdf(
    resume: &ResumeData,
    options: &StyleOptions,
    level: ExperienceLevel,
) -> Result<ExportArtifact, ExportError> {
    validate_for_render(resume)?;
    let config = resolve(options);
    let document = layout_document(resume, &config, level);
    let bytes = pdf::render_pdf_bytes(&document, &config, &resume.name)?;
    Ok(ExportArtifact {
        file_name: export_file_name(resume, ExportKind::Pdf),
        content_type: ExportKind::Pdf.content_type(),
        bytes: Bytes::from(bytes),
    })
}

/// Renders a resume to a Word-compatible HTML document.
pub fn export_word(
    resume: &ResumeData,
    options: &StyleOptions,
    level: ExperienceLevel,
) -> Result<ExportArtifact, ExportError> {
    validate_for_render(resume)?;
    let config = resolve(options);
    let html = word::render_word_html(resume, &config, level);
    Ok(ExportArtifact {
        file_name: export_file_name(resume, ExportKind::Word),
        content_type: ExportKind::Word.content_type(),
        bytes: Bytes::from(html.into_bytes()),
    })
}

/// Download file name: `<Name>_<TargetRole?>_Resume.<ext>`, spaces replaced
/// with underscores, the role segment omitted when absent.
pub fn export_file_name(resume: &ResumeData, kind: ExportKind) -> String {
    let mut segments = vec![resume.name.trim().to_string()];
    let role = resume.target_role.trim();
    if !role.is_empty() {
        segments.push(role.to_string());
    }
    segments.push("Resume".to_string());
    let stem = segments.join("_").replace(' ', "_");
    format!("{stem}.{}", kind.extension())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
