//! Interactive preview adapter.
//!
//! Converts the paginated document to pixel geometry at 96 DPI and computes
//! the uniform scale factor that fits a page into the client's container.
//! Pages are never upscaled: the factor is clamped to 1.0. The client
//! re-requests (or re-applies `fit_scale`) whenever its container resizes.

use serde::{Deserialize, Serialize};

use crate::export::ExportError;
use crate::layout::blocks::DrawOp;
use crate::layout::config::RgbColor;
use crate::layout::contact::validate_for_render;
use crate::layout::{layout_document, resolve, StyleOptions};
use crate::models::resume::{ExperienceLevel, ResumeData};

/// Millimetres to CSS pixels at 96 DPI.
pub const MM_TO_PX: f32 = 96.0 / 25.4;
/// Points to CSS pixels (96 px per 72 pt inch).
const PT_TO_PX: f32 = 96.0 / 72.0;

// ────────────────────────────────────────────────────────────────────────────
// Wire model
// ────────────────────────────────────────────────────────────────────────────

/// The client container the preview must fit into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width_px: f32,
    pub height_px: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PreviewOp {
    Text {
        x_px: f32,
        y_px: f32,
        text: String,
        size_px: f32,
        bold: bool,
        color: RgbColor,
    },
    Rule {
        x_px: f32,
        y_px: f32,
        width_px: f32,
        color: RgbColor,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewPage {
    pub number: u32,
    pub ops: Vec<PreviewOp>,
}

/// The full preview model: 1:1 pixel pages plus the fit scale and its
/// human-readable zoom percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewDocument {
    pub page_width_px: f32,
    pub page_height_px: f32,
    pub pages: Vec<PreviewPage>,
    pub scale: f32,
    pub zoom_percent: u16,
    pub font_family: String,
    pub font_fallback: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

/// The uniform scale that fits a page into the viewport, clamped to 1.0.
pub fn fit_scale(page_width_px: f32, page_height_px: f32, viewport: Viewport) -> f32 {
    let horizontal = viewport.width_px / page_width_px;
    let vertical = viewport.height_px / page_height_px;
    horizontal.min(vertical).min(1.0)
}

/// Renders the preview model for a resume. `viewport` of `None` previews at
/// natural size (scale 1.0).
pub fn render_preview(
    resume: &ResumeData,
    options: &StyleOptions,
    level: ExperienceLevel,
    viewport: Option<Viewport>,
) -> Result<PreviewDocument, ExportError> {
    validate_for_render(resume)?;
    let config = resolve(options);
    let document = layout_document(resume, &config, level);

    let page_width_px = document.page_width_mm * MM_TO_PX;
    let page_height_px = document.page_height_mm * MM_TO_PX;
    let scale = viewport.map_or(1.0, |v| fit_scale(page_width_px, page_height_px, v));

    let pages = document
        .pages
        .iter()
        .map(|page| PreviewPage {
            number: page.number,
            ops: page.ops.iter().map(preview_op).collect(),
        })
        .collect();

    Ok(PreviewDocument {
        page_width_px,
        page_height_px,
        pages,
        scale,
        zoom_percent: (scale * 100.0).round() as u16,
        font_family: config.family.display_name().to_string(),
        font_fallback: config.family.css_fallback().to_string(),
    })
}

fn preview_op(op: &DrawOp) -> PreviewOp {
    match op {
        DrawOp::Text {
            x_mm,
            y_mm,
            text,
            size_pt,
            bold,
            color,
        } => PreviewOp::Text {
            x_px: x_mm * MM_TO_PX,
            y_px: y_mm * MM_TO_PX,
            text: text.clone(),
            size_px: size_pt * PT_TO_PX,
            bold: *bold,
            color: *color,
        },
        DrawOp::Rule {
            x_mm,
            y_mm,
            width_mm,
            color,
        } => PreviewOp::Rule {
            x_px: x_mm * MM_TO_PX,
            y_px: y_mm * MM_TO_PX,
            width_px: width_mm * MM_TO_PX,
            color: *color,
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_resume() -> ResumeData {
        ResumeData {
            name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            summary: "Engineer.".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_a4_page_pixel_dimensions() {
        let preview = render_preview(
            &make_resume(),
            &StyleOptions::default(),
            ExperienceLevel::Experienced,
            None,
        )
        .expect("preview");
        // 210mm at 96 DPI is ~793.7px, 297mm is ~1122.5px.
        assert!((preview.page_width_px - 793.7).abs() < 0.5);
        assert!((preview.page_height_px - 1122.5).abs() < 0.5);
        assert_eq!(preview.scale, 1.0);
        assert_eq!(preview.zoom_percent, 100);
    }

    #[test]
    fn test_fit_scale_never_upscales() {
        let scale = fit_scale(800.0, 1100.0, Viewport {
            width_px: 4000.0,
            height_px: 4000.0,
        });
        assert_eq!(scale, 1.0, "large containers clamp to 1.0");
    }

    #[test]
    fn test_fit_scale_shrinks_to_smaller_dimension() {
        let scale = fit_scale(800.0, 1100.0, Viewport {
            width_px: 400.0,
            height_px: 1100.0,
        });
        assert!((scale - 0.5).abs() < 1e-5, "width is the binding constraint");
    }

    #[test]
    fn test_viewport_flows_into_zoom_readout() {
        let preview = render_preview(
            &make_resume(),
            &StyleOptions::default(),
            ExperienceLevel::Experienced,
            Some(Viewport {
                width_px: 397.0,
                height_px: 10_000.0,
            }),
        )
        .expect("preview");
        assert!(preview.scale < 1.0);
        assert_eq!(preview.zoom_percent, (preview.scale * 100.0).round() as u16);
    }

    #[test]
    fn test_preview_blocks_invalid_resume() {
        let resume = ResumeData {
            name: String::new(),
            email: "jane@x.com".to_string(),
            ..Default::default()
        };
        let err = render_preview(
            &resume,
            &StyleOptions::default(),
            ExperienceLevel::Experienced,
            None,
        )
        .expect_err("missing name must block preview");
        assert!(matches!(err, ExportError::Validation(_)));
    }

    #[test]
    fn test_preview_is_deterministic() {
        let resume = make_resume();
        let options = StyleOptions::default();
        let a = render_preview(&resume, &options, ExperienceLevel::Experienced, None).unwrap();
        let b = render_preview(&resume, &options, ExperienceLevel::Experienced, None).unwrap();
        assert_eq!(a, b);
    }
}
