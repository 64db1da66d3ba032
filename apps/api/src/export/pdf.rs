//! Vector PDF adapter — draws the paginated document with printpdf.
//!
//! The adapter only transcodes: every position and size comes from the
//! `Document` draw ops, which were measured by the shared layout core. Fonts
//! map to PDF builtin families (no embedding); the metric tables are close
//! enough that builtin rendering stays inside the measured boxes.

use std::io::{BufWriter, Cursor};

use printpdf::{BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, Point, Rgb};

use crate::export::ExportError;
use crate::layout::blocks::DrawOp;
use crate::layout::config::{LayoutConfig, RgbColor};
use crate::layout::font_metrics::{FontFamily, PT_TO_MM};
use crate::layout::paginate::Document;

/// Fraction of the font size from the top of a line box to its baseline.
const BASELINE_RATIO: f32 = 0.8;
/// Stroke width for horizontal rules, in points.
const RULE_THICKNESS_PT: f32 = 0.6;

/// The builtin (regular, bold) pair standing in for a resume font family.
fn builtin_fonts(family: FontFamily) -> (BuiltinFont, BuiltinFont) {
    match family {
        FontFamily::Inter | FontFamily::Lato | FontFamily::Oswald => {
            (BuiltinFont::Helvetica, BuiltinFont::HelveticaBold)
        }
        FontFamily::EbGaramond | FontFamily::ComputerModern => {
            (BuiltinFont::TimesRoman, BuiltinFont::TimesBold)
        }
    }
}

/// Any printpdf-internal failure collapses to the one retryable export error.
fn backend_error<E: std::fmt::Display>(e: E) -> ExportError {
    ExportError::Backend(format!("PDF engine error: {e}"))
}

fn pdf_color(color: RgbColor) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(color.r) / 255.0,
        f32::from(color.g) / 255.0,
        f32::from(color.b) / 255.0,
        None,
    ))
}

/// Renders the paginated document to PDF bytes.
pub(crate) fn render_pdf_bytes(
    document: &Document,
    config: &LayoutConfig,
    title: &str,
) -> Result<Vec<u8>, ExportError> {
    let width = Mm(document.page_width_mm);
    let height = Mm(document.page_height_mm);

    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, "Layer 1");

    let (regular_builtin, bold_builtin) = builtin_fonts(config.family);
    let regular = doc.add_builtin_font(regular_builtin).map_err(backend_error)?;
    let bold = doc.add_builtin_font(bold_builtin).map_err(backend_error)?;

    for (i, page) in document.pages.iter().enumerate() {
        let layer = if i == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = doc.add_page(width, height, "Layer 1");
            doc.get_page(page_idx).get_layer(layer_idx)
        };

        for op in &page.ops {
            match op {
                DrawOp::Text {
                    x_mm,
                    y_mm,
                    text,
                    size_pt,
                    bold: is_bold,
                    color,
                } => {
                    draw_text(
                        &layer,
                        text,
                        *x_mm,
                        *y_mm,
                        *size_pt,
                        if *is_bold { &bold } else { &regular },
                        *color,
                        document.page_height_mm,
                    );
                }
                DrawOp::Rule {
                    x_mm,
                    y_mm,
                    width_mm,
                    color,
                } => {
                    draw_rule(
                        &layer,
                        *x_mm,
                        *y_mm,
                        *width_mm,
                        *color,
                        document.page_height_mm,
                    );
                }
            }
        }
    }

    let mut buf = Vec::new();
    {
        let cursor = Cursor::new(&mut buf);
        let mut writer = BufWriter::new(cursor);
        doc.save(&mut writer).map_err(backend_error)?;
    }
    Ok(buf)
}

/// Draws one text run. Layout y is the top of the line box measured from the
/// page top; PDF wants the baseline measured from the page bottom.
#[allow(clippy::too_many_arguments)]
fn draw_text(
    layer: &printpdf::PdfLayerReference,
    text: &str,
    x_mm: f32,
    y_mm: f32,
    size_pt: f32,
    font: &IndirectFontRef,
    color: RgbColor,
    page_height_mm: f32,
) {
    let baseline_from_top = y_mm + size_pt * PT_TO_MM * BASELINE_RATIO;
    layer.set_fill_color(pdf_color(color));
    layer.use_text(
        text,
        size_pt,
        Mm(x_mm),
        Mm(page_height_mm - baseline_from_top),
        font,
    );
}

fn draw_rule(
    layer: &printpdf::PdfLayerReference,
    x_mm: f32,
    y_mm: f32,
    width_mm: f32,
    color: RgbColor,
    page_height_mm: f32,
) {
    let y = page_height_mm - y_mm;
    layer.set_outline_color(pdf_color(color));
    layer.set_outline_thickness(RULE_THICKNESS_PT);
    let points = vec![
        (Point::new(Mm(x_mm), Mm(y)), false),
        (Point::new(Mm(x_mm + width_mm), Mm(y)), false),
    ];
    let line = Line {
        points,
        is_closed: false,
    };
    layer.add_line(line);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::config::{resolve, StyleOptions};
    use crate::layout::layout_document;
    use crate::models::resume::{Bullet, ExperienceLevel, ExperienceEntry, ResumeData};

    fn make_resume() -> ResumeData {
        ResumeData {
            name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            summary: "Engineer.".to_string(),
            work_experience: vec![ExperienceEntry {
                title: "Engineer".to_string(),
                company: "Initech".to_string(),
                duration: "2020 - 2024".to_string(),
                bullets: vec![Bullet::from("Shipped a service")],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_pdf_bytes_have_magic_header() {
        let config = resolve(&StyleOptions::default());
        let doc = layout_document(&make_resume(), &config, ExperienceLevel::Experienced);
        let bytes = render_pdf_bytes(&doc, &config, "Jane Doe").expect("render");
        assert!(bytes.starts_with(b"%PDF"), "output must be a PDF stream");
        assert!(bytes.len() > 500, "suspiciously small PDF output");
    }

    #[test]
    fn test_serif_families_map_to_times() {
        let (regular, bold) = builtin_fonts(FontFamily::EbGaramond);
        assert!(matches!(regular, BuiltinFont::TimesRoman));
        assert!(matches!(bold, BuiltinFont::TimesBold));
        let (regular, _) = builtin_fonts(FontFamily::Inter);
        assert!(matches!(regular, BuiltinFont::Helvetica));
    }
}
