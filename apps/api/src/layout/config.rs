//! Layout Configuration Resolver — user style options to a complete,
//! internally-consistent layout configuration.
//!
//! `resolve` is a pure function: same `StyleOptions` in, bit-identical
//! `LayoutConfig` out. Every renderer (PDF, preview, Word) consumes the same
//! resolved config, so page geometry and font sizing are computed in exactly
//! one place.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// User-facing style options
// ────────────────────────────────────────────────────────────────────────────

pub use crate::layout::font_metrics::FontFamily;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    A4,
    Letter,
}

impl PaperSize {
    /// Fixed page dimensions in millimetres: (width, height).
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::Letter => (216.0, 279.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDensity {
    Standard,
    Compact,
}

/// The style knobs the client exposes. Any numeric value is accepted here;
/// range clamping is a UI concern upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleOptions {
    pub paper_size: PaperSize,
    pub density: LayoutDensity,
    pub font_family: FontFamily,
    pub name_size_pt: f32,
    pub section_title_size_pt: f32,
    pub sub_header_size_pt: f32,
    pub body_size_pt: f32,
    pub section_spacing_mm: f32,
    pub entry_spacing_mm: f32,
}

impl Default for StyleOptions {
    fn default() -> Self {
        StyleOptions {
            paper_size: PaperSize::A4,
            density: LayoutDensity::Standard,
            font_family: FontFamily::Inter,
            name_size_pt: 20.0,
            section_title_size_pt: 12.0,
            sub_header_size_pt: 11.0,
            body_size_pt: 10.0,
            section_spacing_mm: 3.0,
            entry_spacing_mm: 2.0,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resolved configuration
// ────────────────────────────────────────────────────────────────────────────

/// A font assignment for one text role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub size_pt: f32,
    pub bold: bool,
}

/// Font specs per text role. Derived from the four user size fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontSet {
    pub name: FontSpec,
    pub contact: FontSpec,
    pub section_title: FontSpec,
    pub job_title: FontSpec,
    pub company: FontSpec,
    pub year: FontSpec,
    pub body: FontSpec,
}

/// Vertical rhythm and indentation constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpacingSet {
    pub section_before_mm: f32,
    pub section_after_mm: f32,
    pub entry_mm: f32,
    pub bullet_list_mm: f32,
    pub bullet_indent_mm: f32,
    /// Line-height multiplier applied to every font size.
    pub line_height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        RgbColor { r, g, b }
    }

    /// CSS hex form, e.g. `#1f2937`.
    pub fn css_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSet {
    pub primary: RgbColor,
    pub secondary: RgbColor,
    pub accent: RgbColor,
}

/// Page box geometry in millimetres. Content dimensions are derived once
/// here and nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_top_mm: f32,
    pub margin_bottom_mm: f32,
    pub margin_left_mm: f32,
    pub margin_right_mm: f32,
    pub content_width_mm: f32,
    pub content_height_mm: f32,
}

impl PageGeometry {
    /// Distance from the page top to the bottom edge of the content box.
    pub fn content_bottom_mm(&self) -> f32 {
        self.height_mm - self.margin_bottom_mm
    }
}

/// The fully-resolved layout configuration. Immutable per render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub page: PageGeometry,
    pub fonts: FontSet,
    pub spacing: SpacingSet,
    pub family: FontFamily,
    pub colors: ColorSet,
}

// ────────────────────────────────────────────────────────────────────────────
// Resolver
// ────────────────────────────────────────────────────────────────────────────

/// Standard margins: 0.7 inch on all sides.
const STANDARD_MARGIN_MM: f32 = 17.78;
/// Compact margins.
const COMPACT_MARGIN_MM: f32 = 12.0;

/// Contact line type is always slightly smaller than body text.
const CONTACT_SIZE_DELTA_PT: f32 = 0.5;

/// Resolves user style options into a complete layout configuration.
pub fn resolve(options: &StyleOptions) -> LayoutConfig {
    let (width_mm, height_mm) = options.paper_size.dimensions_mm();

    let (margin_mm, bullet_list_mm, bullet_indent_mm, line_height) = match options.density {
        LayoutDensity::Standard => (STANDARD_MARGIN_MM, 1.2, 5.0, 1.25),
        LayoutDensity::Compact => (COMPACT_MARGIN_MM, 0.8, 4.0, 1.15),
    };

    let page = PageGeometry {
        width_mm,
        height_mm,
        margin_top_mm: margin_mm,
        margin_bottom_mm: margin_mm,
        margin_left_mm: margin_mm,
        margin_right_mm: margin_mm,
        content_width_mm: width_mm - 2.0 * margin_mm,
        content_height_mm: height_mm - 2.0 * margin_mm,
    };

    let fonts = FontSet {
        name: FontSpec {
            size_pt: options.name_size_pt,
            bold: true,
        },
        contact: FontSpec {
            size_pt: options.body_size_pt - CONTACT_SIZE_DELTA_PT,
            bold: false,
        },
        section_title: FontSpec {
            size_pt: options.section_title_size_pt,
            bold: true,
        },
        job_title: FontSpec {
            size_pt: options.sub_header_size_pt,
            bold: true,
        },
        company: FontSpec {
            size_pt: options.body_size_pt,
            bold: false,
        },
        year: FontSpec {
            size_pt: options.body_size_pt,
            bold: false,
        },
        body: FontSpec {
            size_pt: options.body_size_pt,
            bold: false,
        },
    };

    let spacing = SpacingSet {
        section_before_mm: options.section_spacing_mm,
        section_after_mm: options.section_spacing_mm,
        entry_mm: options.entry_spacing_mm,
        bullet_list_mm,
        bullet_indent_mm,
        line_height,
    };

    LayoutConfig {
        page,
        fonts,
        spacing,
        family: options.font_family,
        colors: ColorSet {
            primary: RgbColor::new(0x11, 0x18, 0x27),
            secondary: RgbColor::new(0x4b, 0x55, 0x63),
            accent: RgbColor::new(0x25, 0x63, 0xeb),
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_deterministic() {
        let options = StyleOptions::default();
        let a = resolve(&options);
        let b = resolve(&options);
        assert_eq!(a, b, "identical inputs must yield bit-identical configs");
    }

    #[test]
    fn test_a4_geometry() {
        let config = resolve(&StyleOptions::default());
        assert_eq!(config.page.width_mm, 210.0);
        assert_eq!(config.page.height_mm, 297.0);
    }

    #[test]
    fn test_letter_geometry() {
        let options = StyleOptions {
            paper_size: PaperSize::Letter,
            ..Default::default()
        };
        let config = resolve(&options);
        assert_eq!(config.page.width_mm, 216.0);
        assert_eq!(config.page.height_mm, 279.0);
    }

    #[test]
    fn test_content_box_derivation() {
        let config = resolve(&StyleOptions::default());
        let page = config.page;
        assert!(
            (page.content_width_mm - (page.width_mm - page.margin_left_mm - page.margin_right_mm))
                .abs()
                < 1e-5
        );
        assert!(
            (page.content_height_mm
                - (page.height_mm - page.margin_top_mm - page.margin_bottom_mm))
                .abs()
                < 1e-5
        );
        assert!(
            (page.content_bottom_mm() - (page.height_mm - page.margin_bottom_mm)).abs() < 1e-5
        );
    }

    #[test]
    fn test_compact_margins_tighter_than_standard() {
        let standard = resolve(&StyleOptions::default());
        let compact = resolve(&StyleOptions {
            density: LayoutDensity::Compact,
            ..Default::default()
        });
        assert!(compact.page.margin_top_mm < standard.page.margin_top_mm);
        assert!(compact.page.content_height_mm > standard.page.content_height_mm);
        assert!(compact.spacing.line_height < standard.spacing.line_height);
        assert!(compact.spacing.bullet_list_mm < standard.spacing.bullet_list_mm);
    }

    #[test]
    fn test_contact_size_is_half_point_below_body() {
        let options = StyleOptions {
            body_size_pt: 10.5,
            ..Default::default()
        };
        let config = resolve(&options);
        assert!((config.fonts.contact.size_pt - 10.0).abs() < 1e-5);
        assert!(!config.fonts.contact.bold);
    }

    #[test]
    fn test_user_sizes_pass_through() {
        let options = StyleOptions {
            name_size_pt: 24.0,
            section_title_size_pt: 13.0,
            sub_header_size_pt: 11.5,
            body_size_pt: 10.5,
            section_spacing_mm: 4.0,
            entry_spacing_mm: 2.5,
            ..Default::default()
        };
        let config = resolve(&options);
        assert_eq!(config.fonts.name.size_pt, 24.0);
        assert_eq!(config.fonts.section_title.size_pt, 13.0);
        assert_eq!(config.fonts.job_title.size_pt, 11.5);
        assert_eq!(config.fonts.body.size_pt, 10.5);
        assert_eq!(config.spacing.section_after_mm, 4.0);
        assert_eq!(config.spacing.entry_mm, 2.5);
    }

    #[test]
    fn test_heading_roles_are_bold_body_is_not() {
        let config = resolve(&StyleOptions::default());
        assert!(config.fonts.name.bold);
        assert!(config.fonts.section_title.bold);
        assert!(config.fonts.job_title.bold);
        assert!(!config.fonts.body.bold);
        assert!(!config.fonts.company.bold);
    }

    #[test]
    fn test_css_hex() {
        assert_eq!(RgbColor::new(0x11, 0x18, 0x27).css_hex(), "#111827");
    }
}
