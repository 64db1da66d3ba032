//! Content blocks and the shared draw-op contract.
//!
//! Section renderers produce `ContentBlock`s; `shape_block` turns each block
//! into measured `ShapedUnit`s through the one font-metrics sizing path, and
//! the pagination engine positions those units as absolute `DrawOp`s. There
//! is no separate "estimate" model: the shaped geometry IS both the measured
//! height and the drawn output, so pagination can never disagree with
//! rendering about how tall something is.

use serde::{Deserialize, Serialize};

use crate::layout::config::{FontSet, FontSpec, LayoutConfig, RgbColor};
use crate::layout::font_metrics::{get_metrics, line_height_mm, FontMetricTable};

/// Vertical gap between a section title and its underline rule.
const HEADING_RULE_GAP_MM: f32 = 0.8;
/// Space reserved below the rule inside the heading unit.
const HEADING_RULE_PAD_MM: f32 = 0.6;
/// The bullet glyph shared by every renderer.
pub const BULLET_GLYPH: &str = "\u{2022}";

// ────────────────────────────────────────────────────────────────────────────
// Logical text roles
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FontRole {
    Name,
    Contact,
    SectionTitle,
    JobTitle,
    Company,
    Year,
    Body,
}

impl FontRole {
    pub fn spec(self, fonts: &FontSet) -> FontSpec {
        match self {
            FontRole::Name => fonts.name,
            FontRole::Contact => fonts.contact,
            FontRole::SectionTitle => fonts.section_title,
            FontRole::JobTitle => fonts.job_title,
            FontRole::Company => fonts.company,
            FontRole::Year => fonts.year,
            FontRole::Body => fonts.body,
        }
    }

    /// Secondary roles render in the muted color; everything else in primary.
    fn color(self, config: &LayoutConfig) -> RgbColor {
        match self {
            FontRole::Contact | FontRole::Company | FontRole::Year => config.colors.secondary,
            _ => config.colors.primary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

// ────────────────────────────────────────────────────────────────────────────
// Content blocks (renderer output)
// ────────────────────────────────────────────────────────────────────────────

/// One bullet item: optional bold lead plus body text, wrapped as a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletItem {
    pub lead: Option<String>,
    pub text: String,
}

impl BulletItem {
    pub fn plain(text: impl Into<String>) -> Self {
        BulletItem {
            lead: None,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockKind {
    /// Upper-cased section title with a full-width underline rule.
    SectionHeading { title: String },
    /// Wrapped text in a single role.
    Paragraph {
        role: FontRole,
        text: String,
        align: TextAlign,
    },
    /// One visual line: left text (with an optional secondary run in the
    /// company role directly after it) plus right-aligned text (dates, years).
    EntryRow {
        left: String,
        left_role: FontRole,
        left_detail: String,
        right: String,
        right_role: FontRole,
    },
    /// Bold label followed by wrapped text; continuation lines return to the
    /// left edge (hanging first line, no re-indent).
    LabeledLine { label: String, rest: String },
    /// Bullet list, splittable across pages at item granularity only.
    BulletList { items: Vec<BulletItem> },
}

/// A renderer-produced unit of content with its pagination policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub kind: BlockKind,
    /// Never place this block at the bottom of a page without room for at
    /// least the first line of the following block.
    pub keep_with_next: bool,
    /// Vertical gap after the block, in millimetres.
    pub gap_after_mm: f32,
}

impl ContentBlock {
    pub fn new(kind: BlockKind, gap_after_mm: f32) -> Self {
        ContentBlock {
            kind,
            keep_with_next: false,
            gap_after_mm,
        }
    }

    pub fn keep_with_next(mut self) -> Self {
        self.keep_with_next = true;
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Shaped output (measured geometry)
// ────────────────────────────────────────────────────────────────────────────

/// A positioned text run, relative to its unit's top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub dx_mm: f32,
    pub dy_mm: f32,
    pub text: String,
    pub size_pt: f32,
    pub bold: bool,
    pub color: RgbColor,
}

/// A horizontal rule, relative to its unit's top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleRun {
    pub dx_mm: f32,
    pub dy_mm: f32,
    pub width_mm: f32,
    pub color: RgbColor,
}

/// The smallest indivisible placement unit. Atomic blocks shape to one unit;
/// bullet lists shape to one unit per item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapedUnit {
    pub runs: Vec<TextRun>,
    pub rules: Vec<RuleRun>,
    pub height_mm: f32,
}

/// A fully measured block, ready for placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapedBlock {
    pub units: Vec<ShapedUnit>,
    /// Whether units may be distributed across a page break.
    pub splittable: bool,
    pub keep_with_next: bool,
    pub gap_after_mm: f32,
    /// Gap between consecutive units placed on the same page.
    pub unit_gap_mm: f32,
}

impl ShapedBlock {
    /// Height of the first unit — the paginator's look-ahead quantum.
    pub fn first_unit_height_mm(&self) -> f32 {
        self.units.first().map_or(0.0, |u| u.height_mm)
    }

    /// Total content height across units, excluding inter-unit gaps.
    pub fn content_height_mm(&self) -> f32 {
        self.units.iter().map(|u| u.height_mm).sum()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Absolute draw operations (adapter input)
// ────────────────────────────────────────────────────────────────────────────

/// A primitive draw operation in page coordinates (mm from the page's
/// top-left corner). This is the entire contract between the pagination
/// engine and the PDF/preview adapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum DrawOp {
    Text {
        x_mm: f32,
        y_mm: f32,
        text: String,
        size_pt: f32,
        bold: bool,
        color: RgbColor,
    },
    Rule {
        x_mm: f32,
        y_mm: f32,
        width_mm: f32,
        color: RgbColor,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Shaping
// ────────────────────────────────────────────────────────────────────────────

/// Shapes a content block into measured units using the shared sizing path.
pub fn shape_block(block: &ContentBlock, config: &LayoutConfig) -> ShapedBlock {
    let metrics = get_metrics(config.family);
    let content_w = config.page.content_width_mm;

    let (units, splittable, unit_gap_mm) = match &block.kind {
        BlockKind::SectionHeading { title } => (
            vec![shape_section_heading(title, config, content_w)],
            false,
            0.0,
        ),
        BlockKind::Paragraph { role, text, align } => (
            vec![shape_paragraph(*role, text, *align, config, metrics, content_w)],
            false,
            0.0,
        ),
        BlockKind::EntryRow {
            left,
            left_role,
            left_detail,
            right,
            right_role,
        } => (
            vec![shape_entry_row(
                left, *left_role, left_detail, right, *right_role, config, metrics, content_w,
            )],
            false,
            0.0,
        ),
        BlockKind::LabeledLine { label, rest } => (
            vec![shape_labeled_line(label, rest, config, metrics, content_w)],
            false,
            0.0,
        ),
        BlockKind::BulletList { items } => (
            items
                .iter()
                .map(|item| shape_bullet_item(item, config, metrics, content_w))
                .collect(),
            true,
            config.spacing.bullet_list_mm,
        ),
    };

    ShapedBlock {
        units,
        splittable,
        keep_with_next: block.keep_with_next,
        gap_after_mm: block.gap_after_mm,
        unit_gap_mm,
    }
}

fn line_h(spec: FontSpec, config: &LayoutConfig) -> f32 {
    line_height_mm(spec.size_pt, config.spacing.line_height)
}

fn shape_section_heading(title: &str, config: &LayoutConfig, content_w: f32) -> ShapedUnit {
    let spec = config.fonts.section_title;
    let lh = line_h(spec, config);
    let rule_y = lh + HEADING_RULE_GAP_MM;

    ShapedUnit {
        runs: vec![TextRun {
            dx_mm: 0.0,
            dy_mm: 0.0,
            text: title.to_string(),
            size_pt: spec.size_pt,
            bold: spec.bold,
            color: FontRole::SectionTitle.color(config),
        }],
        rules: vec![RuleRun {
            dx_mm: 0.0,
            dy_mm: rule_y,
            width_mm: content_w,
            color: config.colors.primary,
        }],
        height_mm: rule_y + HEADING_RULE_PAD_MM,
    }
}

fn shape_paragraph(
    role: FontRole,
    text: &str,
    align: TextAlign,
    config: &LayoutConfig,
    metrics: &FontMetricTable,
    content_w: f32,
) -> ShapedUnit {
    let spec = role.spec(&config.fonts);
    let lh = line_h(spec, config);
    let color = role.color(config);
    let lines = metrics.wrap(text, spec.size_pt, content_w);

    let runs = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let line_w = metrics.text_width_mm(line, spec.size_pt);
            let dx_mm = match align {
                TextAlign::Left => 0.0,
                TextAlign::Center => ((content_w - line_w) / 2.0).max(0.0),
                TextAlign::Right => (content_w - line_w).max(0.0),
            };
            TextRun {
                dx_mm,
                dy_mm: i as f32 * lh,
                text: line.clone(),
                size_pt: spec.size_pt,
                bold: spec.bold,
                color,
            }
        })
        .collect::<Vec<_>>();

    ShapedUnit {
        height_mm: runs.len() as f32 * lh,
        runs,
        rules: vec![],
    }
}

fn shape_entry_row(
    left: &str,
    left_role: FontRole,
    left_detail: &str,
    right: &str,
    right_role: FontRole,
    config: &LayoutConfig,
    metrics: &FontMetricTable,
    content_w: f32,
) -> ShapedUnit {
    let left_spec = left_role.spec(&config.fonts);
    let right_spec = right_role.spec(&config.fonts);
    let mut runs = Vec::new();

    if !left.is_empty() {
        runs.push(TextRun {
            dx_mm: 0.0,
            dy_mm: 0.0,
            text: left.to_string(),
            size_pt: left_spec.size_pt,
            bold: left_spec.bold,
            color: left_role.color(config),
        });
    }
    if !left_detail.is_empty() {
        let detail_spec = FontRole::Company.spec(&config.fonts);
        runs.push(TextRun {
            dx_mm: metrics.text_width_mm(left, left_spec.size_pt),
            dy_mm: 0.0,
            text: left_detail.to_string(),
            size_pt: detail_spec.size_pt,
            bold: detail_spec.bold,
            color: FontRole::Company.color(config),
        });
    }
    if !right.is_empty() {
        let right_w = metrics.text_width_mm(right, right_spec.size_pt);
        runs.push(TextRun {
            dx_mm: (content_w - right_w).max(0.0),
            dy_mm: 0.0,
            text: right.to_string(),
            size_pt: right_spec.size_pt,
            bold: right_spec.bold,
            color: right_role.color(config),
        });
    }

    ShapedUnit {
        height_mm: line_h(left_spec, config).max(line_h(right_spec, config)),
        runs,
        rules: vec![],
    }
}

fn shape_labeled_line(
    label: &str,
    rest: &str,
    config: &LayoutConfig,
    metrics: &FontMetricTable,
    content_w: f32,
) -> ShapedUnit {
    let spec = config.fonts.body;
    let lh = line_h(spec, config);
    let color = FontRole::Body.color(config);
    let label_w = metrics.text_width_mm(label, spec.size_pt);

    let mut runs = vec![TextRun {
        dx_mm: 0.0,
        dy_mm: 0.0,
        text: label.to_string(),
        size_pt: spec.size_pt,
        bold: true,
        color,
    }];

    let first_w = (content_w - label_w).max(0.0);
    let lines = metrics.wrap_hanging(rest, spec.size_pt, first_w, content_w);
    for (i, line) in lines.iter().enumerate() {
        // Continuation lines return to the left edge, not under the label.
        let dx_mm = if i == 0 { label_w } else { 0.0 };
        runs.push(TextRun {
            dx_mm,
            dy_mm: i as f32 * lh,
            text: line.clone(),
            size_pt: spec.size_pt,
            bold: false,
            color,
        });
    }

    ShapedUnit {
        height_mm: lines.len().max(1) as f32 * lh,
        runs,
        rules: vec![],
    }
}

fn shape_bullet_item(
    item: &BulletItem,
    config: &LayoutConfig,
    metrics: &FontMetricTable,
    content_w: f32,
) -> ShapedUnit {
    let spec = config.fonts.body;
    let lh = line_h(spec, config);
    let color = FontRole::Body.color(config);
    let indent = config.spacing.bullet_indent_mm;
    let text_w = (content_w - indent).max(1.0);

    let mut runs = vec![TextRun {
        dx_mm: 0.0,
        dy_mm: 0.0,
        text: BULLET_GLYPH.to_string(),
        size_pt: spec.size_pt,
        bold: false,
        color,
    }];

    let mut line_count;
    match &item.lead {
        Some(lead) => {
            let lead_w = metrics.text_width_mm(lead, spec.size_pt);
            runs.push(TextRun {
                dx_mm: indent,
                dy_mm: 0.0,
                text: lead.clone(),
                size_pt: spec.size_pt,
                bold: true,
                color,
            });
            let first_w = (text_w - lead_w).max(0.0);
            let lines = metrics.wrap_hanging(&item.text, spec.size_pt, first_w, text_w);
            line_count = lines.len().max(1);
            for (i, line) in lines.iter().enumerate() {
                let dx_mm = if i == 0 { indent + lead_w } else { indent };
                runs.push(TextRun {
                    dx_mm,
                    dy_mm: i as f32 * lh,
                    text: line.clone(),
                    size_pt: spec.size_pt,
                    bold: false,
                    color,
                });
            }
        }
        None => {
            let lines = metrics.wrap(&item.text, spec.size_pt, text_w);
            line_count = lines.len().max(1);
            for (i, line) in lines.iter().enumerate() {
                runs.push(TextRun {
                    dx_mm: indent,
                    dy_mm: i as f32 * lh,
                    text: line.clone(),
                    size_pt: spec.size_pt,
                    bold: false,
                    color,
                });
            }
        }
    }

    if runs.len() == 1 {
        // Glyph with no text still occupies one line.
        line_count = 1;
    }

    ShapedUnit {
        height_mm: line_count as f32 * lh,
        runs,
        rules: vec![],
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::config::{resolve, StyleOptions};

    fn make_config() -> LayoutConfig {
        resolve(&StyleOptions::default())
    }

    #[test]
    fn test_section_heading_has_title_and_full_width_rule() {
        let config = make_config();
        let block = ContentBlock::new(
            BlockKind::SectionHeading {
                title: "SKILLS".to_string(),
            },
            2.0,
        );
        let shaped = shape_block(&block, &config);
        assert_eq!(shaped.units.len(), 1);
        assert!(!shaped.splittable);
        let unit = &shaped.units[0];
        assert_eq!(unit.runs[0].text, "SKILLS");
        assert!(unit.runs[0].bold);
        assert_eq!(unit.rules.len(), 1);
        assert!(
            (unit.rules[0].width_mm - config.page.content_width_mm).abs() < 1e-4,
            "heading rule spans the full content width"
        );
        assert!(unit.height_mm > unit.rules[0].dy_mm);
    }

    #[test]
    fn test_paragraph_height_tracks_wrapped_lines() {
        let config = make_config();
        let long = "word ".repeat(60);
        let block = ContentBlock::new(
            BlockKind::Paragraph {
                role: FontRole::Body,
                text: long.trim().to_string(),
                align: TextAlign::Left,
            },
            0.0,
        );
        let shaped = shape_block(&block, &config);
        let unit = &shaped.units[0];
        assert!(unit.runs.len() >= 2, "long paragraph should wrap");
        let lh = unit.height_mm / unit.runs.len() as f32;
        assert!(
            (unit.runs[1].dy_mm - lh).abs() < 1e-3,
            "second line sits one line height below the first"
        );
    }

    #[test]
    fn test_centered_paragraph_offsets_runs() {
        let config = make_config();
        let block = ContentBlock::new(
            BlockKind::Paragraph {
                role: FontRole::Name,
                text: "Jane Doe".to_string(),
                align: TextAlign::Center,
            },
            0.0,
        );
        let shaped = shape_block(&block, &config);
        let run = &shaped.units[0].runs[0];
        assert!(run.dx_mm > 0.0, "centered text starts inside the line");
        assert!(run.dx_mm < config.page.content_width_mm / 2.0);
    }

    #[test]
    fn test_entry_row_right_text_is_right_aligned() {
        let config = make_config();
        let block = ContentBlock::new(
            BlockKind::EntryRow {
                left: "Senior Engineer".to_string(),
                left_role: FontRole::JobTitle,
                left_detail: ", Initech".to_string(),
                right: "2019 - 2024".to_string(),
                right_role: FontRole::Year,
            },
            0.0,
        );
        let shaped = shape_block(&block, &config);
        let unit = &shaped.units[0];
        assert_eq!(unit.runs.len(), 3);
        let detail = &unit.runs[1];
        assert!(!detail.bold, "company detail renders in the normal weight");
        assert!(detail.dx_mm > 0.0, "detail starts after the bold title");
        let right = &unit.runs[2];
        let metrics = get_metrics(config.family);
        let expected =
            config.page.content_width_mm - metrics.text_width_mm(&right.text, right.size_pt);
        assert!((right.dx_mm - expected).abs() < 1e-3);
        for run in &unit.runs {
            assert_eq!(run.dy_mm, 0.0, "all runs share one visual line");
        }
    }

    #[test]
    fn test_labeled_line_continuation_not_reindented() {
        let config = make_config();
        let rest = "Rust, Go, Python, TypeScript, Kubernetes, Terraform, PostgreSQL, Redis, \
                    Kafka, gRPC, GraphQL, Docker, AWS, GCP, Prometheus, Grafana";
        let block = ContentBlock::new(
            BlockKind::LabeledLine {
                label: "Languages & Tools: ".to_string(),
                rest: rest.to_string(),
            },
            0.0,
        );
        let shaped = shape_block(&block, &config);
        let unit = &shaped.units[0];
        let label = &unit.runs[0];
        assert!(label.bold);
        let first = &unit.runs[1];
        assert!(first.dx_mm > 0.0, "first text line starts after the label");
        let continuation: Vec<&TextRun> = unit.runs.iter().filter(|r| r.dy_mm > 0.0).collect();
        assert!(!continuation.is_empty(), "expected the list to wrap");
        for run in continuation {
            assert_eq!(run.dx_mm, 0.0, "continuation lines return to the left edge");
        }
    }

    #[test]
    fn test_bullet_list_is_splittable_per_item() {
        let config = make_config();
        let block = ContentBlock::new(
            BlockKind::BulletList {
                items: vec![
                    BulletItem::plain("First achievement"),
                    BulletItem::plain("Second achievement"),
                    BulletItem::plain("Third achievement"),
                ],
            },
            0.0,
        );
        let shaped = shape_block(&block, &config);
        assert!(shaped.splittable);
        assert_eq!(shaped.units.len(), 3, "one unit per bullet item");
        assert_eq!(shaped.unit_gap_mm, config.spacing.bullet_list_mm);
        for unit in &shaped.units {
            assert_eq!(unit.runs[0].text, BULLET_GLYPH);
            assert!(unit.height_mm > 0.0);
        }
    }

    #[test]
    fn test_bullet_item_wrapped_lines_stay_in_one_unit() {
        let config = make_config();
        let long = "delivered ".repeat(40);
        let block = ContentBlock::new(
            BlockKind::BulletList {
                items: vec![BulletItem::plain(long.trim())],
            },
            0.0,
        );
        let shaped = shape_block(&block, &config);
        assert_eq!(
            shaped.units.len(),
            1,
            "a single bullet never splits mid-text"
        );
        let unit = &shaped.units[0];
        let text_lines = unit.runs.iter().filter(|r| r.text != BULLET_GLYPH).count();
        assert!(text_lines >= 2);
        let indent = config.spacing.bullet_indent_mm;
        for run in unit.runs.iter().filter(|r| r.text != BULLET_GLYPH) {
            assert!((run.dx_mm - indent).abs() < 1e-4, "bullet text aligns at the indent");
        }
    }

    #[test]
    fn test_bullet_item_with_bold_lead() {
        let config = make_config();
        let block = ContentBlock::new(
            BlockKind::BulletList {
                items: vec![BulletItem {
                    lead: Some("CKA".to_string()),
                    text: ": Certified Kubernetes Administrator".to_string(),
                }],
            },
            0.0,
        );
        let shaped = shape_block(&block, &config);
        let unit = &shaped.units[0];
        let lead = unit.runs.iter().find(|r| r.text == "CKA").expect("lead run");
        assert!(lead.bold);
        let rest = unit
            .runs
            .iter()
            .find(|r| r.text.starts_with(':'))
            .expect("rest run");
        assert!(!rest.bold);
        assert!(rest.dx_mm > lead.dx_mm);
    }

    #[test]
    fn test_shaping_is_deterministic() {
        let config = make_config();
        let block = ContentBlock::new(
            BlockKind::Paragraph {
                role: FontRole::Body,
                text: "Deterministic shaping output for identical inputs".to_string(),
                align: TextAlign::Left,
            },
            1.0,
        );
        assert_eq!(shape_block(&block, &config), shape_block(&block, &config));
    }
}
