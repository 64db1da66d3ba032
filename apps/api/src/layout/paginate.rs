//! Pagination Engine — places shaped blocks onto fixed-size pages.
//!
//! All cursor and page-index mutation lives in one reducer, `Paginator`,
//! created fresh for every render and discarded when the document is
//! finalized. Nothing here is shared across concurrent export runs.
//!
//! Placement rules:
//! - A unit that does not fit the remaining space flows to a new page.
//! - Bullet lists split at item granularity only; one bullet's wrapped lines
//!   always travel together.
//! - A keep-with-next block (section/entry heading) is never left at the
//!   bottom of a page without room for the first unit of what follows.
//! - A single unit taller than a whole page is drawn at the top of a fresh
//!   page and allowed to overflow rather than being sub-split or dropped.
//! - "Page N of M" footers are a post-pass once M is known, and only when
//!   M > 1.

use serde::{Deserialize, Serialize};

use crate::layout::blocks::{shape_block, ContentBlock, DrawOp, ShapedBlock, ShapedUnit};
use crate::layout::config::LayoutConfig;
use crate::layout::font_metrics::{get_metrics, line_height_mm};
use crate::layout::sections::build_blocks;
use crate::models::resume::{ExperienceLevel, ResumeData};

// ────────────────────────────────────────────────────────────────────────────
// Output model
// ────────────────────────────────────────────────────────────────────────────

/// One finished page of absolute draw operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number.
    pub number: u32,
    pub ops: Vec<DrawOp>,
}

/// A finalized multi-page document, ready for the PDF and preview adapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub pages: Vec<Page>,
    /// Sum of all placed unit heights. Equals the shaped input's total
    /// content height: nothing is silently dropped.
    pub placed_height_mm: f32,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// The reducer
// ────────────────────────────────────────────────────────────────────────────

/// Mutable cursor + page bookkeeping for one render run.
pub struct Paginator<'a> {
    config: &'a LayoutConfig,
    done_pages: Vec<Vec<DrawOp>>,
    current: Vec<DrawOp>,
    /// Vertical cursor, mm from the top of the current page.
    cursor_mm: f32,
    /// True until the first unit lands on the current page.
    page_fresh: bool,
    placed_mm: f32,
}

impl<'a> Paginator<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Paginator {
            config,
            done_pages: Vec::new(),
            current: Vec::new(),
            cursor_mm: config.page.margin_top_mm,
            page_fresh: true,
            placed_mm: 0.0,
        }
    }

    fn remaining_mm(&self) -> f32 {
        self.config.page.content_bottom_mm() - self.cursor_mm
    }

    fn break_page(&mut self) {
        self.done_pages.push(std::mem::take(&mut self.current));
        self.cursor_mm = self.config.page.margin_top_mm;
        self.page_fresh = true;
    }

    fn emit(&mut self, unit: &ShapedUnit) {
        let left = self.config.page.margin_left_mm;
        for run in &unit.runs {
            self.current.push(DrawOp::Text {
                x_mm: left + run.dx_mm,
                y_mm: self.cursor_mm + run.dy_mm,
                text: run.text.clone(),
                size_pt: run.size_pt,
                bold: run.bold,
                color: run.color,
            });
        }
        for rule in &unit.rules {
            self.current.push(DrawOp::Rule {
                x_mm: left + rule.dx_mm,
                y_mm: self.cursor_mm + rule.dy_mm,
                width_mm: rule.width_mm,
                color: rule.color,
            });
        }
        self.cursor_mm += unit.height_mm;
        self.placed_mm += unit.height_mm;
        self.page_fresh = false;
    }

    /// Places one shaped block, breaking pages as needed.
    ///
    /// `lookahead_mm` is the height that must also fit below this block when
    /// it is keep-with-next (the first unit of the following block).
    pub fn place(&mut self, block: &ShapedBlock, lookahead_mm: f32) {
        let last = block.units.len().saturating_sub(1);
        for (i, unit) in block.units.iter().enumerate() {
            let gap_before = if i > 0 { block.unit_gap_mm } else { 0.0 };
            let mut needed = gap_before + unit.height_mm;
            if i == last && block.keep_with_next && lookahead_mm > 0.0 {
                needed += block.gap_after_mm + lookahead_mm;
            }

            if needed > self.remaining_mm() && !self.page_fresh {
                // The unit (or its heading reservation) does not fit: flow to
                // a new page. The inter-item gap is dropped at the page top.
                self.break_page();
            } else {
                self.cursor_mm += gap_before;
            }
            // A fresh page that still cannot contain the unit overflows by
            // design: content correctness over cosmetic perfection.
            self.emit(unit);
        }
        self.cursor_mm += block.gap_after_mm;
    }

    /// Finalizes the run: closes the trailing page and stamps footers.
    pub fn finish(mut self) -> Document {
        if !self.current.is_empty() || self.done_pages.is_empty() {
            let trailing = std::mem::take(&mut self.current);
            self.done_pages.push(trailing);
        }

        let total = self.done_pages.len();
        let mut pages: Vec<Page> = self
            .done_pages
            .into_iter()
            .enumerate()
            .map(|(i, ops)| Page {
                number: (i + 1) as u32,
                ops,
            })
            .collect();

        if total > 1 {
            for page in &mut pages {
                page.ops.push(footer_op(page.number, total as u32, self.config));
            }
        }

        Document {
            page_width_mm: self.config.page.width_mm,
            page_height_mm: self.config.page.height_mm,
            pages,
            placed_height_mm: self.placed_mm,
        }
    }
}

/// The centered "Page N of M" footer, set in the bottom margin band.
fn footer_op(number: u32, total: u32, config: &LayoutConfig) -> DrawOp {
    let metrics = get_metrics(config.family);
    let spec = config.fonts.contact;
    let lh = line_height_mm(spec.size_pt, config.spacing.line_height);
    let text = format!("Page {number} of {total}");
    let width = metrics.text_width_mm(&text, spec.size_pt);
    let page = &config.page;

    DrawOp::Text {
        x_mm: page.margin_left_mm + (page.content_width_mm - width) / 2.0,
        y_mm: page.content_bottom_mm() + (page.margin_bottom_mm - lh).max(0.0) / 2.0,
        text,
        size_pt: spec.size_pt,
        bold: false,
        color: config.colors.secondary,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Drivers
// ────────────────────────────────────────────────────────────────────────────

/// Paginates pre-built content blocks into a finalized document.
pub fn paginate(blocks: &[ContentBlock], config: &LayoutConfig) -> Document {
    let shaped: Vec<ShapedBlock> = blocks.iter().map(|b| shape_block(b, config)).collect();
    let mut pager = Paginator::new(config);
    for (i, block) in shaped.iter().enumerate() {
        let lookahead_mm = if block.keep_with_next {
            shaped.get(i + 1).map_or(0.0, ShapedBlock::first_unit_height_mm)
        } else {
            0.0
        };
        pager.place(block, lookahead_mm);
    }
    pager.finish()
}

/// Renders a resume straight through: section blocks, then pagination.
/// Callers are expected to have validated the resume first.
pub fn layout_document(
    resume: &ResumeData,
    config: &LayoutConfig,
    level: ExperienceLevel,
) -> Document {
    let blocks = build_blocks(resume, config, level);
    paginate(&blocks, config)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
