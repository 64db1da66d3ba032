//! Word-compatible HTML adapter.
//!
//! Emits a single flowing HTML document wrapped in the Word-recognized MIME
//! type (`application/vnd.ms-word`). No pagination happens here — word
//! processors paginate themselves — but the content comes from the same
//! section renderer output as the PDF and preview, so ordering, presence,
//! and field validation cannot diverge.

use crate::layout::blocks::{BlockKind, BulletItem, ContentBlock, FontRole, TextAlign};
use crate::layout::config::LayoutConfig;
use crate::layout::sections::build_blocks;
use crate::models::resume::{ExperienceLevel, ResumeData};

/// Renders the resume as a Word-compatible HTML string.
pub fn render_word_html(
    resume: &ResumeData,
    config: &LayoutConfig,
    level: ExperienceLevel,
) -> String {
    let blocks = build_blocks(resume, config, level);
    let mut body = String::new();
    for block in &blocks {
        body.push_str(&block_html(block, config));
    }

    let page = &config.page;
    format!(
        "<html xmlns:o=\"urn:schemas-microsoft-com:office:office\" \
         xmlns:w=\"urn:schemas-microsoft-com:office:word\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <style>\n\
         @page {{ size: {pw}mm {ph}mm; margin: {mt}mm {mr}mm {mb}mm {ml}mm; }}\n\
         body {{ font-family: '{family}', {fallback}; color: {primary}; }}\n\
         table {{ width: 100%; border-collapse: collapse; }}\n\
         td {{ padding: 0; vertical-align: baseline; }}\n\
         </style>\n\
         </head>\n\
         <body>\n{body}</body>\n\
         </html>\n",
        title = escape_html(resume.name.trim()),
        pw = page.width_mm,
        ph = page.height_mm,
        mt = page.margin_top_mm,
        mr = page.margin_right_mm,
        mb = page.margin_bottom_mm,
        ml = page.margin_left_mm,
        family = config.family.display_name(),
        fallback = config.family.css_fallback(),
        primary = config.colors.primary.css_hex(),
    )
}

fn block_html(block: &ContentBlock, config: &LayoutConfig) -> String {
    let gap = block.gap_after_mm;
    match &block.kind {
        BlockKind::SectionHeading { title } => {
            let spec = FontRole::SectionTitle.spec(&config.fonts);
            format!(
                "<p style=\"margin: 0 0 {gap}mm 0; font-size: {size}pt; font-weight: bold; \
                 border-bottom: 1px solid {color};\">{text}</p>\n",
                size = spec.size_pt,
                color = config.colors.primary.css_hex(),
                text = escape_html(title),
            )
        }
        BlockKind::Paragraph { role, text, align } => {
            let spec = role.spec(&config.fonts);
            format!(
                "<p style=\"margin: 0 0 {gap}mm 0; font-size: {size}pt;{weight} \
                 text-align: {align};\">{text}</p>\n",
                size = spec.size_pt,
                weight = if spec.bold { " font-weight: bold;" } else { "" },
                align = css_align(*align),
                text = escape_html(text),
            )
        }
        BlockKind::EntryRow {
            left,
            left_role,
            left_detail,
            right,
            right_role,
        } => {
            let left_spec = left_role.spec(&config.fonts);
            let detail_spec = FontRole::Company.spec(&config.fonts);
            let right_spec = right_role.spec(&config.fonts);
            format!(
                "<table style=\"margin: 0 0 {gap}mm 0;\"><tr>\
                 <td style=\"font-size: {lsize}pt;\"><b>{left}</b>\
                 <span style=\"font-size: {dsize}pt; font-weight: normal; color: {muted};\">{detail}</span></td>\
                 <td style=\"font-size: {rsize}pt; text-align: right; color: {muted};\">{right}</td>\
                 </tr></table>\n",
                lsize = left_spec.size_pt,
                left = escape_html(left),
                dsize = detail_spec.size_pt,
                muted = config.colors.secondary.css_hex(),
                detail = escape_html(left_detail),
                rsize = right_spec.size_pt,
                right = escape_html(right),
            )
        }
        BlockKind::LabeledLine { label, rest } => {
            let spec = FontRole::Body.spec(&config.fonts);
            format!(
                "<p style=\"margin: 0 0 {gap}mm 0; font-size: {size}pt;\">\
                 <b>{label}</b>{rest}</p>\n",
                size = spec.size_pt,
                label = escape_html(label),
                rest = escape_html(rest),
            )
        }
        BlockKind::BulletList { items } => {
            let spec = FontRole::Body.spec(&config.fonts);
            let lis: String = items.iter().map(|item| bullet_li(item)).collect();
            format!(
                "<ul style=\"margin: 0 0 {gap}mm 0; padding-left: {indent}mm; \
                 font-size: {size}pt;\">\n{lis}</ul>\n",
                indent = config.spacing.bullet_indent_mm,
                size = spec.size_pt,
            )
        }
    }
}

fn bullet_li(item: &BulletItem) -> String {
    match &item.lead {
        Some(lead) => format!(
            "<li><b>{}</b>{}</li>\n",
            escape_html(lead),
            escape_html(&item.text)
        ),
        None => format!("<li>{}</li>\n", escape_html(&item.text)),
    }
}

fn css_align(align: TextAlign) -> &'static str {
    match align {
        TextAlign::Left => "left",
        TextAlign::Center => "center",
        TextAlign::Right => "right",
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
