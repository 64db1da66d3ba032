//! Section Renderers — one pure renderer per resume section kind.
//!
//! Every renderer returns an ordered list of `ContentBlock`s, or nothing at
//! all when the section has no qualifying content (the all-or-nothing
//! presence rule: no empty heading, no orphan rule). The PDF, preview, and
//! Word adapters all consume this output, so section ordering and presence
//! decisions exist in exactly one place.

use serde::{Deserialize, Serialize};

use crate::layout::blocks::{BlockKind, BulletItem, ContentBlock, FontRole, TextAlign};
use crate::layout::config::LayoutConfig;
use crate::layout::contact::{build_contact_line, is_valid_field, join_contact_line, FieldType};
use crate::models::resume::{
    AdditionalSection, Bullet, EducationEntry, ExperienceEntry, ExperienceLevel, ProjectEntry,
    ResumeData, SkillCategory,
};

/// Gap after a section heading's rule, before the section body.
const HEADING_GAP_MM: f32 = 1.6;
/// Gap between lines inside a single entry (heading row to bullets, etc.).
const INTRA_ENTRY_GAP_MM: f32 = 0.8;
/// Gap between the header lines (name, role, contact).
const HEADER_LINE_GAP_MM: f32 = 1.0;

// ────────────────────────────────────────────────────────────────────────────
// Section kinds and ordering policy
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Summary,
    Objective,
    Skills,
    Experience,
    Projects,
    Certifications,
    Education,
    Achievements,
}

const EXPERIENCED_ORDER: [SectionKind; 6] = [
    SectionKind::Summary,
    SectionKind::Skills,
    SectionKind::Experience,
    SectionKind::Projects,
    SectionKind::Certifications,
    SectionKind::Education,
];

const ENTRY_LEVEL_ORDER: [SectionKind; 7] = [
    SectionKind::Objective,
    SectionKind::Education,
    SectionKind::Skills,
    SectionKind::Projects,
    SectionKind::Experience,
    SectionKind::Certifications,
    SectionKind::Achievements,
];

/// The section ordering policy for an experience level. Custom sections
/// always follow the fixed sections, in user order.
pub fn section_order(level: ExperienceLevel) -> &'static [SectionKind] {
    if level.is_entry_level() {
        &ENTRY_LEVEL_ORDER
    } else {
        &EXPERIENCED_ORDER
    }
}

fn section_title(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Summary => "PROFESSIONAL SUMMARY",
        SectionKind::Objective => "CAREER OBJECTIVE",
        SectionKind::Skills => "SKILLS",
        SectionKind::Experience => "PROFESSIONAL EXPERIENCE",
        SectionKind::Projects => "PROJECTS",
        SectionKind::Certifications => "CERTIFICATIONS",
        SectionKind::Education => "EDUCATION",
        SectionKind::Achievements => "ACHIEVEMENTS",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Top-level assembly
// ────────────────────────────────────────────────────────────────────────────

/// Builds the complete ordered block list for a resume: header first, then
/// the fixed sections per the level's ordering policy, then custom sections.
pub fn build_blocks(
    resume: &ResumeData,
    config: &LayoutConfig,
    level: ExperienceLevel,
) -> Vec<ContentBlock> {
    let mut blocks = header_blocks(resume, config);

    for kind in section_order(level) {
        blocks.extend(render_section(*kind, resume, config));
    }
    for section in &resume.additional_sections {
        blocks.extend(custom_section(section, config));
    }

    blocks
}

/// Dispatches to the renderer for one fixed section kind.
pub fn render_section(
    kind: SectionKind,
    resume: &ResumeData,
    config: &LayoutConfig,
) -> Vec<ContentBlock> {
    match kind {
        SectionKind::Summary => text_section(kind, &resume.summary, config),
        SectionKind::Objective => text_section(kind, &resume.career_objective, config),
        SectionKind::Skills => skills_section(&resume.skills, config),
        SectionKind::Experience => experience_section(&resume.work_experience, config),
        SectionKind::Projects => projects_section(&resume.projects, config),
        SectionKind::Certifications => certifications_section(resume, config),
        SectionKind::Education => education_section(&resume.education, config),
        SectionKind::Achievements => achievements_section(&resume.achievements, config),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Header
// ────────────────────────────────────────────────────────────────────────────

fn header_blocks(resume: &ResumeData, config: &LayoutConfig) -> Vec<ContentBlock> {
    let mut blocks = vec![ContentBlock::new(
        BlockKind::Paragraph {
            role: FontRole::Name,
            text: resume.name.trim().to_string(),
            align: TextAlign::Center,
        },
        HEADER_LINE_GAP_MM,
    )];

    if is_valid_field(&resume.target_role, FieldType::Text) {
        blocks.push(ContentBlock::new(
            BlockKind::Paragraph {
                role: FontRole::JobTitle,
                text: resume.target_role.trim().to_string(),
                align: TextAlign::Center,
            },
            HEADER_LINE_GAP_MM,
        ));
    }

    let contact_parts = build_contact_line(resume);
    if !contact_parts.is_empty() {
        blocks.push(ContentBlock::new(
            BlockKind::Paragraph {
                role: FontRole::Contact,
                text: join_contact_line(&contact_parts),
                align: TextAlign::Center,
            },
            0.0,
        ));
    }

    // The space between the header and the first section.
    if let Some(last) = blocks.last_mut() {
        last.gap_after_mm = config.spacing.section_before_mm;
    }
    blocks
}

// ────────────────────────────────────────────────────────────────────────────
// Per-kind renderers
// ────────────────────────────────────────────────────────────────────────────

fn heading_block(title: String) -> ContentBlock {
    ContentBlock::new(BlockKind::SectionHeading { title }, HEADING_GAP_MM).keep_with_next()
}

/// Summary and objective: a heading plus one wrapped paragraph.
fn text_section(kind: SectionKind, text: &str, config: &LayoutConfig) -> Vec<ContentBlock> {
    if !non_blank(text) {
        return vec![];
    }
    vec![
        heading_block(section_title(kind).to_string()),
        ContentBlock::new(
            BlockKind::Paragraph {
                role: FontRole::Body,
                text: text.trim().to_string(),
                align: TextAlign::Left,
            },
            config.spacing.section_after_mm,
        ),
    ]
}

fn skills_section(skills: &[SkillCategory], config: &LayoutConfig) -> Vec<ContentBlock> {
    let lines: Vec<(String, String)> = skills
        .iter()
        .filter_map(|cat| {
            let items: Vec<&str> = cat
                .items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect();
            let category = cat.category.trim();
            if category.is_empty() && items.is_empty() {
                None
            } else {
                Some((category.to_string(), items.join(", ")))
            }
        })
        .collect();

    if lines.is_empty() {
        return vec![];
    }

    let mut blocks = vec![heading_block(section_title(SectionKind::Skills).to_string())];
    let last = lines.len() - 1;
    for (i, (category, joined)) in lines.into_iter().enumerate() {
        let gap = if i == last {
            config.spacing.section_after_mm
        } else {
            INTRA_ENTRY_GAP_MM
        };
        let kind = if category.is_empty() {
            BlockKind::Paragraph {
                role: FontRole::Body,
                text: joined,
                align: TextAlign::Left,
            }
        } else {
            BlockKind::LabeledLine {
                label: format!("{category}: "),
                rest: joined,
            }
        };
        blocks.push(ContentBlock::new(kind, gap));
    }
    blocks
}

fn experience_section(entries: &[ExperienceEntry], config: &LayoutConfig) -> Vec<ContentBlock> {
    let qualifying: Vec<&ExperienceEntry> = entries
        .iter()
        .filter(|e| {
            non_blank(&e.title)
                || non_blank(&e.company)
                || non_blank(&e.duration)
                || has_bullet_content(&e.bullets)
        })
        .collect();
    if qualifying.is_empty() {
        return vec![];
    }

    let mut blocks = vec![heading_block(
        section_title(SectionKind::Experience).to_string(),
    )];
    let last = qualifying.len() - 1;
    for (i, entry) in qualifying.iter().enumerate() {
        let entry_gap = entry_gap(i == last, config);
        let (left, detail) = heading_left(&entry.title, &[&entry.company, &entry.location]);
        let items = bullet_items(&entry.bullets);

        let mut row = ContentBlock::new(
            BlockKind::EntryRow {
                left,
                left_role: FontRole::JobTitle,
                left_detail: detail,
                right: entry.duration.trim().to_string(),
                right_role: FontRole::Year,
            },
            if items.is_empty() {
                entry_gap
            } else {
                INTRA_ENTRY_GAP_MM
            },
        );
        if !items.is_empty() {
            row = row.keep_with_next();
        }
        blocks.push(row);

        if !items.is_empty() {
            blocks.push(ContentBlock::new(BlockKind::BulletList { items }, entry_gap));
        }
    }
    blocks
}

fn projects_section(entries: &[ProjectEntry], config: &LayoutConfig) -> Vec<ContentBlock> {
    let qualifying: Vec<&ProjectEntry> = entries
        .iter()
        .filter(|p| {
            non_blank(&p.name) || non_blank(&p.tech_stack) || has_bullet_content(&p.bullets)
        })
        .collect();
    if qualifying.is_empty() {
        return vec![];
    }

    let mut blocks = vec![heading_block(
        section_title(SectionKind::Projects).to_string(),
    )];
    let last = qualifying.len() - 1;
    for (i, project) in qualifying.iter().enumerate() {
        let entry_gap = entry_gap(i == last, config);
        let (left, detail) = heading_left(&project.name, &[&project.tech_stack]);
        let items = bullet_items(&project.bullets);

        let mut row = ContentBlock::new(
            BlockKind::EntryRow {
                left,
                left_role: FontRole::JobTitle,
                left_detail: detail,
                right: project.duration.trim().to_string(),
                right_role: FontRole::Year,
            },
            if items.is_empty() {
                entry_gap
            } else {
                INTRA_ENTRY_GAP_MM
            },
        );
        if !items.is_empty() {
            row = row.keep_with_next();
        }
        blocks.push(row);

        if !items.is_empty() {
            blocks.push(ContentBlock::new(BlockKind::BulletList { items }, entry_gap));
        }
    }
    blocks
}

fn certifications_section(resume: &ResumeData, config: &LayoutConfig) -> Vec<ContentBlock> {
    let items: Vec<BulletItem> = resume
        .certifications
        .iter()
        .filter(|c| !c.is_blank())
        .map(|cert| BulletItem {
            lead: cert
                .lead()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from),
            text: cert.rest(),
        })
        .collect();
    if items.is_empty() {
        return vec![];
    }

    vec![
        heading_block(section_title(SectionKind::Certifications).to_string()),
        ContentBlock::new(
            BlockKind::BulletList { items },
            config.spacing.section_after_mm,
        ),
    ]
}

fn education_section(entries: &[EducationEntry], config: &LayoutConfig) -> Vec<ContentBlock> {
    let qualifying: Vec<&EducationEntry> = entries
        .iter()
        .filter(|e| {
            non_blank(&e.degree)
                || non_blank(&e.school)
                || non_blank(&e.year)
                || non_blank(&e.cgpa)
        })
        .collect();
    if qualifying.is_empty() {
        return vec![];
    }

    let mut blocks = vec![heading_block(
        section_title(SectionKind::Education).to_string(),
    )];
    let last = qualifying.len() - 1;
    for (i, entry) in qualifying.iter().enumerate() {
        let entry_gap = entry_gap(i == last, config);

        // Degree carries the bold row; a blank degree promotes the school.
        let degree = entry.degree.trim();
        let school_line = join_non_blank(&[&entry.school, &entry.location]);
        let (row_left, school_below) = if degree.is_empty() {
            (school_line.clone(), String::new())
        } else {
            (degree.to_string(), school_line)
        };

        let has_school_below = !school_below.is_empty();
        let has_cgpa = non_blank(&entry.cgpa);
        let row_gap = if has_school_below || has_cgpa {
            INTRA_ENTRY_GAP_MM
        } else {
            entry_gap
        };

        let mut row = ContentBlock::new(
            BlockKind::EntryRow {
                left: row_left,
                left_role: FontRole::JobTitle,
                left_detail: String::new(),
                right: entry.year.trim().to_string(),
                right_role: FontRole::Year,
            },
            row_gap,
        );
        if has_school_below || has_cgpa {
            row = row.keep_with_next();
        }
        blocks.push(row);

        if has_school_below {
            blocks.push(ContentBlock::new(
                BlockKind::Paragraph {
                    role: FontRole::Company,
                    text: school_below,
                    align: TextAlign::Left,
                },
                if has_cgpa { INTRA_ENTRY_GAP_MM } else { entry_gap },
            ));
        }
        if has_cgpa {
            blocks.push(ContentBlock::new(
                BlockKind::Paragraph {
                    role: FontRole::Body,
                    text: format!("CGPA: {}", entry.cgpa.trim()),
                    align: TextAlign::Left,
                },
                entry_gap,
            ));
        }
    }
    blocks
}

fn achievements_section(achievements: &[Bullet], config: &LayoutConfig) -> Vec<ContentBlock> {
    let items = bullet_items(achievements);
    if items.is_empty() {
        return vec![];
    }
    vec![
        heading_block(section_title(SectionKind::Achievements).to_string()),
        ContentBlock::new(
            BlockKind::BulletList { items },
            config.spacing.section_after_mm,
        ),
    ]
}

fn custom_section(section: &AdditionalSection, config: &LayoutConfig) -> Vec<ContentBlock> {
    let items = bullet_items(&section.bullets);
    if items.is_empty() {
        return vec![];
    }
    let title = if non_blank(&section.title) {
        section.title.trim().to_uppercase()
    } else {
        "ADDITIONAL INFORMATION".to_string()
    };
    vec![
        heading_block(title),
        ContentBlock::new(
            BlockKind::BulletList { items },
            config.spacing.section_after_mm,
        ),
    ]
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn non_blank(s: &str) -> bool {
    !s.trim().is_empty()
}

fn entry_gap(is_last: bool, config: &LayoutConfig) -> f32 {
    if is_last {
        config.spacing.section_after_mm
    } else {
        config.spacing.entry_mm
    }
}

fn has_bullet_content(bullets: &[Bullet]) -> bool {
    bullets.iter().any(|b| !b.is_blank())
}

/// Flattens bullets to plain-text items, dropping blanks. Object-shaped
/// bullets were already resolved to text at deserialization.
fn bullet_items(bullets: &[Bullet]) -> Vec<BulletItem> {
    bullets
        .iter()
        .filter(|b| !b.is_blank())
        .map(|b| BulletItem::plain(b.text().trim()))
        .collect()
}

/// Splits an entry heading into the bold lead and the comma-joined detail
/// that follows it on the same line. A blank lead promotes the first
/// non-blank detail field into the bold position.
fn heading_left(primary: &str, details: &[&str]) -> (String, String) {
    let mut parts: Vec<String> = Vec::new();
    if non_blank(primary) {
        parts.push(primary.trim().to_string());
    }
    for d in details {
        if non_blank(d) {
            parts.push(d.trim().to_string());
        }
    }
    match parts.split_first() {
        None => (String::new(), String::new()),
        Some((lead, rest)) if rest.is_empty() => (lead.clone(), String::new()),
        Some((lead, rest)) => (lead.clone(), format!(", {}", rest.join(", "))),
    }
}

fn join_non_blank(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
