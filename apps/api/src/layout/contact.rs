//! Field Validator / Contact Formatter — one rule set for all renderers.
//!
//! Historically each renderer shipped its own copy of these checks and the
//! copies drifted (the phone rule most famously). This module is the single
//! implementation point: the PDF, preview, and Word adapters all format the
//! contact line through `build_contact_line`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::resume::ResumeData;

/// Values treated as "not provided" regardless of field type.
const SENTINELS: [&str; 3] = ["n/a", "not specified", "none"];

/// Separator between contact fields, including surrounding spacing.
pub const CONTACT_SEPARATOR: &str = " | ";

const PHONE_MIN_DIGITS: usize = 7;
const PHONE_MAX_DIGITS: usize = 15;

// ────────────────────────────────────────────────────────────────────────────
// Field validation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Phone,
    Email,
    Url,
    Text,
}

/// Returns true when a field is well-formed enough to display.
pub fn is_valid_field(value: &str, field: FieldType) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() || is_sentinel(trimmed) {
        return false;
    }
    match field {
        FieldType::Phone => {
            let digits = trimmed.chars().filter(char::is_ascii_digit).count();
            (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits)
        }
        FieldType::Email => is_email_shaped(trimmed),
        FieldType::Url => is_displayable_url(trimmed),
        FieldType::Text => true,
    }
}

fn is_sentinel(trimmed: &str) -> bool {
    SENTINELS
        .iter()
        .any(|s| trimmed.eq_ignore_ascii_case(s))
}

/// Simple local@domain.tld shape: exactly one `@`, non-empty local part, and
/// a domain with a dot separating non-empty labels.
fn is_email_shaped(value: &str) -> bool {
    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let Some(domain) = parts.next() else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || value.contains(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Absolute http(s) URLs, or the bare profile paths users paste from
/// LinkedIn/GitHub ("linkedin.com/in/…", "github.com/…", optional "www.").
fn is_displayable_url(value: &str) -> bool {
    if value.starts_with("http://") || value.starts_with("https://") {
        return true;
    }
    is_bare_profile_path(value)
}

fn is_bare_profile_path(value: &str) -> bool {
    let bare = value.strip_prefix("www.").unwrap_or(value);
    bare.starts_with("linkedin.com/in/") || bare.starts_with("github.com/")
}

/// The display form of a URL field. Bare profile paths are prefixed with
/// `https://` at render time only — the stored value is never mutated.
pub fn display_url(value: &str) -> String {
    let trimmed = value.trim();
    if is_bare_profile_path(trimmed) {
        format!("https://{trimmed}")
    } else {
        trimmed.to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Contact line
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    Phone,
    Email,
    Location,
    Linkedin,
    Github,
}

/// One displayable contact field, in final output order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactPart {
    pub text: String,
    pub kind: ContactKind,
}

/// Builds the ordered contact line: phone, email, location, linkedin, github.
/// Invalid fields are skipped entirely; each valid field appears once.
pub fn build_contact_line(resume: &ResumeData) -> Vec<ContactPart> {
    let mut parts = Vec::new();

    if is_valid_field(&resume.phone, FieldType::Phone) {
        parts.push(ContactPart {
            text: resume.phone.trim().to_string(),
            kind: ContactKind::Phone,
        });
    }
    if is_valid_field(&resume.email, FieldType::Email) {
        parts.push(ContactPart {
            text: resume.email.trim().to_string(),
            kind: ContactKind::Email,
        });
    }
    if is_valid_field(&resume.location, FieldType::Text) {
        parts.push(ContactPart {
            text: resume.location.trim().to_string(),
            kind: ContactKind::Location,
        });
    }
    if is_valid_field(&resume.linkedin, FieldType::Url) {
        parts.push(ContactPart {
            text: display_url(&resume.linkedin),
            kind: ContactKind::Linkedin,
        });
    }
    if is_valid_field(&resume.github, FieldType::Url) {
        parts.push(ContactPart {
            text: display_url(&resume.github),
            kind: ContactKind::Github,
        });
    }

    parts
}

/// Joins contact parts with the shared separator. N parts yield exactly N-1
/// separators and never a leading or trailing one.
pub fn join_contact_line(parts: &[ContactPart]) -> String {
    parts
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join(CONTACT_SEPARATOR)
}

// ────────────────────────────────────────────────────────────────────────────
// Pre-layout validation
// ────────────────────────────────────────────────────────────────────────────

/// Input conditions that block export before any layout work begins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderValidationError {
    #[error("A name is required before the resume can be rendered")]
    MissingName,

    #[error("At least one valid contact method (phone or email) is required")]
    NoContactMethod,
}

/// Validates a resume for rendering. Called by every export entry point.
pub fn validate_for_render(resume: &ResumeData) -> Result<(), RenderValidationError> {
    if !is_valid_field(&resume.name, FieldType::Text) {
        return Err(RenderValidationError::MissingName);
    }
    if !is_valid_field(&resume.phone, FieldType::Phone)
        && !is_valid_field(&resume.email, FieldType::Email)
    {
        return Err(RenderValidationError::NoContactMethod);
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn resume_with_contacts(
        phone: &str,
        email: &str,
        location: &str,
        linkedin: &str,
        github: &str,
    ) -> ResumeData {
        ResumeData {
            name: "Jane Doe".to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            location: location.to_string(),
            linkedin: linkedin.to_string(),
            github: github.to_string(),
            ..Default::default()
        }
    }

    // ── sentinels ───────────────────────────────────────────────────────────

    #[test]
    fn test_sentinels_invalid_for_every_field_type() {
        for sentinel in ["n/a", "N/A", "None", "NONE", "not specified", "Not Specified"] {
            for field in [
                FieldType::Phone,
                FieldType::Email,
                FieldType::Url,
                FieldType::Text,
            ] {
                assert!(
                    !is_valid_field(sentinel, field),
                    "sentinel '{sentinel}' must be invalid as {field:?}"
                );
            }
        }
    }

    #[test]
    fn test_blank_invalid_for_every_field_type() {
        for field in [
            FieldType::Phone,
            FieldType::Email,
            FieldType::Url,
            FieldType::Text,
        ] {
            assert!(!is_valid_field("", field));
            assert!(!is_valid_field("   ", field));
        }
    }

    // ── phone ───────────────────────────────────────────────────────────────

    #[test]
    fn test_phone_digit_range() {
        assert!(is_valid_field("+1 (555) 123-4567", FieldType::Phone));
        assert!(is_valid_field("5551234", FieldType::Phone), "7 digits is the minimum");
        assert!(is_valid_field("123456789012345", FieldType::Phone), "15 digits is the maximum");
        assert!(!is_valid_field("555123", FieldType::Phone), "6 digits is too few");
        assert!(
            !is_valid_field("1234567890123456", FieldType::Phone),
            "16 digits is too many"
        );
        assert!(!is_valid_field("call me", FieldType::Phone));
    }

    // ── email ───────────────────────────────────────────────────────────────

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_field("jane@example.com", FieldType::Email));
        assert!(is_valid_field("jane.doe+resume@sub.example.io", FieldType::Email));
        assert!(!is_valid_field("jane@example", FieldType::Email), "missing tld");
        assert!(!is_valid_field("janeexample.com", FieldType::Email), "missing @");
        assert!(!is_valid_field("@example.com", FieldType::Email), "empty local part");
        assert!(!is_valid_field("jane@exa mple.com", FieldType::Email), "whitespace");
        assert!(!is_valid_field("jane@example.", FieldType::Email), "empty tld");
    }

    // ── url ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_url_shapes() {
        assert!(is_valid_field("https://linkedin.com/in/janedoe", FieldType::Url));
        assert!(is_valid_field("http://example.com/portfolio", FieldType::Url));
        assert!(is_valid_field("linkedin.com/in/janedoe", FieldType::Url));
        assert!(is_valid_field("www.linkedin.com/in/janedoe", FieldType::Url));
        assert!(is_valid_field("github.com/janedoe", FieldType::Url));
        assert!(!is_valid_field("janedoe", FieldType::Url));
        assert!(!is_valid_field("linkedin.com/janedoe", FieldType::Url), "not a profile path");
    }

    #[test]
    fn test_display_url_prefixes_bare_paths_only() {
        assert_eq!(
            display_url("linkedin.com/in/janedoe"),
            "https://linkedin.com/in/janedoe"
        );
        assert_eq!(
            display_url("www.github.com/janedoe"),
            "https://www.github.com/janedoe"
        );
        assert_eq!(
            display_url("https://github.com/janedoe"),
            "https://github.com/janedoe"
        );
    }

    // ── idempotence (spec property 3) ──────────────────────────────────────

    #[test]
    fn test_validator_idempotent_over_display_form() {
        let raw = "linkedin.com/in/janedoe";
        assert!(is_valid_field(raw, FieldType::Url));
        let displayed = display_url(raw);
        assert!(
            is_valid_field(&displayed, FieldType::Url),
            "display form of a valid field must itself be valid"
        );
        assert_eq!(display_url(&displayed), displayed, "display_url is idempotent");
    }

    // ── contact line (spec property 4) ─────────────────────────────────────

    #[test]
    fn test_contact_join_counts_for_every_n() {
        let field_sets: [(&str, &str, &str, &str, &str); 6] = [
            ("", "", "", "", ""),
            ("+1 555 123 4567", "", "", "", ""),
            ("+1 555 123 4567", "jane@x.com", "", "", ""),
            ("+1 555 123 4567", "jane@x.com", "Austin, TX", "", ""),
            (
                "+1 555 123 4567",
                "jane@x.com",
                "Austin, TX",
                "linkedin.com/in/jane",
                "",
            ),
            (
                "+1 555 123 4567",
                "jane@x.com",
                "Austin, TX",
                "linkedin.com/in/jane",
                "github.com/jane",
            ),
        ];

        for (n, (phone, email, location, linkedin, github)) in field_sets.iter().enumerate() {
            let resume = resume_with_contacts(phone, email, location, linkedin, github);
            let parts = build_contact_line(&resume);
            assert_eq!(parts.len(), n, "expected {n} valid parts");

            let line = join_contact_line(&parts);
            let separators = line.matches('|').count();
            assert_eq!(
                separators,
                n.saturating_sub(1),
                "N={n} fields need N-1 separators, got line '{line}'"
            );
            assert!(!line.starts_with('|') && !line.ends_with('|'));
            assert!(!line.trim().starts_with('|') && !line.trim().ends_with('|'));
        }
    }

    #[test]
    fn test_contact_line_fixed_ordering() {
        let resume = resume_with_contacts(
            "+1 555 123 4567",
            "jane@x.com",
            "Austin, TX",
            "linkedin.com/in/jane",
            "github.com/jane",
        );
        let kinds: Vec<ContactKind> = build_contact_line(&resume).iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ContactKind::Phone,
                ContactKind::Email,
                ContactKind::Location,
                ContactKind::Linkedin,
                ContactKind::Github,
            ]
        );
    }

    #[test]
    fn test_sentinel_phone_omitted_real_phone_kept() {
        let resume = resume_with_contacts("N/A", "jane@x.com", "", "", "");
        let parts = build_contact_line(&resume);
        assert!(parts.iter().all(|p| p.kind != ContactKind::Phone));

        let resume = resume_with_contacts("+1 (555) 123-4567", "jane@x.com", "", "", "");
        let parts = build_contact_line(&resume);
        assert_eq!(parts[0].kind, ContactKind::Phone);
        assert_eq!(parts[0].text, "+1 (555) 123-4567", "phone rendered verbatim");
    }

    // ── validate_for_render ─────────────────────────────────────────────────

    #[test]
    fn test_validate_missing_name() {
        let resume = ResumeData {
            email: "jane@x.com".to_string(),
            ..Default::default()
        };
        assert_eq!(
            validate_for_render(&resume),
            Err(RenderValidationError::MissingName)
        );
    }

    #[test]
    fn test_validate_sentinel_name_rejected() {
        let resume = ResumeData {
            name: "N/A".to_string(),
            email: "jane@x.com".to_string(),
            ..Default::default()
        };
        assert_eq!(
            validate_for_render(&resume),
            Err(RenderValidationError::MissingName)
        );
    }

    #[test]
    fn test_validate_requires_contact_method() {
        let resume = ResumeData {
            name: "Jane Doe".to_string(),
            ..Default::default()
        };
        assert_eq!(
            validate_for_render(&resume),
            Err(RenderValidationError::NoContactMethod)
        );
    }

    #[test]
    fn test_validate_accepts_phone_or_email() {
        let by_email = ResumeData {
            name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            ..Default::default()
        };
        assert!(validate_for_render(&by_email).is_ok());

        let by_phone = ResumeData {
            name: "Jane Doe".to_string(),
            phone: "+1 555 123 4567".to_string(),
            ..Default::default()
        };
        assert!(validate_for_render(&by_phone).is_ok());
    }
}
