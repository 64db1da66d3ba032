//! Resume Data Model — the canonical structured resume record.
//!
//! Produced by the optimizer service, supplied by the client for preview and
//! export, and consumed immutably by the layout engine. Upstream AI output is
//! occasionally inconsistent in shape: certification entries and bullets
//! arrive either as plain strings or as objects. Both shapes are resolved
//! ONCE at deserialization into the closed `Certification` / `Bullet` variant
//! sets, so renderers pattern-match instead of probing shapes ad hoc.

use serde::{Deserialize, Serialize};

/// Selects which sections appear and in what order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Experienced,
    Fresher,
    Student,
}

impl ExperienceLevel {
    /// Fresher and student resumes share one ordering policy.
    pub fn is_entry_level(self) -> bool {
        matches!(self, ExperienceLevel::Fresher | ExperienceLevel::Student)
    }
}

/// The full resume record. Immutable per render pass.
///
/// Field names follow the client wire format (camelCase JSON). Every field
/// except `name` is optional in practice — blank strings and empty lists are
/// the "absent" representation, filtered by the section presence checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub linkedin: String,
    pub github: String,
    pub location: String,
    pub target_role: String,
    pub summary: String,
    pub career_objective: String,
    pub education: Vec<EducationEntry>,
    pub work_experience: Vec<ExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    pub skills: Vec<SkillCategory>,
    pub certifications: Vec<Certification>,
    pub additional_sections: Vec<AdditionalSection>,
    pub achievements: Vec<Bullet>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub degree: String,
    pub school: String,
    pub location: String,
    pub year: String,
    pub cgpa: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub location: String,
    pub duration: String,
    pub bullets: Vec<Bullet>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectEntry {
    pub name: String,
    pub tech_stack: String,
    pub duration: String,
    pub bullets: Vec<Bullet>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillCategory {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdditionalSection {
    pub title: String,
    pub bullets: Vec<Bullet>,
}

/// One bullet of body text. Deserializes from either a plain JSON string or
/// an object carrying a `description` field (the two shapes that reach the
/// renderer in the wild).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bullet {
    Plain(String),
    Detailed {
        #[serde(default)]
        title: Option<String>,
        description: String,
    },
}

impl Bullet {
    /// Flattens the bullet to the plain text it renders as.
    pub fn text(&self) -> &str {
        match self {
            Bullet::Plain(s) => s,
            Bullet::Detailed { description, title } => {
                if description.trim().is_empty() {
                    title.as_deref().unwrap_or("")
                } else {
                    description
                }
            }
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text().trim().is_empty()
    }
}

impl From<&str> for Bullet {
    fn from(s: &str) -> Self {
        Bullet::Plain(s.to_string())
    }
}

/// A certification entry: plain text, or a titled record with an optional
/// description. Both shapes coexist in one list without caller special-casing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Certification {
    Titled {
        title: String,
        #[serde(default)]
        description: Option<String>,
    },
    Plain(String),
}

impl Certification {
    /// The bold lead text, when the entry carries one.
    pub fn lead(&self) -> Option<&str> {
        match self {
            Certification::Titled { title, .. } => Some(title.as_str()),
            Certification::Plain(_) => None,
        }
    }

    /// The non-bold remainder rendered after the lead.
    pub fn rest(&self) -> String {
        match self {
            Certification::Titled {
                description: Some(d),
                ..
            } if !d.trim().is_empty() => format!(": {d}"),
            Certification::Titled { .. } => String::new(),
            Certification::Plain(s) => s.clone(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Certification::Titled { title, description } => {
                title.trim().is_empty()
                    && description
                        .as_deref()
                        .map_or(true, |d| d.trim().is_empty())
            }
            Certification::Plain(s) => s.trim().is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_deserializes_from_plain_string() {
        let bullet: Bullet = serde_json::from_str("\"Shipped the thing\"").unwrap();
        assert_eq!(bullet, Bullet::Plain("Shipped the thing".to_string()));
        assert_eq!(bullet.text(), "Shipped the thing");
    }

    #[test]
    fn test_bullet_deserializes_from_description_object() {
        let bullet: Bullet =
            serde_json::from_str(r#"{"description": "Led the migration"}"#).unwrap();
        assert_eq!(bullet.text(), "Led the migration");
    }

    #[test]
    fn test_bullet_object_with_empty_description_falls_back_to_title() {
        let bullet: Bullet =
            serde_json::from_str(r#"{"title": "Migration", "description": ""}"#).unwrap();
        assert_eq!(bullet.text(), "Migration");
    }

    #[test]
    fn test_mixed_bullet_list_flattens_without_object_artifacts() {
        let json = r#"["Plain one", {"description": "From object"}, "Plain two"]"#;
        let bullets: Vec<Bullet> = serde_json::from_str(json).unwrap();
        let texts: Vec<&str> = bullets.iter().map(Bullet::text).collect();
        assert_eq!(texts, vec!["Plain one", "From object", "Plain two"]);
        for t in texts {
            assert!(
                !t.contains("[object Object]"),
                "flattened bullet leaked an object artifact: {t}"
            );
        }
    }

    #[test]
    fn test_certification_plain_string_shape() {
        let cert: Certification = serde_json::from_str("\"AWS Solutions Architect\"").unwrap();
        assert_eq!(cert.lead(), None);
        assert_eq!(cert.rest(), "AWS Solutions Architect");
    }

    #[test]
    fn test_certification_titled_shape_with_description() {
        let cert: Certification =
            serde_json::from_str(r#"{"title": "CKA", "description": "Kubernetes admin"}"#).unwrap();
        assert_eq!(cert.lead(), Some("CKA"));
        assert_eq!(cert.rest(), ": Kubernetes admin");
    }

    #[test]
    fn test_certification_titled_shape_without_description() {
        let cert: Certification = serde_json::from_str(r#"{"title": "CKA"}"#).unwrap();
        assert_eq!(cert.lead(), Some("CKA"));
        assert_eq!(cert.rest(), "");
        assert!(!cert.is_blank());
    }

    #[test]
    fn test_certification_blank_detection() {
        let cert: Certification = serde_json::from_str(r#"{"title": "  "}"#).unwrap();
        assert!(cert.is_blank());
        let cert: Certification = serde_json::from_str("\"\"").unwrap();
        assert!(cert.is_blank());
    }

    #[test]
    fn test_resume_data_tolerates_missing_fields() {
        let resume: ResumeData = serde_json::from_str(r#"{"name": "Jane Doe"}"#).unwrap();
        assert_eq!(resume.name, "Jane Doe");
        assert!(resume.work_experience.is_empty());
        assert!(resume.summary.is_empty());
    }

    #[test]
    fn test_resume_data_round_trips() {
        let resume = ResumeData {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            certifications: vec![
                Certification::Plain("AWS SAA".to_string()),
                Certification::Titled {
                    title: "CKA".to_string(),
                    description: Some("Kubernetes".to_string()),
                },
            ],
            achievements: vec![Bullet::from("Won a hackathon")],
            ..Default::default()
        };
        let json = serde_json::to_string(&resume).unwrap();
        let back: ResumeData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, resume);
    }

    #[test]
    fn test_experience_level_wire_format() {
        let level: ExperienceLevel = serde_json::from_str("\"experienced\"").unwrap();
        assert_eq!(level, ExperienceLevel::Experienced);
        assert!(!level.is_entry_level());
        let level: ExperienceLevel = serde_json::from_str("\"fresher\"").unwrap();
        assert!(level.is_entry_level());
    }
}
