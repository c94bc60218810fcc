use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{Assessment, Grade, RiskLevel};

/// Identifier wrapper for catalogued projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssessmentId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for BookmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalogue entry. The ESG fields are denormalized copies of the latest
/// assessment and stay empty until one is recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub country: String,
    pub region: Option<String>,
    pub category: String,
    pub size: String,
    pub funding: Option<String>,
    pub environment_grade: Option<Grade>,
    pub social_grade: Option<Grade>,
    pub governance_grade: Option<Grade>,
    pub risk_score: Option<u8>,
    pub risk_level: Option<RiskLevel>,
    pub details: serde_json::Value,
    pub image_url: Option<String>,
    pub contact_info: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn from_draft(id: ProjectId, draft: NewProject, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            country: draft.country,
            region: draft.region,
            category: draft.category,
            size: draft.size,
            funding: draft.funding,
            environment_grade: None,
            social_grade: None,
            governance_grade: None,
            risk_score: None,
            risk_level: None,
            details: draft.details.unwrap_or(serde_json::Value::Null),
            image_url: draft.image_url,
            contact_info: draft.contact_info,
            created_at,
        }
    }

    pub fn apply(&mut self, patch: ProjectPatch) {
        let ProjectPatch {
            name,
            description,
            country,
            region,
            category,
            size,
            funding,
            details,
            image_url,
            contact_info,
        } = patch;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(country) = country {
            self.country = country;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(size) = size {
            self.size = size;
        }
        if let Some(region) = region {
            self.region = region;
        }
        if let Some(funding) = funding {
            self.funding = funding;
        }
        if let Some(details) = details {
            self.details = details;
        }
        if let Some(image_url) = image_url {
            self.image_url = image_url;
        }
        if let Some(contact_info) = contact_info {
            self.contact_info = contact_info;
        }
    }

    /// Copies the pillar grades and risk fields from an assessment.
    pub fn denormalize(&mut self, assessment: &Assessment) {
        self.environment_grade = Some(assessment.environment_grade());
        self.social_grade = Some(assessment.social_grade());
        self.governance_grade = Some(assessment.governance_grade());
        self.risk_score = Some(assessment.overall_score());
        self.risk_level = Some(assessment.risk_level());
    }

    pub fn is_assessed(&self) -> bool {
        self.risk_level.is_some()
    }
}

/// Fields a caller supplies when cataloguing a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub country: String,
    #[serde(default)]
    pub region: Option<String>,
    pub category: String,
    pub size: String,
    #[serde(default)]
    pub funding: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub contact_info: Option<String>,
}

impl NewProject {
    /// Names of required fields left blank.
    pub fn blank_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("description", &self.description),
            ("country", &self.country),
            ("category", &self.category),
            ("size", &self.size),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }
}

/// Partial update. ESG grades are absent on purpose: they only change when a
/// new assessment is recorded. Optional text fields distinguish an omitted key
/// (`None`, keep) from an explicit `null` (`Some(None)`, clear).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub region: Option<Option<String>>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub funding: Option<Option<String>>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub contact_info: Option<Option<String>>,
}

/// Wraps whatever is present, `null` included, so an omitted key stays `None`.
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl ProjectPatch {
    pub fn blank_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("description", &self.description),
            ("country", &self.country),
            ("category", &self.category),
            ("size", &self.size),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_some_and(|v| v.trim().is_empty()))
        .map(|(field, _)| field)
        .collect()
    }
}

/// Gallery filter; supplied criteria combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFilter {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
}

impl ProjectFilter {
    pub fn matches(&self, project: &Project) -> bool {
        let country = self
            .country
            .as_deref()
            .map_or(true, |country| project.country.eq_ignore_ascii_case(country));
        let category = self
            .category
            .as_deref()
            .map_or(true, |category| project.category.eq_ignore_ascii_case(category));
        let risk_level = self
            .risk_level
            .map_or(true, |level| project.risk_level == Some(level));

        country && category && risk_level
    }
}

/// Stored assessment for a project. Records are append-only; the newest wins.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    pub id: AssessmentId,
    pub project_id: ProjectId,
    #[serde(flatten)]
    pub assessment: Assessment,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: BookmarkId,
    pub user_id: UserId,
    pub project_id: ProjectId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBookmark {
    pub user_id: UserId,
    pub project_id: ProjectId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{Aggregator, CategoryGrades};

    fn draft() -> NewProject {
        NewProject {
            name: "Grootvlei Solar Power Project".to_string(),
            description: "75MW solar PV installation in the Western Cape.".to_string(),
            country: "South Africa".to_string(),
            region: Some("Western Cape".to_string()),
            category: "Renewable Energy".to_string(),
            size: "Large ($10M - $50M)".to_string(),
            funding: Some("$18.5M".to_string()),
            details: None,
            image_url: None,
            contact_info: None,
        }
    }

    #[test]
    fn blank_required_fields_are_reported() {
        let mut draft = draft();
        draft.country = "  ".to_string();
        draft.size.clear();
        assert_eq!(draft.blank_fields(), vec!["country", "size"]);
    }

    #[test]
    fn patch_keeps_unspecified_fields() {
        let mut project = Project::from_draft(ProjectId(1), draft(), Utc::now());
        project.apply(ProjectPatch {
            funding: Some(Some("$20M".to_string())),
            ..ProjectPatch::default()
        });
        assert_eq!(project.funding.as_deref(), Some("$20M"));
        assert_eq!(project.region.as_deref(), Some("Western Cape"));
    }

    #[test]
    fn explicit_null_clears_optional_fields() {
        let mut project = Project::from_draft(ProjectId(1), draft(), Utc::now());

        let patch: ProjectPatch = serde_json::from_value(serde_json::json!({
            "region": null,
            "imageUrl": "/img/solar.png",
        }))
        .expect("patch parses");
        assert_eq!(patch.region, Some(None));
        assert_eq!(patch.funding, None);
        project.apply(patch);

        assert_eq!(project.region, None);
        assert_eq!(project.funding.as_deref(), Some("$18.5M"));
        assert_eq!(project.image_url.as_deref(), Some("/img/solar.png"));
        assert_eq!(project.contact_info, draft().contact_info);
    }

    #[test]
    fn patch_rejects_derived_fields() {
        let result = serde_json::from_str::<ProjectPatch>(r#"{"environmentGrade":"A"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn filter_combines_criteria() {
        let mut project = Project::from_draft(ProjectId(1), draft(), Utc::now());
        let assessment =
            Aggregator::assess(CategoryGrades::uniform(crate::scoring::Grade::A)).expect("assess");
        project.denormalize(&assessment);

        let matching = ProjectFilter {
            country: Some("south africa".to_string()),
            category: None,
            risk_level: Some(RiskLevel::Low),
        };
        assert!(matching.matches(&project));

        let wrong_risk = ProjectFilter {
            risk_level: Some(RiskLevel::High),
            ..matching.clone()
        };
        assert!(!wrong_risk.matches(&project));
        assert!(ProjectFilter::default().matches(&project));
    }

    #[test]
    fn denormalize_copies_pillar_and_risk_fields() {
        let mut project = Project::from_draft(ProjectId(7), draft(), Utc::now());
        assert!(!project.is_assessed());

        let assessment =
            Aggregator::assess(CategoryGrades::uniform(crate::scoring::Grade::D)).expect("assess");
        project.denormalize(&assessment);

        assert_eq!(project.risk_score, Some(25));
        assert_eq!(project.risk_level, Some(RiskLevel::High));
        assert_eq!(project.social_grade, Some(crate::scoring::Grade::D));
        assert!(project.is_assessed());
    }
}
