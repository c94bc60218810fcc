//! Narrative insights per ESG pillar.
//!
//! Text generation is pluggable through [`InsightsProvider`]. The bundled
//! [`OfflineInsights`] provider is deterministic and needs no network access, so
//! the tracker works fully without an external generator configured.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::scoring::{CategoryGrades, CategoryId, Grade, Pillar, SuggestionGenerator};

/// Input contract handed to an insights generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsRequest {
    pub pillar: Pillar,
    pub metrics: BTreeMap<CategoryId, Grade>,
    pub project_name: String,
    pub country: String,
    pub project_category: String,
}

impl InsightsRequest {
    pub fn new(
        pillar: Pillar,
        grades: &CategoryGrades,
        project_name: impl Into<String>,
        country: impl Into<String>,
        project_category: impl Into<String>,
    ) -> Self {
        Self {
            pillar,
            metrics: grades.for_pillar(pillar).collect(),
            project_name: project_name.into(),
            country: country.into(),
            project_category: project_category.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    pub pillar: Pillar,
    pub insights: String,
}

#[derive(Debug, thiserror::Error)]
pub enum InsightsError {
    #[error("insights provider unavailable: {0}")]
    Unavailable(String),
    #[error("insights request rejected: {0}")]
    Rejected(String),
}

pub trait InsightsProvider: Send + Sync {
    fn insights(&self, request: &InsightsRequest) -> Result<String, InsightsError>;
}

/// Bullet list built from the remediation table.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineInsights;

impl InsightsProvider for OfflineInsights {
    fn insights(&self, request: &InsightsRequest) -> Result<String, InsightsError> {
        if request.metrics.is_empty() {
            return Err(InsightsError::Rejected(format!(
                "no {} metrics supplied",
                request.pillar.label().to_ascii_lowercase()
            )));
        }

        let bullets: Vec<String> = request
            .metrics
            .iter()
            .filter(|(_, grade)| grade.is_low())
            .map(|(id, grade)| {
                format!(
                    "- {} (grade {}): {}",
                    id.title(),
                    grade,
                    SuggestionGenerator::remediation(*id)
                )
            })
            .collect();

        if bullets.is_empty() {
            Ok(format!(
                "- {} performance for {} in {} shows no significant concerns; keep monitoring current practices.",
                request.pillar.label(),
                request.project_name,
                request.country
            ))
        } else {
            Ok(bullets.join("\n"))
        }
    }
}
