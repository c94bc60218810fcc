use super::category::CategoryId;

/// Aggregation was requested before every category received a grade.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("assessment is incomplete; missing grades for: {}", join_ids(.missing))]
pub struct IncompleteAssessmentError {
    pub missing: Vec<CategoryId>,
}

/// A grade value outside {A, B, C, D, unassigned} reached the boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid grade '{value}': expected one of A, B, C, D")]
pub struct InvalidGradeError {
    pub value: String,
}

/// Validation failures surfaced by the scoring core. None of them are retryable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error(transparent)]
    IncompleteAssessment(#[from] IncompleteAssessmentError),
    #[error("{category}: {source}")]
    InvalidGrade {
        category: String,
        #[source]
        source: InvalidGradeError,
    },
    #[error("unknown ESG category '{0}'")]
    UnknownCategory(String),
}

fn join_ids(ids: &[CategoryId]) -> String {
    ids.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
