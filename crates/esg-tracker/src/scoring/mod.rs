//! ESG grading core: letter scale, category catalogue, aggregation, and
//! remediation notes. Pure and synchronous; safe to call from any thread.

mod aggregator;
mod category;
mod error;
mod grade;
mod suggestions;

pub use aggregator::{Aggregator, Assessment};
pub use category::{Category, CategoryGrader, CategoryGrades, CategoryId, Pillar, CATEGORIES};
pub use error::{IncompleteAssessmentError, InvalidGradeError, ScoringError};
pub use grade::{Grade, GradeScale, RiskLevel};
pub use suggestions::{SuggestionGenerator, NO_CONCERNS_MESSAGE};
