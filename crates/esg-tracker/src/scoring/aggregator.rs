use serde::Serialize;

use super::category::{CategoryGrader, CategoryGrades, CategoryId, Pillar};
use super::error::IncompleteAssessmentError;
use super::grade::{Grade, GradeScale, RiskLevel};
use super::suggestions::SuggestionGenerator;

/// Derived ESG results for one complete set of category grades.
///
/// Only [`Aggregator::assess`] builds this value; re-grading produces a new one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    grades: CategoryGrades,
    overall_score: u8,
    overall_grade: Grade,
    risk_level: RiskLevel,
    environment_grade: Grade,
    social_grade: Grade,
    governance_grade: Grade,
    overall_notes: String,
}

impl Assessment {
    pub fn grades(&self) -> &CategoryGrades {
        &self.grades
    }

    pub fn overall_score(&self) -> u8 {
        self.overall_score
    }

    pub fn overall_grade(&self) -> Grade {
        self.overall_grade
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    pub fn environment_grade(&self) -> Grade {
        self.environment_grade
    }

    pub fn social_grade(&self) -> Grade {
        self.social_grade
    }

    pub fn governance_grade(&self) -> Grade {
        self.governance_grade
    }

    pub fn pillar_grade(&self, pillar: Pillar) -> Grade {
        match pillar {
            Pillar::Environmental => self.environment_grade,
            Pillar::Social => self.social_grade,
            Pillar::Governance => self.governance_grade,
        }
    }

    pub fn overall_notes(&self) -> &str {
        &self.overall_notes
    }
}

/// Turns a complete grade map into overall and per-pillar results.
pub struct Aggregator;

impl Aggregator {
    /// `round(mean(values) / 4 * 100)` over all eleven categories.
    pub fn overall_score(grades: &CategoryGrades) -> Result<u8, IncompleteAssessmentError> {
        CategoryGrader::validate(grades)?;

        let total: u32 = grades
            .iter()
            .map(|(_, grade)| u32::from(GradeScale::value_of(grade)))
            .sum();
        let mean = f64::from(total) / CategoryId::COUNT as f64;
        let score = (mean / f64::from(GradeScale::MAX_VALUE) * 100.0).round();

        Ok(score.clamp(0.0, 100.0) as u8)
    }

    /// Mean of the pillar's own categories mapped through the pillar thresholds.
    /// Independent of the overall score and of the other pillars.
    pub fn pillar_grade(
        grades: &CategoryGrades,
        pillar: Pillar,
    ) -> Result<Grade, IncompleteAssessmentError> {
        CategoryGrader::validate(grades)?;
        Ok(pillar_grade_unchecked(grades, pillar))
    }

    pub fn assess(grades: CategoryGrades) -> Result<Assessment, IncompleteAssessmentError> {
        let overall_score = Self::overall_score(&grades)?;
        let overall_grade = GradeScale::grade_of(f64::from(overall_score), true);
        let risk_level = RiskLevel::for_score(overall_score);
        let overall_notes = SuggestionGenerator::generate(&grades)?;

        Ok(Assessment {
            environment_grade: pillar_grade_unchecked(&grades, Pillar::Environmental),
            social_grade: pillar_grade_unchecked(&grades, Pillar::Social),
            governance_grade: pillar_grade_unchecked(&grades, Pillar::Governance),
            grades,
            overall_score,
            overall_grade,
            risk_level,
            overall_notes,
        })
    }
}

fn pillar_grade_unchecked(grades: &CategoryGrades, pillar: Pillar) -> Grade {
    let values: Vec<f64> = grades
        .for_pillar(pillar)
        .map(|(_, grade)| f64::from(GradeScale::value_of(grade)))
        .collect();
    let average = values.iter().sum::<f64>() / values.len() as f64;
    GradeScale::pillar_grade_of(average)
}
