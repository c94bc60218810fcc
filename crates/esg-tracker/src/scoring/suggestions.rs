use super::category::{CategoryGrader, CategoryGrades, CategoryId};
use super::error::IncompleteAssessmentError;

pub const NO_CONCERNS_MESSAGE: &str = "No significant ESG concerns were identified. Continue monitoring all ESG aspects to maintain strong performance.";

/// Deterministic remediation notes for categories graded C or D.
pub struct SuggestionGenerator;

impl SuggestionGenerator {
    /// One `"<Title>: <remediation>"` line per low category, canonical order,
    /// newline-joined. Returns [`NO_CONCERNS_MESSAGE`] when nothing is low.
    pub fn generate(grades: &CategoryGrades) -> Result<String, IncompleteAssessmentError> {
        CategoryGrader::validate(grades)?;

        let lines: Vec<String> = Self::flagged(grades)
            .into_iter()
            .map(|id| format!("{}: {}", id.title(), Self::remediation(id)))
            .collect();

        if lines.is_empty() {
            Ok(NO_CONCERNS_MESSAGE.to_string())
        } else {
            Ok(lines.join("\n"))
        }
    }

    pub fn flagged(grades: &CategoryGrades) -> Vec<CategoryId> {
        grades
            .iter()
            .filter(|(_, grade)| grade.is_low())
            .map(|(id, _)| id)
            .collect()
    }

    pub const fn remediation(id: CategoryId) -> &'static str {
        match id {
            CategoryId::ProjectType => "Consider redesigning high-impact aspects of the project to reduce environmental footprint.",
            CategoryId::EnergyUse => "Implement energy efficiency measures and increase renewable energy sourcing.",
            CategoryId::ResourceUse => "Adopt circular economy principles and improve material efficiency in operations.",
            CategoryId::PollutionWaste => "Strengthen waste management practices and implement pollution prevention technologies.",
            CategoryId::BiodiversityImpact => "Develop habitat conservation plans and minimize disturbance to natural ecosystems.",
            CategoryId::ClimateRisk => "Implement climate adaptation measures and reduce climate vulnerability in project design.",
            CategoryId::LaborPractices => "Improve workplace safety standards and ensure fair compensation policies.",
            CategoryId::CommunityImpact => "Strengthen community engagement processes and develop local benefit-sharing initiatives.",
            CategoryId::HumanRights => "Implement human rights due diligence processes throughout operations and supply chain.",
            CategoryId::ResponsibleOperation => "Enhance management transparency and create clear accountability mechanisms.",
            CategoryId::CorruptionEthics => "Strengthen anti-corruption policies and provide ethics training to all staff.",
        }
    }
}
