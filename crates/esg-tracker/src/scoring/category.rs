use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{IncompleteAssessmentError, ScoringError};
use super::grade::Grade;

/// The three ESG groupings categories roll up into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pillar {
    #[serde(alias = "environment")]
    Environmental,
    Social,
    Governance,
}

impl Pillar {
    pub const fn ordered() -> [Self; 3] {
        [Self::Environmental, Self::Social, Self::Governance]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Environmental => "Environmental",
            Self::Social => "Social",
            Self::Governance => "Governance",
        }
    }

    /// Categories belonging to this pillar, in canonical order.
    pub fn categories(self) -> &'static [Category] {
        match self {
            Self::Environmental => &CATEGORIES[0..6],
            Self::Social => &CATEGORIES[6..9],
            Self::Governance => &CATEGORIES[9..11],
        }
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifier for one of the eleven scored ESG sub-topics.
///
/// Variant order is the canonical questionnaire order; `Ord` follows it so that
/// ordered maps keyed by `CategoryId` iterate canonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryId {
    ProjectType,
    EnergyUse,
    ResourceUse,
    PollutionWaste,
    BiodiversityImpact,
    ClimateRisk,
    LaborPractices,
    CommunityImpact,
    HumanRights,
    ResponsibleOperation,
    CorruptionEthics,
}

impl CategoryId {
    pub const COUNT: usize = 11;

    pub const fn ordered() -> [Self; Self::COUNT] {
        [
            Self::ProjectType,
            Self::EnergyUse,
            Self::ResourceUse,
            Self::PollutionWaste,
            Self::BiodiversityImpact,
            Self::ClimateRisk,
            Self::LaborPractices,
            Self::CommunityImpact,
            Self::HumanRights,
            Self::ResponsibleOperation,
            Self::CorruptionEthics,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProjectType => "project_type",
            Self::EnergyUse => "energy_use",
            Self::ResourceUse => "resource_use",
            Self::PollutionWaste => "pollution_waste",
            Self::BiodiversityImpact => "biodiversity_impact",
            Self::ClimateRisk => "climate_risk",
            Self::LaborPractices => "labor_practices",
            Self::CommunityImpact => "community_impact",
            Self::HumanRights => "human_rights",
            Self::ResponsibleOperation => "responsible_operation",
            Self::CorruptionEthics => "corruption_ethics",
        }
    }

    pub fn category(self) -> &'static Category {
        &CATEGORIES[self as usize]
    }

    pub fn pillar(self) -> Pillar {
        self.category().pillar
    }

    pub fn title(self) -> &'static str {
        self.category().title
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryId {
    type Err = ScoringError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ordered()
            .into_iter()
            .find(|id| id.as_str() == value)
            .ok_or_else(|| ScoringError::UnknownCategory(value.to_string()))
    }
}

/// Immutable questionnaire entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub pillar: Pillar,
    pub title: &'static str,
    pub description: &'static str,
}

/// The fixed 6/3/2 partition. Index positions match `CategoryId` discriminants.
pub static CATEGORIES: [Category; CategoryId::COUNT] = [
    Category {
        id: CategoryId::ProjectType,
        pillar: Pillar::Environmental,
        title: "Project Type",
        description: "Assess the inherent environmental impact of the project's primary activities.",
    },
    Category {
        id: CategoryId::EnergyUse,
        pillar: Pillar::Environmental,
        title: "Energy Use",
        description: "Evaluate energy consumption patterns and sources (renewable vs. non-renewable).",
    },
    Category {
        id: CategoryId::ResourceUse,
        pillar: Pillar::Environmental,
        title: "Resource Use",
        description: "Assess consumption of natural resources, recycling practices, and waste reduction.",
    },
    Category {
        id: CategoryId::PollutionWaste,
        pillar: Pillar::Environmental,
        title: "Pollution & Waste",
        description: "Evaluate emissions, waste management practices, and pollution prevention.",
    },
    Category {
        id: CategoryId::BiodiversityImpact,
        pillar: Pillar::Environmental,
        title: "Biodiversity Impact",
        description: "Assess potential impacts on local ecosystems, habitat preservation efforts.",
    },
    Category {
        id: CategoryId::ClimateRisk,
        pillar: Pillar::Environmental,
        title: "Climate Risk",
        description: "Evaluate risks related to climate change and adaptation/mitigation strategies.",
    },
    Category {
        id: CategoryId::LaborPractices,
        pillar: Pillar::Social,
        title: "Labor Practices",
        description: "Evaluate working conditions, fair wages, and employee health and safety measures.",
    },
    Category {
        id: CategoryId::CommunityImpact,
        pillar: Pillar::Social,
        title: "Community Impact",
        description: "Assess engagement with local communities and benefit-sharing initiatives.",
    },
    Category {
        id: CategoryId::HumanRights,
        pillar: Pillar::Social,
        title: "Human Rights",
        description: "Evaluate potential human rights risks and due diligence measures.",
    },
    Category {
        id: CategoryId::ResponsibleOperation,
        pillar: Pillar::Governance,
        title: "Responsible Operation",
        description: "Assess project governance structure, accountability, and management quality.",
    },
    Category {
        id: CategoryId::CorruptionEthics,
        pillar: Pillar::Governance,
        title: "Corruption & Ethics",
        description: "Evaluate anti-corruption measures and ethical business practices.",
    },
];

/// Grades keyed by category. Categories without an entry read as unassigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>")]
pub struct CategoryGrades(BTreeMap<CategoryId, Grade>);

impl CategoryGrades {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same grade for every category; handy for baselines and fixtures.
    pub fn uniform(grade: Grade) -> Self {
        CategoryId::ordered()
            .into_iter()
            .map(|id| (id, grade))
            .collect()
    }

    /// Boundary constructor for raw form input. Unknown ids and invalid grades are
    /// rejected rather than skipped or coerced.
    pub fn parse<I, K, V>(pairs: I) -> Result<Self, ScoringError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut grades = Self::new();
        for (key, value) in pairs {
            let id: CategoryId = key.as_ref().parse()?;
            let grade: Grade =
                value
                    .as_ref()
                    .parse()
                    .map_err(|source| ScoringError::InvalidGrade {
                        category: id.as_str().to_string(),
                        source,
                    })?;
            grades.set(id, grade);
        }
        Ok(grades)
    }

    pub fn set(&mut self, id: CategoryId, grade: Grade) -> &mut Self {
        self.0.insert(id, grade);
        self
    }

    pub fn with(mut self, id: CategoryId, grade: Grade) -> Self {
        self.set(id, grade);
        self
    }

    pub fn without(mut self, id: CategoryId) -> Self {
        self.0.remove(&id);
        self
    }

    pub fn get(&self, id: CategoryId) -> Grade {
        self.0.get(&id).copied().unwrap_or_default()
    }

    /// Every category in canonical order, unassigned ones included.
    pub fn iter(&self) -> impl Iterator<Item = (CategoryId, Grade)> + '_ {
        CategoryId::ordered()
            .into_iter()
            .map(move |id| (id, self.get(id)))
    }

    pub fn for_pillar(&self, pillar: Pillar) -> impl Iterator<Item = (CategoryId, Grade)> + '_ {
        pillar
            .categories()
            .iter()
            .map(move |category| (category.id, self.get(category.id)))
    }

    /// Categories still lacking a letter grade, in canonical order.
    pub fn missing(&self) -> Vec<CategoryId> {
        self.iter()
            .filter(|(_, grade)| !grade.is_assigned())
            .map(|(id, _)| id)
            .collect()
    }
}

impl FromIterator<(CategoryId, Grade)> for CategoryGrades {
    fn from_iter<T: IntoIterator<Item = (CategoryId, Grade)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl TryFrom<BTreeMap<String, String>> for CategoryGrades {
    type Error = ScoringError;

    fn try_from(raw: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

/// Completeness gate that runs before any aggregation.
pub struct CategoryGrader;

impl CategoryGrader {
    pub fn is_complete(grades: &CategoryGrades) -> bool {
        grades.iter().all(|(_, grade)| grade.is_assigned())
    }

    pub fn validate(grades: &CategoryGrades) -> Result<(), IncompleteAssessmentError> {
        let missing = grades.missing();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(IncompleteAssessmentError { missing })
        }
    }
}
