use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::InvalidGradeError;

/// Ordinal letter grade assigned to a category, pillar, or whole assessment.
///
/// `A` is the best grade. `Unassigned` marks a questionnaire entry the assessor
/// has not answered yet and carries no numeric weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Grade {
    A,
    B,
    C,
    D,
    #[default]
    Unassigned,
}

impl Grade {
    pub const fn letter(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::Unassigned => "",
        }
    }

    pub const fn is_assigned(self) -> bool {
        !matches!(self, Self::Unassigned)
    }

    /// C and D grades are the ones that trigger remediation text.
    pub const fn is_low(self) -> bool {
        matches!(self, Self::C | Self::D)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unassigned => f.write_str("unassigned"),
            other => f.write_str(other.letter()),
        }
    }
}

impl FromStr for Grade {
    type Err = InvalidGradeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            "" => Ok(Self::Unassigned),
            other => Err(InvalidGradeError {
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Grade {
    type Error = InvalidGradeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Grade> for String {
    fn from(grade: Grade) -> Self {
        grade.letter().to_string()
    }
}

// Inclusive floors of the overall-score bands.
const A_FLOOR: u8 = 75;
const B_FLOOR: u8 = 50;
const C_FLOOR: u8 = 25;

/// Numeric scale shared by the overall and pillar aggregations.
pub struct GradeScale;

impl GradeScale {
    pub const MAX_VALUE: u8 = 4;

    pub const fn value_of(grade: Grade) -> u8 {
        match grade {
            Grade::A => 4,
            Grade::B => 3,
            Grade::C => 2,
            Grade::D => 1,
            Grade::Unassigned => 0,
        }
    }

    /// Maps an already-rounded 0-100 score to a grade. Band floors are inclusive.
    pub fn grade_of(score: f64, all_assigned: bool) -> Grade {
        if !all_assigned {
            return Grade::Unassigned;
        }

        if score >= f64::from(A_FLOOR) {
            Grade::A
        } else if score >= f64::from(B_FLOOR) {
            Grade::B
        } else if score >= f64::from(C_FLOOR) {
            Grade::C
        } else {
            Grade::D
        }
    }

    /// Maps a mean of numeric category values (1.0 to 4.0) to a pillar grade.
    pub fn pillar_grade_of(average: f64) -> Grade {
        if average >= 3.5 {
            Grade::A
        } else if average >= 2.5 {
            Grade::B
        } else if average >= 1.5 {
            Grade::C
        } else {
            Grade::D
        }
    }
}

/// Coarse risk label derived one-to-one from the overall grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl RiskLevel {
    pub const fn ordered() -> [Self; 4] {
        [Self::Low, Self::Moderate, Self::High, Self::VeryHigh]
    }

    pub const fn for_grade(grade: Grade) -> Option<Self> {
        match grade {
            Grade::A => Some(Self::Low),
            Grade::B => Some(Self::Moderate),
            Grade::C => Some(Self::High),
            Grade::D => Some(Self::VeryHigh),
            Grade::Unassigned => None,
        }
    }

    /// Risk band of an overall score. Agrees with `for_grade` applied to
    /// `GradeScale::grade_of(score, true)`.
    pub const fn for_score(score: u8) -> Self {
        if score >= A_FLOOR {
            Self::Low
        } else if score >= B_FLOOR {
            Self::Moderate
        } else if score >= C_FLOOR {
            Self::High
        } else {
            Self::VeryHigh
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        Self::ordered()
            .into_iter()
            .find(|level| level.label().replace(' ', "").to_ascii_lowercase() == normalized)
            .ok_or_else(|| format!("unknown risk level '{value}'"))
    }
}
