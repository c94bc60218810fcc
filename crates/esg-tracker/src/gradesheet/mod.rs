//! Offline grade sheets: a two-column CSV (`category,grade`) filled in by an
//! assessor and scored without going through the HTTP form.

mod parser;

use crate::scoring::{CategoryGrades, ScoringError};
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum GradeSheetImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Scoring(ScoringError),
}

impl std::fmt::Display for GradeSheetImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GradeSheetImportError::Io(err) => write!(f, "failed to read grade sheet: {}", err),
            GradeSheetImportError::Csv(err) => write!(f, "invalid grade sheet CSV: {}", err),
            GradeSheetImportError::Scoring(err) => {
                write!(f, "grade sheet rejected: {}", err)
            }
        }
    }
}

impl std::error::Error for GradeSheetImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GradeSheetImportError::Io(err) => Some(err),
            GradeSheetImportError::Csv(err) => Some(err),
            GradeSheetImportError::Scoring(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for GradeSheetImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for GradeSheetImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<ScoringError> for GradeSheetImportError {
    fn from(err: ScoringError) -> Self {
        Self::Scoring(err)
    }
}

pub struct GradeSheetImporter;

impl GradeSheetImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<CategoryGrades, GradeSheetImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Later rows for the same category replace earlier ones. Completeness is not
    /// checked here; the aggregator enforces it.
    pub fn from_reader<R: Read>(reader: R) -> Result<CategoryGrades, GradeSheetImportError> {
        let rows = parser::parse_rows(reader)?;
        let grades =
            CategoryGrades::parse(rows.into_iter().map(|row| (row.category_key, row.grade)))?;
        Ok(grades)
    }
}
