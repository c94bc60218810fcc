use serde::Deserialize;
use std::io::Read;

#[derive(Debug)]
pub(crate) struct GradeRow {
    pub(crate) category_key: String,
    pub(crate) grade: String,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<GradeRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<SheetRow>() {
        let row = record?;
        if row.category.trim().is_empty() {
            continue;
        }

        rows.push(GradeRow {
            category_key: normalize_category(&row.category),
            grade: row.grade,
        });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct SheetRow {
    #[serde(alias = "Category")]
    category: String,
    #[serde(alias = "Grade", default)]
    grade: String,
}

/// Folds ids and display titles to the same key:
/// `"Pollution & Waste"` and `"pollution_waste"` both become `pollution_waste`.
pub(crate) fn normalize_category(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}', '&'], " ");
    let mut key = String::with_capacity(cleaned.len());
    for ch in cleaned.chars() {
        if ch.is_ascii_alphanumeric() {
            key.push(ch.to_ascii_lowercase());
        } else if !key.is_empty() && !key.ends_with('_') {
            key.push('_');
        }
    }
    key.trim_end_matches('_').to_string()
}
