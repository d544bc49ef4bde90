//! Study-path training dataset
//!
//! CSV with one row per observed (interest pair → suggestion) example.
//! Required header columns are the five categorical column names; any other
//! columns are ignored.

use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::encoder::{Career, Column, Degree, Field, PrimaryInterest, SecondaryInterest};
use crate::{Error, Result};

/// Column names every dataset must carry
pub const REQUIRED_COLUMNS: [&str; 5] = [
    PrimaryInterest::NAME,
    SecondaryInterest::NAME,
    Field::NAME,
    Degree::NAME,
    Career::NAME,
];

/// One training example
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StudyPathRecord {
    pub interest_1: String,
    pub interest_2: String,
    pub suggested_field: String,
    pub degree_options: String,
    pub career_paths: String,
}

impl StudyPathRecord {
    fn first_empty_column(&self) -> Option<&'static str> {
        [
            (PrimaryInterest::NAME, &self.interest_1),
            (SecondaryInterest::NAME, &self.interest_2),
            (Field::NAME, &self.suggested_field),
            (Degree::NAME, &self.degree_options),
            (Career::NAME, &self.career_paths),
        ]
        .into_iter()
        .find(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
    }
}

/// Load every record from a CSV file
pub fn load_records(path: &Path) -> Result<Vec<StudyPathRecord>> {
    let file = File::open(path)
        .map_err(|e| Error::Dataset(format!("cannot open {}: {}", path.display(), e)))?;
    let records = read_records(file)?;
    info!("Loaded {} training rows from {}", records.len(), path.display());
    Ok(records)
}

/// Parse records from any CSV source
pub fn read_records<R: Read>(source: R) -> Result<Vec<StudyPathRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| Error::Dataset(format!("cannot read header: {}", e)))?
        .clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(Error::Dataset(format!("missing required column '{}'", missing)));
    }

    let mut records = Vec::new();
    for (i, row) in reader.deserialize::<StudyPathRecord>().enumerate() {
        // Header is line 1
        let line = i + 2;
        let record = row.map_err(|e| Error::Dataset(format!("line {}: {}", line, e)))?;
        if let Some(column) = record.first_empty_column() {
            return Err(Error::Dataset(format!("line {}: empty value in '{}'", line, column)));
        }
        records.push(record);
    }
    Ok(records)
}
