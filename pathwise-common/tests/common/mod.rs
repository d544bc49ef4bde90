//! Shared fixtures: a small dataset built from the compatibility table

use pathwise_common::dataset::StudyPathRecord;
use pathwise_common::forest::ForestParams;
use pathwise_common::interests::CompatibilityTable;

pub fn field_for(primary: &str) -> &'static str {
    match primary {
        "Maths" => "Mathematical Sciences",
        "Physics" => "Physical Sciences",
        "Chemistry" => "Chemical Sciences",
        "Computer" => "Computer Science",
        _ => "Humanities",
    }
}

pub fn career_for(secondary: &str) -> &'static str {
    match secondary {
        "Physics" => "Research Physicist",
        "Computer" => "Software Engineer",
        "Chemistry" => "Analytical Chemist",
        "Biology" => "Biotechnologist",
        "Space" => "Astronomer",
        "Finance" => "Quantitative Analyst",
        _ => "Historian",
    }
}

/// Every table pair except those with secondary "Finance" or primary "Kannada",
/// so those labels have no trained encoding
pub fn records() -> Vec<StudyPathRecord> {
    CompatibilityTable::default()
        .pairs()
        .filter(|p| p.secondary != "Finance" && p.primary != "Kannada")
        .map(|p| StudyPathRecord {
            suggested_field: field_for(&p.primary).to_string(),
            degree_options: format!("B.Sc {} with {}", p.primary, p.secondary),
            career_paths: career_for(&p.secondary).to_string(),
            interest_1: p.primary,
            interest_2: p.secondary,
        })
        .collect()
}

pub fn params() -> ForestParams {
    ForestParams {
        n_estimators: 25,
        ..ForestParams::default()
    }
}
