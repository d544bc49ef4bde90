//! Recommendation service
//!
//! validate → encode → classify → decode. Built once at startup from a loaded
//! [`ModelBundle`] and shared read-only by every request.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, warn};

use crate::artifacts::{LabelEncoders, ModelBundle};
use crate::encoder::{Career, Degree, Field};
use crate::forest::{Classifier, FeatureVector};
use crate::interests::{CompatibilityTable, InterestPair};
use crate::Result;

pub const FIELD_UNAVAILABLE: &str = "Field Prediction Unavailable";
pub const DEGREE_UNAVAILABLE: &str = "Degree Prediction Unavailable";
pub const CAREER_UNAVAILABLE: &str = "Career Prediction Unavailable";

/// Decoded suggestion for one interest pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub suggested_field: String,
    pub degree_options: String,
    pub career_paths: String,
    /// Set when prediction failed and the placeholders were substituted
    pub degraded: bool,
}

impl Recommendation {
    /// Placeholder result returned when the prediction path fails
    pub fn unavailable() -> Self {
        Self {
            suggested_field: FIELD_UNAVAILABLE.to_string(),
            degree_options: DEGREE_UNAVAILABLE.to_string(),
            career_paths: CAREER_UNAVAILABLE.to_string(),
            degraded: true,
        }
    }
}

/// Table entries with no training-time encoding
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsistencyReport {
    pub missing_primary: Vec<String>,
    pub missing_secondary: Vec<String>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.missing_primary.is_empty() && self.missing_secondary.is_empty()
    }
}

pub struct RecommendationService {
    table: CompatibilityTable,
    encoders: LabelEncoders,
    field: Box<dyn Classifier<Field>>,
    degree: Box<dyn Classifier<Degree>>,
    career: Box<dyn Classifier<Career>>,
}

impl RecommendationService {
    pub fn new(table: CompatibilityTable, bundle: ModelBundle) -> Self {
        Self::with_classifiers(
            table,
            bundle.encoders,
            Box::new(bundle.field_model),
            Box::new(bundle.degree_model),
            Box::new(bundle.career_model),
        )
    }

    /// Assemble from arbitrary classifier implementations
    pub fn with_classifiers(
        table: CompatibilityTable,
        encoders: LabelEncoders,
        field: Box<dyn Classifier<Field>>,
        degree: Box<dyn Classifier<Degree>>,
        career: Box<dyn Classifier<Career>>,
    ) -> Self {
        Self {
            table,
            encoders,
            field,
            degree,
            career,
        }
    }

    pub fn table(&self) -> &CompatibilityTable {
        &self.table
    }

    pub fn encoders(&self) -> &LabelEncoders {
        &self.encoders
    }

    /// Secondary choices for `primary` in random display order
    pub fn candidates<R: Rng + ?Sized>(&self, primary: &str, rng: &mut R) -> Vec<String> {
        self.table.shuffled_candidates(primary, rng)
    }

    /// Validate and recommend; prediction-path failures degrade to placeholders
    pub fn recommend(&self, primary: &str, secondary: &str) -> Result<Recommendation> {
        let pair = InterestPair::new(primary, secondary);
        self.table.validate(&pair)?;

        match self.predict(&pair) {
            Ok(recommendation) => Ok(recommendation),
            Err(e) if e.is_prediction_failure() => {
                warn!("Prediction failed for {} / {}: {}", primary, secondary, e);
                Ok(Recommendation::unavailable())
            }
            Err(e) => Err(e),
        }
    }

    /// Encode, classify and decode without validation or degradation
    pub fn predict(&self, pair: &InterestPair) -> Result<Recommendation> {
        let features = FeatureVector::new(
            self.encoders.primary.encode(&pair.primary)?,
            self.encoders.secondary.encode(&pair.secondary)?,
        );

        let field = self.field.predict(&features)?;
        let degree = self.degree.predict(&features)?;
        let career = self.career.predict(&features)?;
        debug!("Predicted {} {} {} for {:?}", field, degree, career, features);

        Ok(Recommendation {
            suggested_field: self.encoders.field.decode(field)?.to_string(),
            degree_options: self.encoders.degree.decode(degree)?.to_string(),
            career_paths: self.encoders.career.decode(career)?.to_string(),
            degraded: false,
        })
    }

    /// Compare the table against the trained input vocabularies, warning on drift
    pub fn check_consistency(&self) -> ConsistencyReport {
        let mut report = ConsistencyReport::default();
        for primary in self.table.primaries() {
            if !self.encoders.primary.contains(primary) {
                report.missing_primary.push(primary.to_string());
            }
        }
        for pair in self.table.pairs() {
            if !self.encoders.secondary.contains(&pair.secondary)
                && !report.missing_secondary.contains(&pair.secondary)
            {
                report.missing_secondary.push(pair.secondary);
            }
        }

        for label in &report.missing_primary {
            warn!("Primary interest '{}' has no trained encoding", label);
        }
        for label in &report.missing_secondary {
            warn!("Secondary interest '{}' has no trained encoding", label);
        }
        report
    }
}
