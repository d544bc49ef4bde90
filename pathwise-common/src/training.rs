//! Offline training job
//!
//! Fits the five vocabularies on the dataset columns, encodes every row, and
//! trains one forest per output column. The result is a [`ModelBundle`] ready
//! to be saved as artifacts.

use std::path::Path;
use tracing::info;

use crate::artifacts::{LabelEncoders, ModelBundle};
use crate::dataset::{self, StudyPathRecord};
use crate::encoder::{LabelIndex, Vocabulary};
use crate::forest::{FeatureVector, ForestParams, RandomForest};
use crate::{Error, Result};

/// Resubstitution accuracy of each trained forest
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingReport {
    pub rows: usize,
    pub field_accuracy: f64,
    pub degree_accuracy: f64,
    pub career_accuracy: f64,
}

/// Train all models from in-memory records
pub fn train(records: &[StudyPathRecord], params: &ForestParams) -> Result<(ModelBundle, TrainingReport)> {
    if records.is_empty() {
        return Err(Error::Training("dataset has no rows".to_string()));
    }

    let encoders = LabelEncoders {
        primary: Vocabulary::fit(records.iter().map(|r| &r.interest_1))?,
        secondary: Vocabulary::fit(records.iter().map(|r| &r.interest_2))?,
        field: Vocabulary::fit(records.iter().map(|r| &r.suggested_field))?,
        degree: Vocabulary::fit(records.iter().map(|r| &r.degree_options))?,
        career: Vocabulary::fit(records.iter().map(|r| &r.career_paths))?,
    };
    info!(
        "Vocabulary sizes: interest_1={} interest_2={} field={} degree={} career={}",
        encoders.primary.len(),
        encoders.secondary.len(),
        encoders.field.len(),
        encoders.degree.len(),
        encoders.career.len()
    );

    let mut features = Vec::with_capacity(records.len());
    let mut fields = Vec::with_capacity(records.len());
    let mut degrees = Vec::with_capacity(records.len());
    let mut careers = Vec::with_capacity(records.len());
    for record in records {
        features.push(FeatureVector::new(
            encoders.primary.encode(&record.interest_1)?,
            encoders.secondary.encode(&record.interest_2)?,
        ));
        fields.push(encoders.field.encode(&record.suggested_field)?);
        degrees.push(encoders.degree.encode(&record.degree_options)?);
        careers.push(encoders.career.encode(&record.career_paths)?);
    }

    let field_model = fit_logged(&features, &fields, encoders.field.len(), params)?;
    let degree_model = fit_logged(&features, &degrees, encoders.degree.len(), params)?;
    let career_model = fit_logged(&features, &careers, encoders.career.len(), params)?;

    let report = TrainingReport {
        rows: records.len(),
        field_accuracy: field_model.accuracy(&features, &fields),
        degree_accuracy: degree_model.accuracy(&features, &degrees),
        career_accuracy: career_model.accuracy(&features, &careers),
    };
    info!(
        "Training accuracy: field={:.3} degree={:.3} career={:.3}",
        report.field_accuracy, report.degree_accuracy, report.career_accuracy
    );

    Ok((
        ModelBundle {
            encoders,
            field_model,
            degree_model,
            career_model,
        },
        report,
    ))
}

fn fit_logged<C: crate::encoder::Column>(
    features: &[FeatureVector],
    targets: &[LabelIndex<C>],
    n_classes: usize,
    params: &ForestParams,
) -> Result<RandomForest<C>> {
    let model = RandomForest::fit(features, targets, n_classes, params)?;
    info!("Trained {} model: {} trees over {} classes", C::NAME, model.n_trees(), n_classes);
    Ok(model)
}

/// Read the CSV, train, and write artifacts to `models_dir`
pub fn train_from_csv(data: &Path, models_dir: &Path, params: &ForestParams) -> Result<TrainingReport> {
    let records = dataset::load_records(data)?;
    let (bundle, report) = train(&records, params)?;
    bundle.save(models_dir)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::Classifier;

    fn record(a: &str, b: &str, field: &str, degree: &str, career: &str) -> StudyPathRecord {
        StudyPathRecord {
            interest_1: a.to_string(),
            interest_2: b.to_string(),
            suggested_field: field.to_string(),
            degree_options: degree.to_string(),
            career_paths: career.to_string(),
        }
    }

    #[test]
    fn test_train_fits_each_column_independently() {
        let records = vec![
            record("Maths", "Physics", "Physical Sciences", "B.Sc Physics", "Physicist"),
            record("Physics", "Space", "Astronomy", "B.Sc Astrophysics", "Astronomer"),
        ];
        let params = ForestParams {
            n_estimators: 5,
            ..ForestParams::default()
        };
        let (bundle, report) = train(&records, &params).unwrap();
        assert_eq!(report.rows, 2);
        assert_eq!(bundle.encoders.primary.labels(), &["Maths", "Physics"]);
        assert_eq!(bundle.encoders.secondary.labels(), &["Physics", "Space"]);
        // "Physics" is index 1 as a primary but index 0 as a secondary
        assert_eq!(bundle.encoders.primary.encode("Physics").unwrap().get(), 1);
        assert_eq!(bundle.encoders.secondary.encode("Physics").unwrap().get(), 0);
        assert_eq!(bundle.field_model.n_classes(), 2);
    }

    #[test]
    fn test_train_empty_fails() {
        assert!(matches!(
            train(&[], &ForestParams::default()),
            Err(Error::Training(_))
        ));
    }
}
