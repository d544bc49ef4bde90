//! End-to-end tests for the recommendation pipeline

mod common;

use pathwise_common::encoder::{Career, Degree, Field, LabelIndex};
use pathwise_common::forest::{Classifier, FeatureVector};
use pathwise_common::service::{CAREER_UNAVAILABLE, DEGREE_UNAVAILABLE, FIELD_UNAVAILABLE};
use pathwise_common::training::train;
use pathwise_common::{CompatibilityTable, Error, Recommendation, RecommendationService};

fn service() -> RecommendationService {
    let (bundle, _) = train(&common::records(), &common::params()).unwrap();
    RecommendationService::new(CompatibilityTable::default(), bundle)
}

#[test]
fn test_valid_pair_returns_three_labels() {
    let service = service();
    let rec = service.recommend("Maths", "Physics").unwrap();
    assert!(!rec.degraded);
    assert!(!rec.suggested_field.is_empty());
    assert!(!rec.degree_options.is_empty());
    assert!(!rec.career_paths.is_empty());
    assert!(service.encoders().field.contains(&rec.suggested_field));
    assert!(service.encoders().degree.contains(&rec.degree_options));
    assert!(service.encoders().career.contains(&rec.career_paths));
}

#[test]
fn test_field_follows_primary() {
    let service = service();
    assert_eq!(
        service.recommend("Maths", "Chemistry").unwrap().suggested_field,
        "Mathematical Sciences"
    );
    assert_eq!(
        service.recommend("Physics", "Space").unwrap().suggested_field,
        "Physical Sciences"
    );
}

#[test]
fn test_secondary_outside_allowed_set() {
    let err = service().recommend("Maths", "History").unwrap_err();
    assert!(matches!(err, Error::InvalidInterestPair { .. }));
}

#[test]
fn test_unknown_primary() {
    let err = service().recommend("Unknown", "Physics").unwrap_err();
    assert!(matches!(err, Error::InvalidInterestPair { .. }));
}

#[test]
fn test_untrained_secondary_degrades() {
    // Finance is allowed for Maths but never appeared in training data
    let service = service();
    let rec = service.recommend("Maths", "Finance").unwrap();
    assert_eq!(rec, Recommendation::unavailable());
    assert_eq!(rec.suggested_field, FIELD_UNAVAILABLE);
    assert_eq!(rec.degree_options, DEGREE_UNAVAILABLE);
    assert_eq!(rec.career_paths, CAREER_UNAVAILABLE);
    assert!(rec.degraded);
}

#[test]
fn test_untrained_primary_degrades() {
    let rec = service().recommend("Kannada", "History").unwrap();
    assert!(rec.degraded);
}

#[test]
fn test_predict_surfaces_unknown_label() {
    let service = service();
    let pair = pathwise_common::interests::InterestPair::new("Maths", "Finance");
    assert!(matches!(
        service.predict(&pair),
        Err(Error::UnknownLabel { column: "interest_2", .. })
    ));
}

/// Classifier returning a fixed (possibly out-of-range) index
struct Fixed(usize);

impl<C: pathwise_common::encoder::Column> Classifier<C> for Fixed {
    fn predict(&self, _features: &FeatureVector) -> pathwise_common::Result<LabelIndex<C>> {
        Ok(LabelIndex::from_raw(self.0))
    }

    fn n_classes(&self) -> usize {
        self.0 + 1
    }
}

#[test]
fn test_out_of_range_prediction_degrades() {
    let (bundle, _) = train(&common::records(), &common::params()).unwrap();
    let service = RecommendationService::with_classifiers(
        CompatibilityTable::default(),
        bundle.encoders,
        Box::new(Fixed(0)) as Box<dyn Classifier<Field>>,
        Box::new(Fixed(10_000)) as Box<dyn Classifier<Degree>>,
        Box::new(Fixed(0)) as Box<dyn Classifier<Career>>,
    );
    let pair = pathwise_common::interests::InterestPair::new("Maths", "Physics");
    assert!(matches!(
        service.predict(&pair),
        Err(Error::IndexOutOfRange { column: "degree_options", index: 10_000, .. })
    ));
    assert!(service.recommend("Maths", "Physics").unwrap().degraded);
}

/// Classifier whose model cannot answer
struct Failing;

impl<C: pathwise_common::encoder::Column> Classifier<C> for Failing {
    fn predict(&self, _features: &FeatureVector) -> pathwise_common::Result<LabelIndex<C>> {
        Err(Error::Prediction("model returned no class".to_string()))
    }

    fn n_classes(&self) -> usize {
        1
    }
}

#[test]
fn test_classifier_failure_degrades() {
    let (bundle, _) = train(&common::records(), &common::params()).unwrap();
    let service = RecommendationService::with_classifiers(
        CompatibilityTable::default(),
        bundle.encoders,
        Box::new(Fixed(0)) as Box<dyn Classifier<Field>>,
        Box::new(Fixed(0)) as Box<dyn Classifier<Degree>>,
        Box::new(Failing) as Box<dyn Classifier<Career>>,
    );
    let pair = pathwise_common::interests::InterestPair::new("Maths", "Physics");
    assert!(matches!(service.predict(&pair), Err(Error::Prediction(_))));
    assert_eq!(service.recommend("Maths", "Physics").unwrap(), Recommendation::unavailable());
}

#[test]
fn test_repeated_recommendations_agree() {
    let service = service();
    let first = service.recommend("Physics", "Biology").unwrap();
    for _ in 0..10 {
        assert_eq!(service.recommend("Physics", "Biology").unwrap(), first);
    }
}

#[test]
fn test_consistency_report_lists_drift() {
    let report = service().check_consistency();
    assert!(!report.is_consistent());
    assert_eq!(report.missing_primary, vec!["Kannada".to_string()]);
    assert!(report.missing_secondary.contains(&"Finance".to_string()));
    assert!(report.missing_secondary.contains(&"History".to_string()));
    assert_eq!(report.missing_secondary.len(), 2);
}

#[test]
fn test_candidates_are_shuffled_subset() {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let service = service();
    let mut rng = StdRng::seed_from_u64(1);
    let mut candidates = service.candidates("Maths", &mut rng);
    candidates.sort();
    let mut allowed = service.table().allowed("Maths").to_vec();
    allowed.sort();
    assert_eq!(candidates, allowed);
    assert!(service.candidates("Unknown", &mut rng).is_empty());
}
