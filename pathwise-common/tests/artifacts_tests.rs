//! Artifact persistence: save/load and startup failure modes

mod common;

use pathwise_common::artifacts::{CAREER_MODEL_FILE, FIELD_VOCAB_FILE, PRIMARY_VOCAB_FILE};
use pathwise_common::encoder::{Column, Vocabulary};
use pathwise_common::forest::Classifier;
use pathwise_common::training::{train, train_from_csv};
use pathwise_common::{CompatibilityTable, Error, ModelBundle, RecommendationService};
use std::fs;

#[test]
fn test_saved_models_behave_identically() {
    let dir = tempfile::tempdir().unwrap();
    let (bundle, _) = train(&common::records(), &common::params()).unwrap();
    bundle.save(dir.path()).unwrap();

    let loaded = ModelBundle::load(dir.path()).unwrap();
    assert_eq!(loaded.encoders.primary, bundle.encoders.primary);
    assert_eq!(loaded.encoders.secondary, bundle.encoders.secondary);
    assert_eq!(loaded.encoders.field, bundle.encoders.field);
    assert_eq!(loaded.encoders.degree, bundle.encoders.degree);
    assert_eq!(loaded.encoders.career, bundle.encoders.career);
    assert_eq!(loaded.field_model.n_classes(), bundle.field_model.n_classes());
    assert_eq!(loaded.degree_model.n_classes(), bundle.degree_model.n_classes());
    assert_eq!(loaded.career_model.n_classes(), bundle.career_model.n_classes());

    let before = RecommendationService::new(CompatibilityTable::default(), bundle);
    let after = RecommendationService::new(CompatibilityTable::default(), loaded);
    for pair in CompatibilityTable::default().pairs() {
        assert_eq!(
            before.recommend(&pair.primary, &pair.secondary).unwrap(),
            after.recommend(&pair.primary, &pair.secondary).unwrap()
        );
    }
}

fn assert_round_trips<C: Column>(vocab: &Vocabulary<C>) {
    assert!(!vocab.is_empty(), "{} vocabulary is empty", C::NAME);
    for label in vocab.labels() {
        let index = vocab.encode(label).unwrap();
        assert_eq!(vocab.decode(index).unwrap(), label.as_str(), "column {}", C::NAME);
    }
}

#[test]
fn test_reloaded_vocabularies_round_trip_every_label() {
    let dir = tempfile::tempdir().unwrap();
    let (bundle, _) = train(&common::records(), &common::params()).unwrap();
    bundle.save(dir.path()).unwrap();
    let loaded = ModelBundle::load(dir.path()).unwrap();

    assert_round_trips(&loaded.encoders.primary);
    assert_round_trips(&loaded.encoders.secondary);
    assert_round_trips(&loaded.encoders.field);
    assert_round_trips(&loaded.encoders.degree);
    assert_round_trips(&loaded.encoders.career);

    // Indices assigned before saving still mean the same labels after loading
    for label in bundle.encoders.degree.labels() {
        assert_eq!(
            loaded.encoders.degree.encode(label).unwrap(),
            bundle.encoders.degree.encode(label).unwrap()
        );
    }
    for label in bundle.encoders.field.labels() {
        assert_eq!(
            loaded.encoders.field.encode(label).unwrap(),
            bundle.encoders.field.encode(label).unwrap()
        );
    }
}

#[test]
fn test_save_replaces_previous_set() {
    let root = tempfile::tempdir().unwrap();
    let models = root.path().join("models");

    let (first, _) = train(&common::records()[..4], &common::params()).unwrap();
    first.save(&models).unwrap();
    let (second, _) = train(&common::records(), &common::params()).unwrap();
    second.save(&models).unwrap();

    let loaded = ModelBundle::load(&models).unwrap();
    assert_eq!(loaded.encoders.degree, second.encoders.degree);
    assert_eq!(loaded.encoders.primary, second.encoders.primary);

    // Only the models directory remains; staging and retired sets are gone
    let entries: Vec<_> = fs::read_dir(root.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("models")]);
    assert_eq!(fs::read_dir(&models).unwrap().count(), 8);
}

#[test]
fn test_failed_save_leaves_previous_set() {
    let root = tempfile::tempdir().unwrap();
    let models = root.path().join("models");
    let (bundle, _) = train(&common::records(), &common::params()).unwrap();
    bundle.save(&models).unwrap();

    // A path with no final component cannot be swapped in
    assert!(bundle.save(&root.path().join("models").join("..")).is_err());
    assert!(ModelBundle::load(&models).is_ok());
}

#[test]
fn test_missing_directory_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let err = ModelBundle::load(&dir.path().join("nope")).unwrap_err();
    assert!(matches!(err, Error::ModelUnavailable(_)));
}

#[test]
fn test_missing_file_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let (bundle, _) = train(&common::records(), &common::params()).unwrap();
    bundle.save(dir.path()).unwrap();
    fs::remove_file(dir.path().join(CAREER_MODEL_FILE)).unwrap();

    match ModelBundle::load(dir.path()) {
        Err(Error::ModelUnavailable(msg)) => assert!(msg.contains(CAREER_MODEL_FILE), "{}", msg),
        other => panic!("expected ModelUnavailable, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_corrupt_file_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let (bundle, _) = train(&common::records(), &common::params()).unwrap();
    bundle.save(dir.path()).unwrap();
    fs::write(dir.path().join(PRIMARY_VOCAB_FILE), b"not bincode").unwrap();

    assert!(matches!(
        ModelBundle::load(dir.path()),
        Err(Error::ModelUnavailable(_))
    ));
}

#[test]
fn test_swapped_vocabulary_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let (bundle, _) = train(&common::records(), &common::params()).unwrap();
    bundle.save(dir.path()).unwrap();
    // A primary-interest vocabulary in the field slot fails the column check
    fs::copy(dir.path().join(PRIMARY_VOCAB_FILE), dir.path().join(FIELD_VOCAB_FILE)).unwrap();

    assert!(matches!(
        ModelBundle::load(dir.path()),
        Err(Error::ModelUnavailable(_))
    ));
}

#[test]
fn test_train_from_csv_writes_all_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("study_path_suggestions.csv");
    let mut csv = String::from("interest_1,interest_2,suggested_field,degree_options,career_paths\n");
    for r in common::records() {
        csv.push_str(&format!(
            "{},{},{},{},{}\n",
            r.interest_1, r.interest_2, r.suggested_field, r.degree_options, r.career_paths
        ));
    }
    fs::write(&csv_path, csv).unwrap();

    let models = dir.path().join("models");
    let report = train_from_csv(&csv_path, &models, &common::params()).unwrap();
    assert_eq!(report.rows, common::records().len());
    assert_eq!(fs::read_dir(&models).unwrap().count(), 8);
    assert!(ModelBundle::load(&models).is_ok());
}
