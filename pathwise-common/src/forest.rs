//! Random forest classifiers
//!
//! One forest per output column (field, degree, career). Each takes the two
//! encoded interest indices as numeric features and predicts a class index in
//! the output column's vocabulary.
//!
//! Training and inference are delegated to smartcore's
//! `RandomForestClassifier`; `RandomForest<C>` only ties the model to its
//! output column and converts between `FeatureVector`/`LabelIndex` and the
//! library's matrix types. Training is deterministic for a given seed.

use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::marker::PhantomData;

use crate::encoder::{Column, LabelIndex, PrimaryInterest, SecondaryInterest};
use crate::{Error, Result};

/// Number of input features: primary and secondary interest index
pub const N_FEATURES: usize = 2;

type Model = RandomForestClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;

/// Encoded interest pair fed to every classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureVector {
    pub primary: LabelIndex<PrimaryInterest>,
    pub secondary: LabelIndex<SecondaryInterest>,
}

impl FeatureVector {
    pub fn new(primary: LabelIndex<PrimaryInterest>, secondary: LabelIndex<SecondaryInterest>) -> Self {
        Self { primary, secondary }
    }

    fn row(&self) -> Vec<f64> {
        vec![self.primary.get() as f64, self.secondary.get() as f64]
    }
}

/// Stateless inference over an immutable trained model
pub trait Classifier<C: Column>: Send + Sync {
    /// Predicted class index for one feature vector
    fn predict(&self, features: &FeatureVector) -> Result<LabelIndex<C>>;

    /// Number of classes the model was trained over
    fn n_classes(&self) -> usize;
}

/// Forest hyperparameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

impl ForestParams {
    fn to_smartcore(&self) -> Result<RandomForestClassifierParameters> {
        let n_trees = u16::try_from(self.n_estimators)
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                Error::Training(format!("n_estimators must be in 1..={}, got {}", u16::MAX, self.n_estimators))
            })?;
        if self.min_samples_split < 2 {
            return Err(Error::Training("min_samples_split must be at least 2".to_string()));
        }

        // Both features are split candidates at every node
        let mut params = RandomForestClassifierParameters::default()
            .with_n_trees(n_trees)
            .with_min_samples_split(self.min_samples_split)
            .with_m(N_FEATURES)
            .with_seed(self.seed);
        if let Some(depth) = self.max_depth {
            let depth = u16::try_from(depth)
                .map_err(|_| Error::Training(format!("max_depth {} is too large", depth)))?;
            params = params.with_max_depth(depth);
        }
        Ok(params)
    }
}

/// Random forest predicting a class of column `C`
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct RandomForest<C: Column> {
    n_classes: usize,
    n_trees: usize,
    model: Model,
    #[serde(skip)]
    _column: PhantomData<C>,
}

impl<C: Column> RandomForest<C> {
    /// Train on encoded rows; `targets[i]` is the class of `features[i]`
    pub fn fit(
        features: &[FeatureVector],
        targets: &[LabelIndex<C>],
        n_classes: usize,
        params: &ForestParams,
    ) -> Result<Self> {
        if features.is_empty() {
            return Err(Error::Training(format!("no training rows for {}", C::NAME)));
        }
        if features.len() != targets.len() {
            return Err(Error::Training(format!(
                "{} feature rows but {} targets for {}",
                features.len(),
                targets.len(),
                C::NAME
            )));
        }
        if let Some(bad) = targets.iter().find(|t| t.get() >= n_classes) {
            return Err(Error::Training(format!(
                "target {} outside {} classes for {}",
                bad.get(),
                n_classes,
                C::NAME
            )));
        }
        let parameters = params.to_smartcore()?;

        let rows: Vec<Vec<f64>> = features.iter().map(FeatureVector::row).collect();
        let x = DenseMatrix::from_2d_vec(&rows);
        let y = targets
            .iter()
            .map(|t| {
                u32::try_from(t.get())
                    .map_err(|_| Error::Training(format!("target {} too large for {}", t.get(), C::NAME)))
            })
            .collect::<Result<Vec<u32>>>()?;

        let model: Model = RandomForestClassifier::fit(&x, &y, parameters)
            .map_err(|e| Error::Training(format!("{}: {}", C::NAME, e)))?;

        Ok(Self {
            n_classes,
            n_trees: params.n_estimators,
            model,
            _column: PhantomData,
        })
    }

    /// Fraction of rows predicted correctly
    pub fn accuracy(&self, features: &[FeatureVector], targets: &[LabelIndex<C>]) -> f64 {
        if features.is_empty() {
            return 0.0;
        }
        let correct = features
            .iter()
            .zip(targets)
            .filter(|(f, t)| self.predict(f).is_ok_and(|p| p == **t))
            .count();
        correct as f64 / features.len() as f64
    }

    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    /// Check that a deserialized model answers within its class range
    pub fn validate(&self) -> Result<()> {
        if self.n_classes == 0 || self.n_trees == 0 {
            return Err(Error::ModelUnavailable(format!("{} model is empty", C::NAME)));
        }
        let origin = FeatureVector::new(LabelIndex::from_raw(0), LabelIndex::from_raw(0));
        match self.predict(&origin) {
            Ok(class) if class.get() < self.n_classes => Ok(()),
            Ok(class) => Err(Error::ModelUnavailable(format!(
                "{} model predicted class {} of {}",
                C::NAME,
                class,
                self.n_classes
            ))),
            Err(e) => Err(Error::ModelUnavailable(format!("{} model: {}", C::NAME, e))),
        }
    }
}

impl<C: Column> Classifier<C> for RandomForest<C> {
    fn predict(&self, features: &FeatureVector) -> Result<LabelIndex<C>> {
        let x = DenseMatrix::from_2d_vec(&vec![features.row()]);
        let predicted = self
            .model
            .predict(&x)
            .map_err(|e| Error::Prediction(format!("{}: {}", C::NAME, e)))?;
        predicted
            .first()
            .map(|class| LabelIndex::from_raw(*class as usize))
            .ok_or_else(|| Error::Prediction(format!("{}: empty prediction", C::NAME)))
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }
}
