//! # Pathwise Common Library
//!
//! Shared code for the Pathwise recommender:
//! - Interest compatibility table
//! - Categorical label encoding with per-column typed indices
//! - Random forest classifiers and their on-disk artifacts
//! - Offline training job over the study-path CSV dataset
//! - Recommendation service (validate → encode → classify → decode)
//! - Configuration loading and user account storage

pub mod artifacts;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod dataset;
pub mod encoder;
pub mod error;
pub mod forest;
pub mod interests;
pub mod service;
pub mod training;

pub use artifacts::ModelBundle;
pub use encoder::{LabelIndex, Vocabulary};
pub use error::{Error, Result};
pub use forest::{Classifier, FeatureVector, RandomForest};
pub use interests::CompatibilityTable;
pub use service::{Recommendation, RecommendationService};
