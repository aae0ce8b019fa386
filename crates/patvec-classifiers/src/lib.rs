//! patvec-classifiers: classifier wrappers and cross-validation for patient
//! embedding vectors.
//!
//! Provides lightweight model wrappers (logistic regression, SVM, GBDT)
//! behind a shared [`models::ClassifierModel`] trait, a stratified k-fold
//! cross-validator with a fixed metric set, and JSON/box-plot reporting of
//! the fold results.
pub mod config;
pub mod cv;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod models;
pub mod report;

pub use config::{CvConfig, ModelKind};
pub use cv::{cross_validate, CvReport, StratifiedKFold};
pub use dataset::LabeledDataset;
pub use error::{ClassifierError, Result};
pub use metrics::Metric;
