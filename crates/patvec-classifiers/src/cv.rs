//! Stratified k-fold cross-validation over a labeled dataset.
use std::collections::BTreeMap;
use std::time::Instant;

use ndarray::Axis;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use serde_json::Value;

use crate::config::CvConfig;
use crate::dataset::LabeledDataset;
use crate::error::{ClassifierError, Result};
use crate::models::build_model;

/// One train/test split; indices refer to dataset rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Label-stratified shuffled fold assignment. Each class's samples are
/// shuffled and dealt round-robin across folds, so every fold keeps the
/// overall class balance.
#[derive(Debug, Clone)]
pub struct StratifiedKFold {
    pub n_splits: usize,
    pub seed: Option<u64>,
}

impl StratifiedKFold {
    pub fn new(n_splits: usize) -> Self {
        StratifiedKFold {
            n_splits,
            seed: None,
        }
    }

    pub fn with_seed(n_splits: usize, seed: u64) -> Self {
        StratifiedKFold {
            n_splits,
            seed: Some(seed),
        }
    }

    pub fn split(&self, y: &[usize]) -> Result<Vec<Fold>> {
        if self.n_splits < 2 {
            return Err(ClassifierError::Configuration(format!(
                "cross-validation needs at least 2 folds, got {}",
                self.n_splits
            )));
        }

        let n_classes = y.iter().copied().max().map_or(0, |m| m + 1);
        let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); n_classes];
        for (idx, &code) in y.iter().enumerate() {
            by_class[code].push(idx);
        }
        for (code, members) in by_class.iter().enumerate() {
            if members.len() < self.n_splits {
                return Err(ClassifierError::Configuration(format!(
                    "class {} has {} samples, fewer than {} folds",
                    code,
                    members.len(),
                    self.n_splits
                )));
            }
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut test_sets: Vec<Vec<usize>> = vec![Vec::new(); self.n_splits];
        for members in &mut by_class {
            members.shuffle(&mut rng);
            for (i, &idx) in members.iter().enumerate() {
                test_sets[i % self.n_splits].push(idx);
            }
        }

        let mut folds = Vec::with_capacity(self.n_splits);
        for test in &mut test_sets {
            test.sort_unstable();
            let train = (0..y.len()).filter(|i| !test.contains(i)).collect();
            folds.push(Fold {
                train,
                test: std::mem::take(test),
            });
        }
        Ok(folds)
    }
}

/// Per-run cross-validation results: one score vector per metric
/// (`test_<metric>` keys), fold fit times, and the hyper-parameters of
/// every fold's estimator.
#[derive(Debug, Serialize)]
pub struct CvReport {
    pub model: String,
    pub folds: usize,
    pub fit_time: Vec<f64>,
    pub scores: BTreeMap<String, Vec<f64>>,
    pub estimator_params: Vec<Value>,
}

/// Run stratified cross-validation of the configured model over the
/// dataset. Every fold trains a fresh model; any fit or predict failure
/// aborts the whole run.
pub fn cross_validate(dataset: &LabeledDataset, config: &CvConfig) -> Result<CvReport> {
    let splitter = StratifiedKFold {
        n_splits: config.folds,
        seed: config.seed,
    };
    let folds = splitter.split(&dataset.y)?;

    let mut fit_time = Vec::with_capacity(folds.len());
    let mut scores: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut estimator_params = Vec::with_capacity(folds.len());

    for (fold_idx, fold) in folds.iter().enumerate() {
        let x_train = dataset.x.select(Axis(0), &fold.train);
        let y_train: Vec<usize> = fold.train.iter().map(|&i| dataset.y[i]).collect();
        let x_test = dataset.x.select(Axis(0), &fold.test);
        let y_test: Vec<usize> = fold.test.iter().map(|&i| dataset.y[i]).collect();

        let mut model = build_model(&config.model);
        let started = Instant::now();
        model.fit(&x_train, &y_train)?;
        fit_time.push(started.elapsed().as_secs_f64());

        let probs = model.predict_proba(&x_test)?;
        for metric in &config.metrics {
            let value = metric.evaluate(&y_test, &probs);
            scores
                .entry(format!("test_{}", metric.as_str()))
                .or_default()
                .push(value);
        }
        estimator_params.push(model.params_json());

        log::debug!(
            "fold {}/{}: {} train, {} test",
            fold_idx + 1,
            folds.len(),
            fold.train.len(),
            fold.test.len()
        );
    }

    Ok(CvReport {
        model: config.model.name().to_string(),
        folds: config.folds,
        fit_time,
        scores,
        estimator_params,
    })
}
