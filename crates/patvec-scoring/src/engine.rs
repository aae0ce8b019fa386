//! The group-contrast boundary: a pluggable engine that fits a two-group
//! model over an expression dataset and reports a per-gene effect size and
//! raw p-value for one named contrast.
//!
//! The scorer only ever talks to [`ContrastEngine`]; the built-in
//! [`LinearModelEngine`] fits the zero-intercept two-group linear model
//! (group means) and tests the contrast with a pooled-variance t-statistic.
use std::error::Error;
use std::fmt;

use ndarray::Array2;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// An explicit pairwise comparison between two group labels. The effect size
/// is always `test - reference`, so direction never depends on label
/// iteration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contrast {
    pub test: String,
    pub reference: String,
}

impl Contrast {
    pub fn new(test: impl Into<String>, reference: impl Into<String>) -> Self {
        Contrast {
            test: test.into(),
            reference: reference.into(),
        }
    }
}

/// One fit request: a genes-by-samples value block, the group label of each
/// sample column, and the contrast to test.
#[derive(Debug)]
pub struct ContrastRequest<'a> {
    pub genes: &'a [String],
    pub values: &'a Array2<f64>,
    pub groups: &'a [String],
    pub contrast: &'a Contrast,
}

/// Per-gene result of a contrast fit: raw effect size (logFC scale) and raw
/// p-value, in the request's gene order.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneEffect {
    pub log_fc: f64,
    pub p_value: f64,
}

/// Failures of the delegated model fit.
#[derive(Debug)]
pub enum EngineError {
    /// A contrast group label has no matching sample column.
    UnknownGroup(String),
    /// The design leaves no residual degrees of freedom (e.g. two singleton
    /// groups), so the contrast cannot be tested.
    DegenerateDesign(String),
    /// The request is internally inconsistent (shape/label mismatch).
    InvalidRequest(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::UnknownGroup(label) => {
                write!(f, "no sample carries group label '{}'", label)
            }
            EngineError::DegenerateDesign(msg) => write!(f, "degenerate design: {}", msg),
            EngineError::InvalidRequest(msg) => write!(f, "invalid request: {}", msg),
        }
    }
}

impl Error for EngineError {}

/// A statistics backend that fits a grouped linear model and tests one
/// contrast. Implementations must return exactly one [`GeneEffect`] per
/// request gene, in request order, with no ceiling on the gene count.
pub trait ContrastEngine {
    fn fit_contrast(&self, request: &ContrastRequest<'_>) -> Result<Vec<GeneEffect>, EngineError>;
}

/// Built-in backend: ordinary least squares on the zero-intercept two-group
/// design. With categorical groups this reduces to the group means; the
/// contrast is tested per gene with a pooled-residual-variance t-statistic
/// on `n - 2` degrees of freedom.
#[derive(Debug, Default)]
pub struct LinearModelEngine;

impl LinearModelEngine {
    pub fn new() -> Self {
        LinearModelEngine
    }
}

impl ContrastEngine for LinearModelEngine {
    fn fit_contrast(&self, request: &ContrastRequest<'_>) -> Result<Vec<GeneEffect>, EngineError> {
        let values = request.values;
        if request.groups.len() != values.ncols() {
            return Err(EngineError::InvalidRequest(format!(
                "{} group labels for {} sample columns",
                request.groups.len(),
                values.ncols()
            )));
        }
        if request.genes.len() != values.nrows() {
            return Err(EngineError::InvalidRequest(format!(
                "{} gene ids for {} value rows",
                request.genes.len(),
                values.nrows()
            )));
        }

        let contrast = request.contrast;
        let test_cols = columns_of(request.groups, &contrast.test);
        let ref_cols = columns_of(request.groups, &contrast.reference);
        if test_cols.is_empty() {
            return Err(EngineError::UnknownGroup(contrast.test.clone()));
        }
        if ref_cols.is_empty() {
            return Err(EngineError::UnknownGroup(contrast.reference.clone()));
        }

        let n_test = test_cols.len() as f64;
        let n_ref = ref_cols.len() as f64;
        let df = n_test + n_ref - 2.0;
        if df < 1.0 {
            return Err(EngineError::DegenerateDesign(format!(
                "{} + {} samples leave no residual degrees of freedom",
                test_cols.len(),
                ref_cols.len()
            )));
        }
        // Standard t distribution; the scale enters through the standard error.
        let t_dist = StudentsT::new(0.0, 1.0, df)
            .map_err(|e| EngineError::InvalidRequest(e.to_string()))?;
        let se_factor = (1.0 / n_test + 1.0 / n_ref).sqrt();

        let mut effects = Vec::with_capacity(values.nrows());
        for row in values.rows() {
            let mean_test = test_cols.iter().map(|&c| row[c]).sum::<f64>() / n_test;
            let mean_ref = ref_cols.iter().map(|&c| row[c]).sum::<f64>() / n_ref;
            let log_fc = mean_test - mean_ref;

            let rss: f64 = test_cols
                .iter()
                .map(|&c| (row[c] - mean_test).powi(2))
                .chain(ref_cols.iter().map(|&c| (row[c] - mean_ref).powi(2)))
                .sum();
            let se = (rss / df).sqrt() * se_factor;

            let p_value = if se > 0.0 {
                let t = log_fc / se;
                2.0 * (1.0 - t_dist.cdf(t.abs()))
            } else if log_fc == 0.0 {
                // Perfectly flat gene: no evidence either way.
                1.0
            } else {
                // Zero residual variance with a nonzero shift.
                0.0
            };

            effects.push(GeneEffect { log_fc, p_value });
        }

        Ok(effects)
    }
}

fn columns_of(groups: &[String], label: &str) -> Vec<usize> {
    groups
        .iter()
        .enumerate()
        .filter(|(_, g)| g.as_str() == label)
        .map(|(i, _)| i)
        .collect()
}
