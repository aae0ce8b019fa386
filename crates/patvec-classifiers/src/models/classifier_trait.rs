use ndarray::Array2;
use serde_json::Value;

use crate::error::Result;

/// Contract shared by all classifier backends used by the cross-validator.
/// `y` uses class codes (1 for the positive class, 0 otherwise); rows of
/// `x` are samples.
pub trait ClassifierModel {
    /// Fit the model on the given training split.
    fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<()>;

    /// Probability of the positive class for each row, in [0, 1].
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<f64>>;

    /// Hyper-parameters as JSON, recorded per fold in the report.
    fn params_json(&self) -> Value;

    /// Human readable model family name.
    fn name(&self) -> &'static str;
}
