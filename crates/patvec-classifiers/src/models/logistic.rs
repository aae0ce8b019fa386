use linfa::traits::Fit;
use linfa::Dataset;
use linfa_logistic::{FittedLogisticRegression, LogisticRegression};
use ndarray::{Array1, Array2};
use serde_json::Value;

use crate::config::ModelKind;
use crate::error::{ClassifierError, Result};
use crate::models::classifier_trait::ClassifierModel;

/// Logistic regression backend (linfa-logistic, lbfgs-style gradient fit).
pub struct LogisticRegressionClassifier {
    model: Option<FittedLogisticRegression<f64, usize>>,
    kind: ModelKind,
}

impl LogisticRegressionClassifier {
    pub fn new(kind: ModelKind) -> Self {
        LogisticRegressionClassifier { model: None, kind }
    }
}

impl ClassifierModel for LogisticRegressionClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<()> {
        let ModelKind::LogisticRegression {
            max_iterations,
            gradient_tolerance,
        } = &self.kind
        else {
            return Err(ClassifierError::Configuration(format!(
                "expected logistic_regression parameters, got {}",
                self.kind.name()
            )));
        };

        let dataset = Dataset::new(x.clone(), Array1::from_vec(y.to_vec()));
        let fitted = LogisticRegression::default()
            .max_iterations(*max_iterations)
            .gradient_tolerance(*gradient_tolerance)
            .fit(&dataset)
            .map_err(|e| ClassifierError::Model(e.to_string()))?;
        self.model = Some(fitted);
        Ok(())
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<f64>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| ClassifierError::Model("model has not been fitted".to_string()))?;
        // predict_probabilities reports the probability of the larger class
        // label, which is class code 1 by construction.
        Ok(model.predict_probabilities(x).to_vec())
    }

    fn params_json(&self) -> Value {
        serde_json::to_value(&self.kind).unwrap_or(Value::Null)
    }

    fn name(&self) -> &'static str {
        "logistic_regression"
    }
}
