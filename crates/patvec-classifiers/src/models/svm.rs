use linfa::dataset::Pr;
use linfa::traits::Predict;
use linfa::Dataset;
use linfa_svm::{Svm, SvmParams};
use ndarray::{Array1, Array2};
use serde_json::Value;

use crate::config::ModelKind;
use crate::error::{ClassifierError, Result};
use crate::models::classifier_trait::ClassifierModel;

/// Support vector machine backend (linfa-svm) with Platt-scaled
/// probability outputs.
pub struct SvmClassifier {
    model: Option<Svm<f64, Pr>>,
    kind: ModelKind,
}

impl SvmClassifier {
    pub fn new(kind: ModelKind) -> Self {
        SvmClassifier { model: None, kind }
    }
}

impl ClassifierModel for SvmClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<()> {
        let ModelKind::Svm {
            eps,
            c,
            kernel,
            gaussian_kernel_eps,
            polynomial_kernel_constant,
            polynomial_kernel_degree,
        } = &self.kind
        else {
            return Err(ClassifierError::Configuration(format!(
                "expected svm parameters, got {}",
                self.kind.name()
            )));
        };

        let targets: Array1<bool> = y.iter().map(|&label| label == 1).collect();
        let dataset = Dataset::new(x.clone(), targets);

        let (c_pos, c_neg) = *c;
        let mut params: SvmParams<f64, Pr> = Svm::<f64, Pr>::params()
            .eps(*eps)
            .pos_neg_weights(c_pos, c_neg);
        params = match kernel.as_str() {
            "linear" => params.linear_kernel(),
            "gauss" => params.gaussian_kernel(*gaussian_kernel_eps),
            "poly" => params.polynomial_kernel(
                *polynomial_kernel_constant,
                *polynomial_kernel_degree,
            ),
            other => {
                return Err(ClassifierError::Configuration(format!(
                    "unsupported kernel '{}': valid options are linear, gauss, poly",
                    other
                )))
            }
        };

        let fitted = <SvmParams<f64, Pr> as linfa::traits::Fit<_, _, _>>::fit(&params, &dataset)
            .map_err(|e| ClassifierError::Model(e.to_string()))?;
        self.model = Some(fitted);
        Ok(())
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<f64>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| ClassifierError::Model("model has not been fitted".to_string()))?;
        let probabilities: Array1<Pr> = model.predict(x);
        Ok(probabilities.iter().map(|p| **p as f64).collect())
    }

    fn params_json(&self) -> Value {
        serde_json::to_value(&self.kind).unwrap_or(Value::Null)
    }

    fn name(&self) -> &'static str {
        "svm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::str::FromStr;

    #[test]
    fn linear_kernel_separates_shifted_clusters() {
        let x = array![
            [2.0, 2.1],
            [1.9, 2.0],
            [2.2, 1.8],
            [2.1, 2.2],
            [-2.0, -1.9],
            [-2.1, -2.0],
            [-1.8, -2.2],
            [-2.2, -2.1],
        ];
        let y = vec![1, 1, 1, 1, 0, 0, 0, 0];

        let mut model = SvmClassifier::new(ModelKind::from_str("svm").unwrap());
        model.fit(&x, &y).unwrap();
        let probs = model.predict_proba(&x).unwrap();

        assert_eq!(probs.len(), 8);
        for &p in &probs {
            assert!((0.0..=1.0).contains(&p));
        }
        // Positive cluster must score above the negative cluster on average.
        let pos_mean: f64 = probs[..4].iter().sum::<f64>() / 4.0;
        let neg_mean: f64 = probs[4..].iter().sum::<f64>() / 4.0;
        assert!(pos_mean > neg_mean);
    }

    #[test]
    fn unsupported_kernel_is_a_configuration_error() {
        let kind = ModelKind::Svm {
            eps: 1e-7,
            c: (1.0, 1.0),
            kernel: "sigmoid".to_string(),
            gaussian_kernel_eps: 0.1,
            polynomial_kernel_constant: 1.0,
            polynomial_kernel_degree: 3.0,
        };
        let mut model = SvmClassifier::new(kind);
        let result = model.fit(&array![[0.0, 1.0], [1.0, 0.0]], &[0, 1]);
        assert!(matches!(result, Err(ClassifierError::Configuration(_))));
    }
}
