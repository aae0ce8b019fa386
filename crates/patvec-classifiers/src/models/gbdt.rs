use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use ndarray::Array2;
use serde_json::Value;

use crate::config::ModelKind;
use crate::error::{ClassifierError, Result};
use crate::models::classifier_trait::ClassifierModel;

/// Gradient-boosted decision tree backend (gbdt crate). Trained with the
/// log-likelihood loss on 1/-1 labels; `predict` then yields the positive
/// class probability directly.
pub struct GbdtClassifier {
    model: Option<GBDT>,
    kind: ModelKind,
}

impl GbdtClassifier {
    pub fn new(kind: ModelKind) -> Self {
        GbdtClassifier { model: None, kind }
    }
}

impl ClassifierModel for GbdtClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<()> {
        let ModelKind::Gbdt {
            max_depth,
            num_boost_round,
            learning_rate,
            training_optimization_level,
            loss_type,
        } = &self.kind
        else {
            return Err(ClassifierError::Configuration(format!(
                "expected gbdt parameters, got {}",
                self.kind.name()
            )));
        };

        let mut config = Config::new();
        config.set_feature_size(x.ncols());
        config.set_shrinkage(*learning_rate);
        config.set_max_depth(*max_depth);
        config.set_iterations(*num_boost_round as usize);
        config.set_training_optimization_level(*training_optimization_level);
        config.set_loss(loss_type);

        let mut model = GBDT::new(&config);
        let mut train = DataVec::new();
        for (row, &label) in x.rows().into_iter().zip(y.iter()) {
            let features: Vec<f32> = row.iter().map(|&v| v as f32).collect();
            let target = if label == 1 { 1.0 } else { -1.0 };
            train.push(Data::new_training_data(features, 1.0, target, None));
        }
        model.fit(&mut train);
        self.model = Some(model);
        Ok(())
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<f64>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| ClassifierError::Model("model has not been fitted".to_string()))?;
        let mut test = DataVec::new();
        for row in x.rows() {
            let features: Vec<f32> = row.iter().map(|&v| v as f32).collect();
            test.push(Data::new_test_data(features, None));
        }
        let predictions = model.predict(&test);
        Ok(predictions
            .into_iter()
            .map(|p| (p as f64).clamp(0.0, 1.0))
            .collect())
    }

    fn params_json(&self) -> Value {
        serde_json::to_value(&self.kind).unwrap_or(Value::Null)
    }

    fn name(&self) -> &'static str {
        "gbdt"
    }
}
