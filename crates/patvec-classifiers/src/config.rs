//! Model and cross-validation configuration.
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};
use crate::metrics::Metric;

/// Supported model families and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub enum ModelKind {
    #[serde(rename = "logistic_regression")]
    LogisticRegression {
        max_iterations: u64,
        gradient_tolerance: f64,
    },
    #[serde(rename = "svm")]
    Svm {
        eps: f64,
        c: (f64, f64),
        kernel: String,
        gaussian_kernel_eps: f64,
        polynomial_kernel_constant: f64,
        polynomial_kernel_degree: f64,
    },
    #[serde(rename = "gbdt")]
    Gbdt {
        max_depth: u32,
        num_boost_round: u32,
        learning_rate: f32,
        training_optimization_level: u8,
        loss_type: String,
    },
}

impl ModelKind {
    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::LogisticRegression { .. } => "logistic_regression",
            ModelKind::Svm { .. } => "svm",
            ModelKind::Gbdt { .. } => "gbdt",
        }
    }
}

impl Default for ModelKind {
    fn default() -> Self {
        ModelKind::LogisticRegression {
            max_iterations: 500,
            gradient_tolerance: 1e-4,
        }
    }
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "logistic_regression" => Ok(ModelKind::default()),
            "svm" => Ok(ModelKind::Svm {
                eps: 1e-7,
                c: (1.0, 1.0),
                kernel: "linear".to_string(),
                gaussian_kernel_eps: 0.1,
                polynomial_kernel_constant: 1.0,
                polynomial_kernel_degree: 3.0,
            }),
            "gbdt" => Ok(ModelKind::Gbdt {
                max_depth: 6,
                num_boost_round: 50,
                learning_rate: 0.1,
                training_optimization_level: 2,
                loss_type: "LogLikelyhood".to_string(),
            }),
            other => Err(format!(
                "unknown model kind '{}': expected one of logistic_regression, svm, gbdt",
                other
            )),
        }
    }
}

/// Full configuration for one cross-validation run, loadable from JSON with
/// clap overrides applied on top.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct CvConfig {
    pub model: ModelKind,
    pub folds: usize,
    pub metrics: Vec<Metric>,
    /// Shuffle seed for the fold split; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for CvConfig {
    fn default() -> Self {
        CvConfig {
            model: ModelKind::default(),
            folds: 10,
            metrics: vec![Metric::RocAuc, Metric::Accuracy, Metric::F1],
            seed: None,
        }
    }
}

/// Load a cross-validation configuration from a JSON file.
pub fn load_cv_config<P: AsRef<std::path::Path>>(path: P) -> Result<CvConfig> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|err| {
        ClassifierError::Io(std::io::Error::new(
            err.kind(),
            format!("{}: {}", path.as_ref().display(), err),
        ))
    })?;
    let config: CvConfig = serde_json::from_str(&content)?;
    if config.folds < 2 {
        return Err(ClassifierError::Configuration(format!(
            "cross-validation needs at least 2 folds, got {}",
            config.folds
        )));
    }
    if config.metrics.is_empty() {
        return Err(ClassifierError::Configuration(
            "at least one scoring metric is required".to_string(),
        ));
    }
    Ok(config)
}
