use crate::config::ModelKind;
use crate::models::classifier_trait::ClassifierModel;

/// Build a boxed classifier from a model configuration.
pub fn build_model(kind: &ModelKind) -> Box<dyn ClassifierModel> {
    match kind {
        ModelKind::LogisticRegression { .. } => Box::new(
            crate::models::logistic::LogisticRegressionClassifier::new(kind.clone()),
        ),
        ModelKind::Svm { .. } => Box::new(crate::models::svm::SvmClassifier::new(kind.clone())),
        ModelKind::Gbdt { .. } => Box::new(crate::models::gbdt::GbdtClassifier::new(kind.clone())),
    }
}
