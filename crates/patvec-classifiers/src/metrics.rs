//! Binary classification metrics over probability scores.
//!
//! Predictions are thresholded at 0.5 for accuracy and F1; ROC-AUC is the
//! rank statistic (Mann-Whitney form) with average ranks for tied scores.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    RocAuc,
    Accuracy,
    F1,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::RocAuc => "roc_auc",
            Metric::Accuracy => "accuracy",
            Metric::F1 => "f1",
        }
    }

    pub fn evaluate(&self, y_true: &[usize], probs: &[f64]) -> f64 {
        match self {
            Metric::RocAuc => roc_auc(y_true, probs),
            Metric::Accuracy => accuracy(y_true, probs),
            Metric::F1 => f1_score(y_true, probs),
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "roc_auc" => Ok(Metric::RocAuc),
            "accuracy" => Ok(Metric::Accuracy),
            "f1" => Ok(Metric::F1),
            other => Err(format!(
                "unknown metric '{}': expected one of roc_auc, accuracy, f1",
                other
            )),
        }
    }
}

/// Fraction of samples whose thresholded prediction matches the label.
pub fn accuracy(y_true: &[usize], probs: &[f64]) -> f64 {
    assert_eq!(y_true.len(), probs.len(), "labels and scores must have equal lengths");
    if y_true.is_empty() {
        return f64::NAN;
    }
    let correct = y_true
        .iter()
        .zip(probs.iter())
        .filter(|(&y, &p)| (p >= 0.5) == (y == 1))
        .count();
    correct as f64 / y_true.len() as f64
}

/// F1 score of the positive class with predictions thresholded at 0.5.
/// Returns 0 when precision and recall are both undefined or zero.
pub fn f1_score(y_true: &[usize], probs: &[f64]) -> f64 {
    assert_eq!(y_true.len(), probs.len(), "labels and scores must have equal lengths");
    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut fn_ = 0usize;
    for (&y, &p) in y_true.iter().zip(probs.iter()) {
        let predicted = p >= 0.5;
        match (predicted, y == 1) {
            (true, true) => tp += 1,
            (true, false) => fp += 1,
            (false, true) => fn_ += 1,
            (false, false) => {}
        }
    }
    if tp == 0 {
        return 0.0;
    }
    let precision = tp as f64 / (tp + fp) as f64;
    let recall = tp as f64 / (tp + fn_) as f64;
    2.0 * precision * recall / (precision + recall)
}

/// Area under the ROC curve via the rank statistic. Tied scores share their
/// average rank. Returns NaN when either class is absent.
pub fn roc_auc(y_true: &[usize], probs: &[f64]) -> f64 {
    assert_eq!(y_true.len(), probs.len(), "labels and scores must have equal lengths");
    let n = y_true.len();
    let n_pos = y_true.iter().filter(|&&y| y == 1).count();
    let n_neg = n - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return f64::NAN;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        probs[a]
            .partial_cmp(&probs[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Average ranks within tied groups (1-based).
    let mut ranks = vec![0.0f64; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && probs[order[j + 1]] == probs[order[i]] {
            j += 1;
        }
        let average = (i + j + 2) as f64 / 2.0;
        for k in i..=j {
            ranks[order[k]] = average;
        }
        i = j + 1;
    }

    let positive_rank_sum: f64 = y_true
        .iter()
        .zip(ranks.iter())
        .filter(|(&y, _)| y == 1)
        .map(|(_, &r)| r)
        .sum();
    let n_pos = n_pos as f64;
    let n_neg = n_neg as f64;
    (positive_rank_sum - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn accuracy_counts_thresholded_matches() {
        let y = [1, 0, 1, 0];
        let p = [0.9, 0.2, 0.4, 0.6];
        assert_relative_eq!(accuracy(&y, &p), 0.5);
    }

    #[test]
    fn f1_matches_hand_computation() {
        // tp = 2, fp = 1, fn = 1 -> precision 2/3, recall 2/3, f1 = 2/3
        let y = [1, 1, 1, 0, 0];
        let p = [0.9, 0.8, 0.1, 0.7, 0.2];
        assert_relative_eq!(f1_score(&y, &p), 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn f1_is_zero_without_true_positives() {
        let y = [1, 1, 0];
        let p = [0.1, 0.2, 0.9];
        assert_relative_eq!(f1_score(&y, &p), 0.0);
    }

    #[test]
    fn auc_is_one_for_perfect_separation() {
        let y = [0, 0, 1, 1];
        let p = [0.1, 0.2, 0.8, 0.9];
        assert_relative_eq!(roc_auc(&y, &p), 1.0);
    }

    #[test]
    fn auc_is_zero_for_inverted_scores() {
        let y = [1, 1, 0, 0];
        let p = [0.1, 0.2, 0.8, 0.9];
        assert_relative_eq!(roc_auc(&y, &p), 0.0);
    }

    #[test]
    fn auc_handles_ties_with_average_ranks() {
        // One positive and one negative share the score 0.5: the tie
        // contributes half a concordant pair. AUC = (1*1 + 0.5*1) / (2*2)...
        // hand-computed: pairs (p=0.9 vs n=0.1) = 1, (0.9 vs 0.5) = 1,
        // (0.5 vs 0.1) = 1, (0.5 vs 0.5) = 0.5 -> 3.5 / 4
        let y = [1, 1, 0, 0];
        let p = [0.9, 0.5, 0.5, 0.1];
        assert_relative_eq!(roc_auc(&y, &p), 3.5 / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn auc_is_nan_for_a_single_class() {
        let y = [1, 1];
        let p = [0.4, 0.6];
        assert!(roc_auc(&y, &p).is_nan());
    }

    #[test]
    fn metric_names_round_trip() {
        for metric in [Metric::RocAuc, Metric::Accuracy, Metric::F1] {
            assert_eq!(metric.as_str().parse::<Metric>().unwrap(), metric);
        }
        assert!("jaccard".parse::<Metric>().is_err());
    }
}
