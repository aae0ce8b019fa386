//! Multiple-testing correction applied across all genes of one fit.
//!
//! Methods are named after their statsmodels identifiers (`fdr_bh`,
//! `fdr_by`, `bonferroni`, `holm`) so the CLI surface matches the original
//! tooling. All methods return adjusted p-values of the same length and
//! order as the input, capped at 1.0.
use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::{Result, ScoringError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdjustMethod {
    /// Benjamini-Hochberg false discovery rate (the default).
    #[default]
    BenjaminiHochberg,
    /// Benjamini-Yekutieli FDR, valid under arbitrary dependence.
    BenjaminiYekutieli,
    /// Bonferroni family-wise error rate control.
    Bonferroni,
    /// Holm step-down family-wise error rate control.
    Holm,
}

impl AdjustMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustMethod::BenjaminiHochberg => "fdr_bh",
            AdjustMethod::BenjaminiYekutieli => "fdr_by",
            AdjustMethod::Bonferroni => "bonferroni",
            AdjustMethod::Holm => "holm",
        }
    }
}

impl FromStr for AdjustMethod {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fdr_bh" | "bh" => Ok(AdjustMethod::BenjaminiHochberg),
            "fdr_by" | "by" => Ok(AdjustMethod::BenjaminiYekutieli),
            "bonferroni" => Ok(AdjustMethod::Bonferroni),
            "holm" => Ok(AdjustMethod::Holm),
            other => Err(ScoringError::Configuration(format!(
                "unknown adjustment method '{}': expected one of fdr_bh, fdr_by, bonferroni, holm",
                other
            ))),
        }
    }
}

/// Adjust a sequence of raw p-values with the chosen method. Inputs must lie
/// in [0, 1]; the output preserves length and order.
pub fn adjust_p_values(p_values: &[f64], method: AdjustMethod) -> Result<Vec<f64>> {
    if p_values.is_empty() {
        return Err(ScoringError::Configuration(
            "cannot adjust an empty p-value sequence".to_string(),
        ));
    }
    for (i, &p) in p_values.iter().enumerate() {
        if !(0.0..=1.0).contains(&p) {
            return Err(ScoringError::Configuration(format!(
                "invalid p-value {} at index {}",
                p, i
            )));
        }
    }

    let n = p_values.len();
    let adjusted = match method {
        AdjustMethod::Bonferroni => p_values.iter().map(|&p| (p * n as f64).min(1.0)).collect(),
        AdjustMethod::Holm => holm(p_values),
        AdjustMethod::BenjaminiHochberg => step_up_fdr(p_values, 1.0),
        AdjustMethod::BenjaminiYekutieli => {
            let c_n: f64 = (1..=n).map(|i| 1.0 / i as f64).sum();
            step_up_fdr(p_values, c_n)
        }
    };
    Ok(adjusted)
}

/// Shared step-up pass for BH (`scale = 1`) and BY (`scale = c(n)`): sort
/// ascending, walk from the largest p down taking the running minimum of
/// `p * scale * n / rank`.
fn step_up_fdr(p_values: &[f64], scale: f64) -> Vec<f64> {
    let n = p_values.len();
    let mut order = sorted_order(p_values);
    let mut adjusted = vec![0.0; n];
    let mut current_min = 1.0f64;
    while let Some((rank, orig_idx)) = order.pop() {
        let candidate = (p_values[orig_idx] * scale * n as f64 / rank as f64).min(1.0);
        current_min = current_min.min(candidate);
        adjusted[orig_idx] = current_min;
    }
    adjusted
}

/// Holm step-down: sort ascending, walk from the smallest p up taking the
/// running maximum of `p * (n - rank + 1)`.
fn holm(p_values: &[f64]) -> Vec<f64> {
    let n = p_values.len();
    let order = sorted_order(p_values);
    let mut adjusted = vec![0.0; n];
    let mut current_max = 0.0f64;
    for (rank, orig_idx) in order {
        let candidate = (p_values[orig_idx] * (n - rank + 1) as f64).min(1.0);
        current_max = current_max.max(candidate);
        adjusted[orig_idx] = current_max;
    }
    adjusted
}

/// Ascending (rank, original index) pairs; ranks start at 1.
fn sorted_order(p_values: &[f64]) -> Vec<(usize, usize)> {
    let mut indexed: Vec<(usize, f64)> = p_values.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    indexed
        .into_iter()
        .enumerate()
        .map(|(i, (orig_idx, _))| (i + 1, orig_idx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn method_names_round_trip() {
        for method in [
            AdjustMethod::BenjaminiHochberg,
            AdjustMethod::BenjaminiYekutieli,
            AdjustMethod::Bonferroni,
            AdjustMethod::Holm,
        ] {
            assert_eq!(method.as_str().parse::<AdjustMethod>().unwrap(), method);
        }
        assert!("fdr_tsbh".parse::<AdjustMethod>().is_err());
    }

    #[test]
    fn bonferroni_multiplies_and_caps() {
        let adjusted =
            adjust_p_values(&[0.01, 0.04, 0.5], AdjustMethod::Bonferroni).unwrap();
        assert_relative_eq!(adjusted[0], 0.03);
        assert_relative_eq!(adjusted[1], 0.12);
        assert_relative_eq!(adjusted[2], 1.0);
    }

    #[test]
    fn benjamini_hochberg_matches_reference() {
        // R: p.adjust(c(0.01, 0.02, 0.03, 0.04), method = "BH") -> all 0.04
        let adjusted =
            adjust_p_values(&[0.01, 0.02, 0.03, 0.04], AdjustMethod::BenjaminiHochberg).unwrap();
        for value in adjusted {
            assert_relative_eq!(value, 0.04, epsilon = 1e-12);
        }

        // R: p.adjust(c(0.005, 0.02, 0.1, 0.5), method = "BH")
        //    -> 0.02, 0.04, 0.1333..., 0.5
        let adjusted =
            adjust_p_values(&[0.005, 0.02, 0.1, 0.5], AdjustMethod::BenjaminiHochberg).unwrap();
        assert_relative_eq!(adjusted[0], 0.02, epsilon = 1e-12);
        assert_relative_eq!(adjusted[1], 0.04, epsilon = 1e-12);
        assert_relative_eq!(adjusted[2], 0.4 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(adjusted[3], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn holm_matches_reference() {
        // R: p.adjust(c(0.01, 0.02, 0.03), method = "holm") -> 0.03, 0.04, 0.04
        let adjusted = adjust_p_values(&[0.01, 0.02, 0.03], AdjustMethod::Holm).unwrap();
        assert_relative_eq!(adjusted[0], 0.03, epsilon = 1e-12);
        assert_relative_eq!(adjusted[1], 0.04, epsilon = 1e-12);
        assert_relative_eq!(adjusted[2], 0.04, epsilon = 1e-12);
    }

    #[test]
    fn by_is_no_less_conservative_than_bh() {
        let p = [0.004, 0.02, 0.03, 0.2, 0.7];
        let bh = adjust_p_values(&p, AdjustMethod::BenjaminiHochberg).unwrap();
        let by = adjust_p_values(&p, AdjustMethod::BenjaminiYekutieli).unwrap();
        for (a, b) in bh.iter().zip(by.iter()) {
            assert!(b >= a);
        }
    }

    #[test]
    fn order_is_preserved() {
        let p = [0.5, 0.001, 0.2];
        let adjusted = adjust_p_values(&p, AdjustMethod::BenjaminiHochberg).unwrap();
        assert!(adjusted[1] < adjusted[2]);
        assert!(adjusted[2] <= adjusted[0]);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert!(adjust_p_values(&[], AdjustMethod::BenjaminiHochberg).is_err());
        assert!(adjust_p_values(&[1.2], AdjustMethod::BenjaminiHochberg).is_err());
        assert!(adjust_p_values(&[-0.1], AdjustMethod::Bonferroni).is_err());
    }
}
