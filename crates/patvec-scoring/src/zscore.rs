//! Control-cohort z-score scoring.
//!
//! A cheap alternative to the model-based scorer: each non-control sample's
//! expression is standardized per gene against the control cohort's mean and
//! sample standard deviation.
use ndarray::Array2;

use crate::data::{DesignTable, ExpressionMatrix, ScoreMatrix};
use crate::error::{Result, ScoringError};

/// Score every non-control sample as `(x - mean_ctrl) / sd_ctrl` per gene.
///
/// Output shape and ordering match the differential scorer: one row per
/// non-control sample in column order, one column per gene. Requires at
/// least two control samples; a control gene with zero variance makes the
/// score undefined and is reported as a configuration error naming the gene.
pub fn score_z(
    expression: &ExpressionMatrix,
    design: &DesignTable,
    control: &str,
) -> Result<ScoreMatrix> {
    design.validate_covers(expression)?;

    let mut control_cols = Vec::new();
    let mut test_cols = Vec::new();
    for (col, sample) in expression.samples().iter().enumerate() {
        let target = design
            .target_of(sample)
            .ok_or_else(|| ScoringError::Configuration(format!("no design row for '{}'", sample)))?;
        if target == control {
            control_cols.push(col);
        } else {
            test_cols.push(col);
        }
    }
    if control_cols.is_empty() {
        return Err(ScoringError::Configuration(format!(
            "control label '{}' is not present in the design table's Target column",
            control
        )));
    }
    if control_cols.len() < 2 {
        return Err(ScoringError::Configuration(
            "z-score standardization needs at least two control samples".to_string(),
        ));
    }
    if test_cols.is_empty() {
        return Err(ScoringError::Configuration(
            "design table contains only the control group; at least one other group is required"
                .to_string(),
        ));
    }

    let n_ctrl = control_cols.len() as f64;
    let n_genes = expression.n_genes();
    let mut means = Vec::with_capacity(n_genes);
    let mut sds = Vec::with_capacity(n_genes);
    for (gene_idx, row) in expression.values().rows().into_iter().enumerate() {
        let mean = control_cols.iter().map(|&c| row[c]).sum::<f64>() / n_ctrl;
        let ss: f64 = control_cols.iter().map(|&c| (row[c] - mean).powi(2)).sum();
        let sd = (ss / (n_ctrl - 1.0)).sqrt();
        if sd == 0.0 {
            return Err(ScoringError::Configuration(format!(
                "control cohort has zero variance for gene '{}'",
                expression.genes()[gene_idx]
            )));
        }
        means.push(mean);
        sds.push(sd);
    }

    let mut rows = Vec::with_capacity(test_cols.len() * n_genes);
    let mut row_ids = Vec::with_capacity(test_cols.len());
    for &col in &test_cols {
        let column = expression.sample_column(col);
        for gene_idx in 0..n_genes {
            rows.push((column[gene_idx] - means[gene_idx]) / sds[gene_idx]);
        }
        row_ids.push(expression.samples()[col].clone());
    }

    let values = Array2::from_shape_vec((row_ids.len(), n_genes), rows).map_err(|e| {
        ScoringError::Configuration(format!("could not assemble score matrix: {}", e))
    })?;
    ScoreMatrix::new(row_ids, expression.genes().to_vec(), values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn fixture() -> (ExpressionMatrix, DesignTable) {
        // gene g1: controls 1, 2, 3 (mean 2, sd 1); sample value 4 -> z = 2
        let expression = ExpressionMatrix::new(
            vec!["g1".into()],
            vec!["c1".into(), "c2".into(), "c3".into(), "t1".into()],
            array![[1.0, 2.0, 3.0, 4.0]],
        )
        .unwrap();
        let design = DesignTable::new(vec![
            ("c1".into(), "Control".into()),
            ("c2".into(), "Control".into()),
            ("c3".into(), "Control".into()),
            ("t1".into(), "Tumor".into()),
        ])
        .unwrap();
        (expression, design)
    }

    #[test]
    fn standardizes_against_controls() {
        let (expression, design) = fixture();
        let scores = score_z(&expression, &design, "Control").unwrap();
        assert_eq!(scores.row_ids(), ["t1".to_string()]);
        assert_relative_eq!(scores.values()[(0, 0)], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_variance_control_gene_is_an_error() {
        let expression = ExpressionMatrix::new(
            vec!["g1".into()],
            vec!["c1".into(), "c2".into(), "t1".into()],
            array![[5.0, 5.0, 7.0]],
        )
        .unwrap();
        let design = DesignTable::new(vec![
            ("c1".into(), "Control".into()),
            ("c2".into(), "Control".into()),
            ("t1".into(), "Tumor".into()),
        ])
        .unwrap();
        let err = score_z(&expression, &design, "Control").unwrap_err();
        assert!(err.to_string().contains("g1"));
    }

    #[test]
    fn missing_control_label_is_an_error() {
        let (expression, design) = fixture();
        assert!(score_z(&expression, &design, "Healthy").is_err());
    }
}
