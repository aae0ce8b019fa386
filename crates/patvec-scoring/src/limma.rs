//! The single-sample differential scorer.
//!
//! Every non-control sample is compared against the full control cohort,
//! one linear-model fit per sample: the cohort plus that sample form a
//! temporary two-group dataset, the contrast engine reports per-gene effect
//! sizes and raw p-values, the p-values are adjusted across genes, and
//! effects that fail either the significance or the magnitude threshold are
//! zeroed before the sample's row is stored.
use ndarray::Array2;

use crate::correction::{adjust_p_values, AdjustMethod};
use crate::data::{DesignTable, ExpressionMatrix, ScoreMatrix};
use crate::engine::{Contrast, ContrastEngine, ContrastRequest};
use crate::error::{Result, ScoringError};

/// Minimum absolute effect size (logFC scale) a gene must reach to keep its
/// score. Applied unconditionally, closed boundary: exactly 1.3 passes.
pub const LOG_FC_FLOOR: f64 = 1.3;

/// Caller-facing knobs of the scorer. The magnitude floor is fixed on
/// purpose and not part of this struct.
#[derive(Debug, Clone)]
pub struct ScoreOptions {
    /// Significance level applied to adjusted p-values. Closed boundary:
    /// an adjusted p equal to `alpha` passes.
    pub alpha: f64,
    /// Multiple-testing correction applied per sample across all genes.
    pub adjust: AdjustMethod,
    /// Group label of the control cohort.
    pub control: String,
}

impl Default for ScoreOptions {
    fn default() -> Self {
        ScoreOptions {
            alpha: 0.05,
            adjust: AdjustMethod::BenjaminiHochberg,
            control: "Control".to_string(),
        }
    }
}

/// Score every non-control sample against the control cohort.
///
/// The output has one row per non-control sample, in the expression
/// matrix's column order, and one column per gene. Each cell is either the
/// raw effect size (adjusted p within `alpha` and |logFC| at least
/// [`LOG_FC_FLOOR`]) or exactly zero.
///
/// Fails with a configuration error before any engine call when the design
/// does not cover the expression columns, `alpha` is out of (0, 1], the
/// control label is absent, or no non-control sample exists. Any engine
/// failure aborts the whole operation; there is no partial result.
pub fn score_single_sample(
    expression: &ExpressionMatrix,
    design: &DesignTable,
    options: &ScoreOptions,
    engine: &dyn ContrastEngine,
) -> Result<ScoreMatrix> {
    if !(options.alpha > 0.0 && options.alpha <= 1.0) {
        return Err(ScoringError::Configuration(format!(
            "significance level {} is outside (0, 1]",
            options.alpha
        )));
    }
    design.validate_covers(expression)?;

    let mut control_cols = Vec::new();
    let mut test_cols = Vec::new();
    for (col, sample) in expression.samples().iter().enumerate() {
        // validate_covers guarantees a design row for every column.
        let target = design
            .target_of(sample)
            .ok_or_else(|| ScoringError::Configuration(format!("no design row for '{}'", sample)))?;
        if target == options.control {
            control_cols.push(col);
        } else {
            test_cols.push(col);
        }
    }
    if control_cols.is_empty() {
        return Err(ScoringError::Configuration(format!(
            "control label '{}' is not present in the design table's Target column",
            options.control
        )));
    }
    if test_cols.is_empty() {
        return Err(ScoringError::Configuration(
            "design table contains only the control group; at least one other group is required"
                .to_string(),
        ));
    }

    let n_genes = expression.n_genes();
    let mut rows = Vec::with_capacity(test_cols.len() * n_genes);
    let mut row_ids = Vec::with_capacity(test_cols.len());

    for &col in &test_cols {
        let sample = &expression.samples()[col];
        let target = design
            .target_of(sample)
            .ok_or_else(|| ScoringError::Configuration(format!("no design row for '{}'", sample)))?;

        // Temporary dataset: the full control cohort plus this one sample.
        let mut selected = control_cols.clone();
        selected.push(col);
        let mut groups = vec![options.control.clone(); control_cols.len()];
        groups.push(target.to_string());
        let values = expression.select_samples(&selected);
        let contrast = Contrast::new(target, options.control.as_str());

        let effects = engine.fit_contrast(&ContrastRequest {
            genes: expression.genes(),
            values: &values,
            groups: &groups,
            contrast: &contrast,
        })?;
        if effects.len() != n_genes {
            return Err(ScoringError::Engine(
                crate::engine::EngineError::InvalidRequest(format!(
                    "engine returned {} effects for {} genes",
                    effects.len(),
                    n_genes
                )),
            ));
        }

        let raw_p: Vec<f64> = effects.iter().map(|e| e.p_value).collect();
        let adjusted = adjust_p_values(&raw_p, options.adjust)?;

        log::debug!(
            "sample '{}': {} of {} genes significant at alpha {}",
            sample,
            adjusted.iter().filter(|&&p| p <= options.alpha).count(),
            n_genes,
            options.alpha
        );

        for (effect, adj_p) in effects.iter().zip(adjusted.iter()) {
            let keep = *adj_p <= options.alpha && effect.log_fc.abs() >= LOG_FC_FLOOR;
            rows.push(if keep { effect.log_fc } else { 0.0 });
        }
        row_ids.push(sample.clone());
    }

    let values = Array2::from_shape_vec((row_ids.len(), n_genes), rows).map_err(|e| {
        ScoringError::Configuration(format!("could not assemble score matrix: {}", e))
    })?;
    ScoreMatrix::new(row_ids, expression.genes().to_vec(), values)
}
