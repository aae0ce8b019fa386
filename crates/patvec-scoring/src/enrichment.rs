//! Single-sample gene-set enrichment scoring.
//!
//! Implements the weighted running-sum statistic of single-sample GSEA: per
//! sample, genes are ranked by expression, and each gene set's score is the
//! integrated difference between the weighted in-set and uniform out-of-set
//! cumulative distributions.
use std::collections::{HashMap, HashSet};

use ndarray::Array2;

use crate::data::{ExpressionMatrix, ScoreMatrix};
use crate::error::{Result, ScoringError};

/// A named gene set parsed from a `.gmt` file.
#[derive(Debug, Clone)]
pub struct GeneSet {
    pub name: String,
    pub description: String,
    pub genes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SsgseaOptions {
    /// Exponent applied to rank values when weighting in-set increments.
    /// 0.25 is the conventional single-sample GSEA default.
    pub weight: f64,
    /// Gene sets with fewer matrix genes than this are skipped.
    pub min_size: usize,
}

impl Default for SsgseaOptions {
    fn default() -> Self {
        SsgseaOptions {
            weight: 0.25,
            min_size: 2,
        }
    }
}

/// Score every sample against every usable gene set.
///
/// Output rows are sample identifiers (matrix column order), columns are
/// gene-set names. Sets whose overlap with the matrix genes is below
/// `min_size` are skipped with a warning; if none survive, the call fails.
pub fn score_gene_sets(
    expression: &ExpressionMatrix,
    gene_sets: &[GeneSet],
    options: &SsgseaOptions,
) -> Result<ScoreMatrix> {
    if gene_sets.is_empty() {
        return Err(ScoringError::Configuration(
            "no gene sets supplied".to_string(),
        ));
    }

    let gene_index: HashMap<&str, usize> = expression
        .genes()
        .iter()
        .enumerate()
        .map(|(i, g)| (g.as_str(), i))
        .collect();

    // Resolve each set to row indices once, dropping undersized sets.
    let mut usable: Vec<(&GeneSet, HashSet<usize>)> = Vec::new();
    for set in gene_sets {
        let members: HashSet<usize> = set
            .genes
            .iter()
            .filter_map(|g| gene_index.get(g.as_str()).copied())
            .collect();
        if members.len() < options.min_size {
            log::warn!(
                "skipping gene set '{}': {} of {} members present (min {})",
                set.name,
                members.len(),
                set.genes.len(),
                options.min_size
            );
            continue;
        }
        if members.len() == expression.n_genes() {
            log::warn!(
                "skipping gene set '{}': covers every gene, no background remains",
                set.name
            );
            continue;
        }
        usable.push((set, members));
    }
    if usable.is_empty() {
        return Err(ScoringError::Configuration(
            "no gene set passed the minimum-size filter".to_string(),
        ));
    }

    let n_genes = expression.n_genes();
    let n_samples = expression.n_samples();
    let mut values = Array2::zeros((n_samples, usable.len()));

    for sample_idx in 0..n_samples {
        let column = expression.sample_column(sample_idx);
        // Descending expression order; position 0 is the top-ranked gene.
        let mut order: Vec<usize> = (0..n_genes).collect();
        order.sort_by(|&a, &b| {
            column[b]
                .partial_cmp(&column[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for (set_idx, (_, members)) in usable.iter().enumerate() {
            values[(sample_idx, set_idx)] =
                running_sum_statistic(&order, members, n_genes, options.weight);
        }
    }

    let row_ids = expression.samples().to_vec();
    let column_ids = usable.iter().map(|(set, _)| set.name.clone()).collect();
    ScoreMatrix::new(row_ids, column_ids, values)
}

/// Integrated running-sum difference for one set in one ranked sample.
/// Rank values decrease from `n` (top) to 1; in-set steps are weighted by
/// `rank^weight`, out-of-set steps are uniform.
fn running_sum_statistic(
    order: &[usize],
    members: &HashSet<usize>,
    n_genes: usize,
    weight: f64,
) -> f64 {
    let in_total: f64 = order
        .iter()
        .enumerate()
        .filter(|(_, gene)| members.contains(gene))
        .map(|(pos, _)| ((n_genes - pos) as f64).powf(weight))
        .sum();
    let out_count = (n_genes - members.len()) as f64;

    let mut cum_in = 0.0;
    let mut cum_out = 0.0;
    let mut statistic = 0.0;
    for (pos, gene) in order.iter().enumerate() {
        if members.contains(gene) {
            cum_in += ((n_genes - pos) as f64).powf(weight) / in_total;
        } else {
            cum_out += 1.0 / out_count;
        }
        statistic += cum_in - cum_out;
    }
    statistic / n_genes as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn expression_fixture() -> ExpressionMatrix {
        // s1 ranks: g1 > g2 > g3 > g4; s2 reversed.
        ExpressionMatrix::new(
            vec!["g1".into(), "g2".into(), "g3".into(), "g4".into()],
            vec!["s1".into(), "s2".into()],
            array![[4.0, 1.0], [3.0, 2.0], [2.0, 3.0], [1.0, 4.0]],
        )
        .unwrap()
    }

    fn set(name: &str, genes: &[&str]) -> GeneSet {
        GeneSet {
            name: name.to_string(),
            description: String::new(),
            genes: genes.iter().map(|g| g.to_string()).collect(),
        }
    }

    #[test]
    fn top_ranked_set_scores_positive_bottom_negative() {
        let expression = expression_fixture();
        let sets = vec![set("top", &["g1", "g2"])];
        let scores =
            score_gene_sets(&expression, &sets, &SsgseaOptions::default()).unwrap();

        // The set sits at the top of s1's ranking and the bottom of s2's.
        assert!(scores.values()[(0, 0)] > 0.0);
        assert!(scores.values()[(1, 0)] < 0.0);
    }

    #[test]
    fn undersized_sets_are_skipped() {
        let expression = expression_fixture();
        let sets = vec![set("tiny", &["g1"]), set("ok", &["g2", "g3"])];
        let scores =
            score_gene_sets(&expression, &sets, &SsgseaOptions::default()).unwrap();
        assert_eq!(scores.column_ids(), ["ok".to_string()]);
    }

    #[test]
    fn all_sets_skipped_is_an_error() {
        let expression = expression_fixture();
        let sets = vec![set("absent", &["x1", "x2"])];
        let result = score_gene_sets(&expression, &sets, &SsgseaOptions::default());
        assert!(matches!(result, Err(ScoringError::Configuration(_))));
    }

    #[test]
    fn scores_are_deterministic() {
        let expression = expression_fixture();
        let sets = vec![set("top", &["g1", "g2"]), set("mid", &["g2", "g3"])];
        let a = score_gene_sets(&expression, &sets, &SsgseaOptions::default()).unwrap();
        let b = score_gene_sets(&expression, &sets, &SsgseaOptions::default()).unwrap();
        assert_eq!(a, b);
    }
}
