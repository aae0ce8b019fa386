//! Core data holders: the expression matrix, the experiment design table,
//! and the samples-by-features score matrix produced by the scorers.
use std::collections::{HashMap, HashSet};

use ndarray::{Array2, ArrayView1, Axis};

use crate::error::{Result, ScoringError};

/// A genes-by-samples matrix of expression values with string identifiers
/// on both axes. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct ExpressionMatrix {
    genes: Vec<String>,
    samples: Vec<String>,
    values: Array2<f64>,
}

impl ExpressionMatrix {
    /// Build a matrix from identifiers and values (rows = genes,
    /// columns = samples). Identifier counts must match the value shape and
    /// identifiers must be unique per axis.
    pub fn new(genes: Vec<String>, samples: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if values.nrows() != genes.len() || values.ncols() != samples.len() {
            return Err(ScoringError::Configuration(format!(
                "expression shape {}x{} does not match {} genes and {} samples",
                values.nrows(),
                values.ncols(),
                genes.len(),
                samples.len()
            )));
        }
        check_unique(&genes, "gene")?;
        check_unique(&samples, "sample")?;
        Ok(ExpressionMatrix {
            genes,
            samples,
            values,
        })
    }

    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn n_genes(&self) -> usize {
        self.genes.len()
    }

    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    /// One sample's expression vector, in gene order.
    pub fn sample_column(&self, index: usize) -> ArrayView1<'_, f64> {
        self.values.column(index)
    }

    /// Copy of the matrix restricted to the given sample columns, preserving
    /// the order of `indices`.
    pub fn select_samples(&self, indices: &[usize]) -> Array2<f64> {
        self.values.select(Axis(1), indices)
    }
}

/// One row per sample: the sample identifier and its categorical group
/// label (the "Target" column of the design file).
#[derive(Debug, Clone)]
pub struct DesignTable {
    samples: Vec<String>,
    targets: Vec<String>,
    index: HashMap<String, usize>,
}

impl DesignTable {
    pub fn new(rows: Vec<(String, String)>) -> Result<Self> {
        let mut samples = Vec::with_capacity(rows.len());
        let mut targets = Vec::with_capacity(rows.len());
        let mut index = HashMap::with_capacity(rows.len());
        for (sample, target) in rows {
            if index.insert(sample.clone(), samples.len()).is_some() {
                return Err(ScoringError::Configuration(format!(
                    "duplicate sample id '{}' in design table",
                    sample
                )));
            }
            samples.push(sample);
            targets.push(target);
        }
        Ok(DesignTable {
            samples,
            targets,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Group label for a sample id, if the sample is present.
    pub fn target_of(&self, sample: &str) -> Option<&str> {
        self.index.get(sample).map(|&i| self.targets[i].as_str())
    }

    /// Check that this table has exactly one row per expression column and
    /// no rows for unknown samples.
    pub fn validate_covers(&self, expression: &ExpressionMatrix) -> Result<()> {
        for sample in expression.samples() {
            if self.target_of(sample).is_none() {
                return Err(ScoringError::Configuration(format!(
                    "design table has no row for sample '{}'",
                    sample
                )));
            }
        }
        if self.len() != expression.n_samples() {
            let known: HashSet<&str> = expression.samples().iter().map(String::as_str).collect();
            let extra = self
                .samples
                .iter()
                .find(|s| !known.contains(s.as_str()))
                .map(String::as_str)
                .unwrap_or("?");
            return Err(ScoringError::Configuration(format!(
                "design table row '{}' does not match any expression column",
                extra
            )));
        }
        Ok(())
    }
}

/// A labeled samples-by-features result matrix. Rows are sample identifiers,
/// columns are genes or gene-set names depending on the scorer.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    row_ids: Vec<String>,
    column_ids: Vec<String>,
    values: Array2<f64>,
}

impl ScoreMatrix {
    pub fn new(row_ids: Vec<String>, column_ids: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if values.nrows() != row_ids.len() || values.ncols() != column_ids.len() {
            return Err(ScoringError::Configuration(format!(
                "score shape {}x{} does not match {} rows and {} columns",
                values.nrows(),
                values.ncols(),
                row_ids.len(),
                column_ids.len()
            )));
        }
        Ok(ScoreMatrix {
            row_ids,
            column_ids,
            values,
        })
    }

    pub fn row_ids(&self) -> &[String] {
        &self.row_ids
    }

    pub fn column_ids(&self) -> &[String] {
        &self.column_ids
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn n_rows(&self) -> usize {
        self.row_ids.len()
    }

    pub fn n_columns(&self) -> usize {
        self.column_ids.len()
    }
}

fn check_unique(ids: &[String], what: &str) -> Result<()> {
    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(id.as_str()) {
            return Err(ScoringError::Configuration(format!(
                "duplicate {} id '{}'",
                what, id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn expression_rejects_duplicate_gene_ids() {
        let values = array![[1.0, 2.0], [3.0, 4.0]];
        let result = ExpressionMatrix::new(
            vec!["g1".into(), "g1".into()],
            vec!["s1".into(), "s2".into()],
            values,
        );
        assert!(matches!(result, Err(ScoringError::Configuration(_))));
    }

    #[test]
    fn expression_rejects_shape_mismatch() {
        let values = array![[1.0, 2.0], [3.0, 4.0]];
        let result = ExpressionMatrix::new(
            vec!["g1".into()],
            vec!["s1".into(), "s2".into()],
            values,
        );
        assert!(result.is_err());
    }

    #[test]
    fn design_lookup_and_coverage() {
        let values = array![[1.0, 2.0], [3.0, 4.0]];
        let expr = ExpressionMatrix::new(
            vec!["g1".into(), "g2".into()],
            vec!["s1".into(), "s2".into()],
            values,
        )
        .unwrap();

        let design = DesignTable::new(vec![
            ("s1".into(), "Control".into()),
            ("s2".into(), "Tumor".into()),
        ])
        .unwrap();
        assert_eq!(design.target_of("s2"), Some("Tumor"));
        assert!(design.validate_covers(&expr).is_ok());

        let missing = DesignTable::new(vec![("s1".into(), "Control".into())]).unwrap();
        assert!(missing.validate_covers(&expr).is_err());

        let extra = DesignTable::new(vec![
            ("s1".into(), "Control".into()),
            ("s2".into(), "Tumor".into()),
            ("s3".into(), "Tumor".into()),
        ])
        .unwrap();
        assert!(extra.validate_covers(&expr).is_err());
    }

    #[test]
    fn design_rejects_duplicate_rows() {
        let result = DesignTable::new(vec![
            ("s1".into(), "Control".into()),
            ("s1".into(), "Tumor".into()),
        ]);
        assert!(result.is_err());
    }
}
