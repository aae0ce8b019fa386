//! Tab-separated readers and writers for the toolkit's tabular formats.
//!
//! Expression matrices carry gene ids in the first column and sample ids in
//! the header; score matrices are the transpose convention (sample rows,
//! feature columns). Design tables have the sample id in the first column
//! and a `Target` group column resolved case-insensitively. Gene sets use
//! the `.gmt` format: name, description, then member genes, tab-separated.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ndarray::Array2;

use crate::data::{DesignTable, ExpressionMatrix, ScoreMatrix};
use crate::enrichment::GeneSet;
use crate::error::{Result, ScoringError};

/// Read a genes-by-samples expression matrix from a TSV file.
pub fn read_expression_matrix<P: AsRef<Path>>(path: P) -> Result<ExpressionMatrix> {
    let (row_ids, column_ids, values) = read_labeled_matrix(path.as_ref())?;
    ExpressionMatrix::new(row_ids, column_ids, values)
}

/// Read a samples-by-features score matrix from a TSV file.
pub fn read_score_matrix<P: AsRef<Path>>(path: P) -> Result<ScoreMatrix> {
    let (row_ids, column_ids, values) = read_labeled_matrix(path.as_ref())?;
    ScoreMatrix::new(row_ids, column_ids, values)
}

/// Write a score matrix as TSV: empty corner cell, feature ids in the
/// header, one labeled row per sample.
pub fn write_score_matrix<P: AsRef<Path>>(scores: &ScoreMatrix, path: P) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path.as_ref())?;

    let mut header = Vec::with_capacity(scores.n_columns() + 1);
    header.push(String::new());
    header.extend(scores.column_ids().iter().cloned());
    writer.write_record(&header)?;

    for (row_idx, row_id) in scores.row_ids().iter().enumerate() {
        let mut record = Vec::with_capacity(scores.n_columns() + 1);
        record.push(row_id.clone());
        for value in scores.values().row(row_idx) {
            record.push(value.to_string());
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a design table: sample ids in the first column, group labels in the
/// `Target` column (located case-insensitively).
pub fn read_design_table<P: AsRef<Path>>(path: P) -> Result<DesignTable> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let target_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("target"))
        .ok_or_else(|| {
            ScoringError::Parse(format!(
                "{}: design table has no Target column",
                path.display()
            ))
        })?;
    if target_idx == 0 {
        return Err(ScoringError::Parse(format!(
            "{}: first design column must hold sample ids, not Target",
            path.display()
        )));
    }

    let mut rows = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        let sample = record.get(0).unwrap_or("").trim();
        let target = record.get(target_idx).unwrap_or("").trim();
        if sample.is_empty() || target.is_empty() {
            return Err(ScoringError::Parse(format!(
                "{}: empty sample id or Target at row {}",
                path.display(),
                row_idx + 2
            )));
        }
        rows.push((sample.to_string(), target.to_string()));
    }
    DesignTable::new(rows)
}

/// Read a `.gmt` gene-set file. Blank lines are ignored; duplicate set
/// names and sets without members are rejected.
pub fn read_gene_sets<P: AsRef<Path>>(path: P) -> Result<Vec<GeneSet>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);

    let mut sets: Vec<GeneSet> = Vec::new();
    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split('\t');
        let name = fields.next().unwrap_or("").trim().to_string();
        let description = fields.next().unwrap_or("").trim().to_string();
        let genes: Vec<String> = fields
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect();
        if name.is_empty() || genes.is_empty() {
            return Err(ScoringError::Parse(format!(
                "{}: line {} is not a valid gene set (name, description, genes...)",
                path.display(),
                line_idx + 1
            )));
        }
        if sets.iter().any(|s| s.name == name) {
            return Err(ScoringError::Parse(format!(
                "{}: duplicate gene set name '{}'",
                path.display(),
                name
            )));
        }
        sets.push(GeneSet {
            name,
            description,
            genes,
        });
    }
    if sets.is_empty() {
        return Err(ScoringError::Parse(format!(
            "{}: no gene sets found",
            path.display()
        )));
    }
    Ok(sets)
}

/// Shared reader for labeled numeric matrices: first header cell is
/// ignored, remaining header cells are column ids, first cell of each row
/// is the row id.
fn read_labeled_matrix(path: &Path) -> Result<(Vec<String>, Vec<String>, Array2<f64>)> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    if headers.len() < 2 {
        return Err(ScoringError::Parse(format!(
            "{}: expected a label column plus at least one value column",
            path.display()
        )));
    }
    let column_ids: Vec<String> = headers.iter().skip(1).map(|h| h.to_string()).collect();

    let mut row_ids = Vec::new();
    let mut cells = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() != headers.len() {
            return Err(ScoringError::Parse(format!(
                "{}: row {} has {} fields, expected {}",
                path.display(),
                row_idx + 2,
                record.len(),
                headers.len()
            )));
        }
        row_ids.push(record.get(0).unwrap_or("").trim().to_string());
        for (col_idx, cell) in record.iter().skip(1).enumerate() {
            let value: f64 = cell.trim().parse().map_err(|_| {
                ScoringError::Parse(format!(
                    "{}: invalid value '{}' at row {} column '{}'",
                    path.display(),
                    cell,
                    row_idx + 2,
                    column_ids[col_idx]
                ))
            })?;
            cells.push(value);
        }
    }

    let values = Array2::from_shape_vec((row_ids.len(), column_ids.len()), cells)
        .map_err(|e| ScoringError::Parse(format!("{}: {}", path.display(), e)))?;
    Ok((row_ids, column_ids, values))
}
