//! Loading of labeled embedding datasets.
//!
//! The classification input is a samples-by-features TSV produced by the
//! scoring/embedding steps with one extra `label` column: sample ids in the
//! first column, feature values in between, class labels in the `label`
//! column (located case-insensitively, any position after the first).
use std::path::Path;

use ndarray::Array2;

use crate::error::{ClassifierError, Result};

/// A binary-labeled feature matrix. `classes` maps class codes to the
/// original label strings; code 1 (the lexicographically larger label) is
/// the positive class for metrics and probabilities.
#[derive(Debug, Clone)]
pub struct LabeledDataset {
    pub x: Array2<f64>,
    pub y: Vec<usize>,
    pub sample_ids: Vec<String>,
    pub feature_names: Vec<String>,
    pub classes: Vec<String>,
}

impl LabeledDataset {
    pub fn n_samples(&self) -> usize {
        self.sample_ids.len()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Count of samples per class code.
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.classes.len()];
        for &code in &self.y {
            counts[code] += 1;
        }
        counts
    }
}

/// Read a labeled dataset from TSV. Exactly two distinct labels are
/// required; rows with a missing label or non-numeric feature cell fail
/// with a parse error naming the row.
pub fn read_labeled_tsv<P: AsRef<Path>>(path: P) -> Result<LabeledDataset> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    if headers.len() < 3 {
        return Err(ClassifierError::Parse(format!(
            "{}: expected sample id, at least one feature, and a label column",
            path.display()
        )));
    }
    let label_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("label"))
        .ok_or_else(|| {
            ClassifierError::Parse(format!("{}: no label column found", path.display()))
        })?;
    if label_idx == 0 {
        return Err(ClassifierError::Parse(format!(
            "{}: first column must hold sample ids, not labels",
            path.display()
        )));
    }

    let feature_names: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != 0 && i != label_idx)
        .map(|(_, h)| h.to_string())
        .collect();

    let mut sample_ids = Vec::new();
    let mut raw_labels = Vec::new();
    let mut cells = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        sample_ids.push(record.get(0).unwrap_or("").trim().to_string());

        let label = record.get(label_idx).unwrap_or("").trim();
        if label.is_empty() {
            return Err(ClassifierError::Parse(format!(
                "{}: missing label at row {}",
                path.display(),
                row_idx + 2
            )));
        }
        raw_labels.push(label.to_string());

        for (col_idx, cell) in record.iter().enumerate() {
            if col_idx == 0 || col_idx == label_idx {
                continue;
            }
            let value: f64 = cell.trim().parse().map_err(|_| {
                ClassifierError::Parse(format!(
                    "{}: invalid feature value '{}' at row {}",
                    path.display(),
                    cell,
                    row_idx + 2
                ))
            })?;
            cells.push(value);
        }
    }

    let mut classes: Vec<String> = raw_labels.clone();
    classes.sort();
    classes.dedup();
    if classes.len() != 2 {
        return Err(ClassifierError::Configuration(format!(
            "{}: expected exactly 2 classes, found {} ({})",
            path.display(),
            classes.len(),
            classes.join(", ")
        )));
    }

    let y = raw_labels
        .iter()
        .map(|label| if *label == classes[1] { 1 } else { 0 })
        .collect();

    let x = Array2::from_shape_vec((sample_ids.len(), feature_names.len()), cells)
        .map_err(|e| ClassifierError::Parse(format!("{}: {}", path.display(), e)))?;

    log::debug!(
        "loaded {} samples x {} features from {} (classes: {} / {})",
        sample_ids.len(),
        feature_names.len(),
        path.display(),
        classes[0],
        classes[1]
    );

    Ok(LabeledDataset {
        x,
        y,
        sample_ids,
        feature_names,
        classes,
    })
}
