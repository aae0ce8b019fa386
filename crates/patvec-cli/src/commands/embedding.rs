//! Embedding command implementations.
use std::path::Path;

use anyhow::{Context, Result};

use patvec_scoring::embedding::bin_scores;
use patvec_scoring::io;

/// Sign-binning of a score matrix into {1, -1, 0} embedding vectors.
pub fn run_binning(data: &Path, out: &Path) -> Result<()> {
    eprintln!("[patvec::embedding] binning {}", data.display());

    let scores = io::read_score_matrix(data)
        .with_context(|| format!("failed to read score matrix {}", data.display()))?;
    let binned = bin_scores(&scores)?;
    io::write_score_matrix(&binned, out)
        .with_context(|| format!("failed to write embedding to {}", out.display()))?;

    eprintln!(
        "[patvec::embedding] wrote {} samples x {} features to {}",
        binned.n_rows(),
        binned.n_columns(),
        out.display()
    );
    Ok(())
}
