//! Sample-scoring command implementations.
use std::path::Path;

use anyhow::{Context, Result};

use patvec_scoring::correction::AdjustMethod;
use patvec_scoring::engine::LinearModelEngine;
use patvec_scoring::enrichment::{score_gene_sets, SsgseaOptions};
use patvec_scoring::io;
use patvec_scoring::limma::{score_single_sample, ScoreOptions};
use patvec_scoring::zscore::score_z;

/// Limma-style single-sample differential scoring.
pub fn run_limma(
    data: &Path,
    design: &Path,
    out: &Path,
    alpha: f64,
    method: &str,
    control: &str,
) -> Result<()> {
    eprintln!(
        "[patvec::sample-scoring] limma scoring of {} against control group '{}'",
        data.display(),
        control
    );

    let expression = io::read_expression_matrix(data)
        .with_context(|| format!("failed to read expression matrix {}", data.display()))?;
    let design_table = io::read_design_table(design)
        .with_context(|| format!("failed to read design table {}", design.display()))?;
    let options = ScoreOptions {
        alpha,
        adjust: method.parse::<AdjustMethod>()?,
        control: control.to_string(),
    };

    let scores = score_single_sample(
        &expression,
        &design_table,
        &options,
        &LinearModelEngine::new(),
    )?;
    io::write_score_matrix(&scores, out)
        .with_context(|| format!("failed to write scores to {}", out.display()))?;

    eprintln!(
        "[patvec::sample-scoring] wrote {} samples x {} genes to {}",
        scores.n_rows(),
        scores.n_columns(),
        out.display()
    );
    Ok(())
}

/// Control-cohort z-score scoring.
pub fn run_z_score(data: &Path, design: &Path, out: &Path, control: &str) -> Result<()> {
    eprintln!(
        "[patvec::sample-scoring] z-score scoring of {} against control group '{}'",
        data.display(),
        control
    );

    let expression = io::read_expression_matrix(data)
        .with_context(|| format!("failed to read expression matrix {}", data.display()))?;
    let design_table = io::read_design_table(design)
        .with_context(|| format!("failed to read design table {}", design.display()))?;

    let scores = score_z(&expression, &design_table, control)?;
    io::write_score_matrix(&scores, out)
        .with_context(|| format!("failed to write scores to {}", out.display()))?;

    eprintln!(
        "[patvec::sample-scoring] wrote {} samples x {} genes to {}",
        scores.n_rows(),
        scores.n_columns(),
        out.display()
    );
    Ok(())
}

/// Single-sample gene-set enrichment scoring.
pub fn run_ssgsea(data: &Path, gene_sets: &Path, out: &Path, min_size: usize) -> Result<()> {
    eprintln!(
        "[patvec::sample-scoring] ssgsea scoring of {} with gene sets {}",
        data.display(),
        gene_sets.display()
    );

    let expression = io::read_expression_matrix(data)
        .with_context(|| format!("failed to read expression matrix {}", data.display()))?;
    let sets = io::read_gene_sets(gene_sets)
        .with_context(|| format!("failed to read gene sets {}", gene_sets.display()))?;
    let options = SsgseaOptions {
        min_size,
        ..SsgseaOptions::default()
    };

    let scores = score_gene_sets(&expression, &sets, &options)?;
    io::write_score_matrix(&scores, out)
        .with_context(|| format!("failed to write scores to {}", out.display()))?;

    eprintln!(
        "[patvec::sample-scoring] wrote {} samples x {} gene sets to {}",
        scores.n_rows(),
        scores.n_columns(),
        out.display()
    );
    Ok(())
}
