//! patvec-scoring: sample-level scoring of patient expression profiles.
//!
//! This crate turns a genes-by-samples expression matrix and an experiment
//! design table into per-sample score vectors: differential scores against a
//! control cohort (the limma-style single-sample scorer), control-cohort
//! z-scores, and single-sample gene-set enrichment scores. A sign-binning
//! helper collapses score matrices into {1, -1, 0} embedding vectors.
//!
//! The differential fit itself lives behind the [`engine::ContrastEngine`]
//! trait so the statistics backend stays pluggable; [`engine::LinearModelEngine`]
//! is the built-in two-group linear-model backend.
pub mod correction;
pub mod data;
pub mod embedding;
pub mod engine;
pub mod enrichment;
pub mod error;
pub mod io;
pub mod limma;
pub mod zscore;

pub use data::{DesignTable, ExpressionMatrix, ScoreMatrix};
pub use error::{Result, ScoringError};
