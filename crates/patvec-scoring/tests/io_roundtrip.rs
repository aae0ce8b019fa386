//! Integration tests for the TSV and GMT readers and writers.

use approx::assert_relative_eq;
use ndarray::array;

use patvec_scoring::data::ScoreMatrix;
use patvec_scoring::io::{
    read_design_table, read_expression_matrix, read_gene_sets, read_score_matrix,
    write_score_matrix,
};
use patvec_scoring::ScoringError;

// ---------------------------------------------------------------------------
// Expression matrix
// ---------------------------------------------------------------------------

#[test]
fn reads_expression_matrix_with_gene_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("expression.tsv");
    std::fs::write(
        &path,
        "gene\ts1\ts2\ts3\ng1\t1.5\t2.0\t-0.5\ng2\t0.0\t3.25\t1.0\n",
    )
    .unwrap();

    let matrix = read_expression_matrix(&path).unwrap();
    assert_eq!(matrix.genes(), ["g1".to_string(), "g2".to_string()]);
    assert_eq!(
        matrix.samples(),
        ["s1".to_string(), "s2".to_string(), "s3".to_string()]
    );
    assert_relative_eq!(matrix.values()[(1, 1)], 3.25);
}

#[test]
fn malformed_cell_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("expression.tsv");
    std::fs::write(&path, "gene\ts1\ng1\tnot_a_number\n").unwrap();

    let result = read_expression_matrix(&path);
    assert!(matches!(result, Err(ScoringError::Parse(_))));
}

#[test]
fn missing_file_is_an_io_error() {
    let result = read_expression_matrix("/nonexistent/expression.tsv");
    assert!(matches!(result, Err(ScoringError::Io(_))));
}

// ---------------------------------------------------------------------------
// Design table
// ---------------------------------------------------------------------------

#[test]
fn reads_design_table_case_insensitive_target() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("design.tsv");
    std::fs::write(&path, "Sample\ttarget\ns1\tControl\ns2\tTumor\n").unwrap();

    let design = read_design_table(&path).unwrap();
    assert_eq!(design.len(), 2);
    assert_eq!(design.target_of("s1"), Some("Control"));
    assert_eq!(design.target_of("s2"), Some("Tumor"));
}

#[test]
fn design_without_target_column_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("design.tsv");
    std::fs::write(&path, "Sample\tGroup\ns1\tControl\n").unwrap();
    assert!(read_design_table(&path).is_err());
}

#[test]
fn design_with_empty_cell_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("design.tsv");
    std::fs::write(&path, "Sample\tTarget\ns1\t\n").unwrap();
    assert!(read_design_table(&path).is_err());
}

// ---------------------------------------------------------------------------
// Score matrix round trip
// ---------------------------------------------------------------------------

#[test]
fn score_matrix_round_trips_through_tsv() {
    let scores = ScoreMatrix::new(
        vec!["t1".into(), "t2".into()],
        vec!["g1".into(), "g2".into(), "g3".into()],
        array![[2.0, 0.0, -1.8], [0.0, 1.3, 0.0]],
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.tsv");
    write_score_matrix(&scores, &path).unwrap();
    let reread = read_score_matrix(&path).unwrap();

    assert_eq!(reread, scores);
}

#[test]
fn written_binned_values_are_integers() {
    let scores = ScoreMatrix::new(
        vec!["t1".into()],
        vec!["g1".into(), "g2".into()],
        array![[1.0, -1.0]],
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("binned.tsv");
    write_score_matrix(&scores, &path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("t1\t1\t-1"));
}

// ---------------------------------------------------------------------------
// Gene sets
// ---------------------------------------------------------------------------

#[test]
fn reads_gmt_gene_sets() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sets.gmt");
    std::fs::write(
        &path,
        "pathway_a\tsource A\tg1\tg2\tg3\n\npathway_b\t\tg4\tg5\n",
    )
    .unwrap();

    let sets = read_gene_sets(&path).unwrap();
    assert_eq!(sets.len(), 2);
    assert_eq!(sets[0].name, "pathway_a");
    assert_eq!(sets[0].genes, ["g1", "g2", "g3"]);
    assert_eq!(sets[1].genes, ["g4", "g5"]);
}

#[test]
fn duplicate_gene_set_names_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sets.gmt");
    std::fs::write(&path, "a\tdesc\tg1\tg2\na\tdesc\tg3\tg4\n").unwrap();
    assert!(read_gene_sets(&path).is_err());
}

#[test]
fn gene_set_without_members_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sets.gmt");
    std::fs::write(&path, "a\tdesc\n").unwrap();
    assert!(read_gene_sets(&path).is_err());
}
