//! Sign-binning embedding: collapse a score matrix into {1, -1, 0} vectors.
//!
//! The scorers already decide significance (non-significant cells are exact
//! zeros), so the embedding only keeps the direction of each surviving
//! score.
use crate::data::ScoreMatrix;
use crate::error::Result;

/// Map every cell to 1 (positive), -1 (negative), or 0 (exactly zero).
pub fn bin_scores(scores: &ScoreMatrix) -> Result<ScoreMatrix> {
    let binned = scores.values().mapv(|v| {
        if v > 0.0 {
            1.0
        } else if v < 0.0 {
            -1.0
        } else {
            0.0
        }
    });
    ScoreMatrix::new(
        scores.row_ids().to_vec(),
        scores.column_ids().to_vec(),
        binned,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn bins_by_sign() {
        let scores = ScoreMatrix::new(
            vec!["s1".into(), "s2".into()],
            vec!["g1".into(), "g2".into()],
            array![[2.4, 0.0], [-1.7, 0.3]],
        )
        .unwrap();
        let binned = bin_scores(&scores).unwrap();
        assert_eq!(
            binned.values(),
            &array![[1.0, 0.0], [-1.0, 1.0]]
        );
        assert_eq!(binned.row_ids(), scores.row_ids());
        assert_eq!(binned.column_ids(), scores.column_ids());
    }
}
