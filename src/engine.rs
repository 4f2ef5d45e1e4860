//! # TOPSIS Engine
//! Pure, testable logic that maps `(matrix, weights, impacts)` → scores and
//! ranks. No I/O, suitable for unit tests and reuse from the CLI and the
//! web layer alike.
//!
//! Method: vector-normalize every criterion column, weight it, pick the
//! ideal best/worst value per column by impact direction, then score each
//! alternative by its relative closeness to the ideal worst. Rank 1 is the
//! best alternative; ties keep input order.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Preference direction of one criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    /// Higher raw values are preferred (`+`).
    #[serde(rename = "+")]
    Benefit,
    /// Lower raw values are preferred (`-`).
    #[serde(rename = "-")]
    Cost,
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Impact::Benefit => f.write_str("+"),
            Impact::Cost => f.write_str("-"),
        }
    }
}

/// Engine failure taxonomy. Callers branch on these kinds; the engine never
/// logs and never produces user-facing text beyond the error itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Zero alternatives or zero criteria.
    #[error("matrix has no rows or no columns")]
    EmptyInput,
    /// Ragged rows, or weights/impacts of the wrong length.
    #[error("{what} has {found} entries, expected {expected}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        found: usize,
    },
    /// A matrix cell is NaN or infinite.
    #[error("matrix value at row {row}, column {col} is not finite")]
    InvalidValue { row: usize, col: usize },
}

/// Scores and ranks for every alternative, in caller row order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    /// Relative closeness to the ideal solution, in `[0, 1]`.
    pub scores: Vec<f64>,
    /// 1-based ranks, a permutation of `1..=N`; rank 1 scores highest.
    pub ranks: Vec<usize>,
}

/// Score an `N x M` decision matrix against `M` weights and impacts.
///
/// Deterministic and side-effect free: identical inputs yield bit-identical
/// outputs. The caller's row order is preserved in both output vectors.
pub fn score(
    matrix: &[Vec<f64>],
    weights: &[f64],
    impacts: &[Impact],
) -> Result<Ranking, EngineError> {
    let rows = matrix.len();
    let cols = matrix.first().map_or(0, Vec::len);
    if rows == 0 || cols == 0 {
        return Err(EngineError::EmptyInput);
    }

    // 1) Shape checks: rectangular matrix, weights/impacts of matching
    //    length. Lengths are re-validated here even though the parsing
    //    layer checks them, so the contract holds for every caller.
    for (i, row) in matrix.iter().enumerate() {
        if row.len() != cols {
            return Err(EngineError::ShapeMismatch {
                what: format!("matrix row {i}"),
                expected: cols,
                found: row.len(),
            });
        }
    }
    if weights.len() != cols {
        return Err(EngineError::ShapeMismatch {
            what: "weights".to_string(),
            expected: cols,
            found: weights.len(),
        });
    }
    if impacts.len() != cols {
        return Err(EngineError::ShapeMismatch {
            what: "impacts".to_string(),
            expected: cols,
            found: impacts.len(),
        });
    }

    // 2) Cell validity: reject NaN/Inf up front instead of letting them
    //    poison the distances silently.
    for (i, row) in matrix.iter().enumerate() {
        for (j, v) in row.iter().enumerate() {
            if !v.is_finite() {
                return Err(EngineError::InvalidValue { row: i, col: j });
            }
        }
    }

    // 3) Weighted vector normalization. An all-zero column has a zero norm;
    //    its normalized cells are defined as 0.0 rather than NaN.
    let mut denom = vec![0.0f64; cols];
    for row in matrix {
        for (j, v) in row.iter().enumerate() {
            denom[j] += v * v;
        }
    }
    for d in &mut denom {
        *d = d.sqrt();
    }
    let norm: Vec<Vec<f64>> = matrix
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(j, &v)| {
                    if denom[j] == 0.0 {
                        0.0
                    } else {
                        (v / denom[j]) * weights[j]
                    }
                })
                .collect()
        })
        .collect();

    // 4) Ideal best/worst per column: max/min for benefit criteria,
    //    swapped for cost criteria.
    let mut ideal_best = vec![0.0f64; cols];
    let mut ideal_worst = vec![0.0f64; cols];
    for j in 0..cols {
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        for row in &norm {
            max = max.max(row[j]);
            min = min.min(row[j]);
        }
        match impacts[j] {
            Impact::Benefit => {
                ideal_best[j] = max;
                ideal_worst[j] = min;
            }
            Impact::Cost => {
                ideal_best[j] = min;
                ideal_worst[j] = max;
            }
        }
    }

    // 5) Euclidean distances to both ideals, then the closeness score.
    //    An alternative coinciding with both ideals scores 0.
    let mut scores = Vec::with_capacity(rows);
    for row in &norm {
        let mut dist_best = 0.0f64;
        let mut dist_worst = 0.0f64;
        for j in 0..cols {
            dist_best += (row[j] - ideal_best[j]).powi(2);
            dist_worst += (row[j] - ideal_worst[j]).powi(2);
        }
        let dist_best = dist_best.sqrt();
        let dist_worst = dist_worst.sqrt();
        let denom = dist_best + dist_worst;
        scores.push(if denom == 0.0 { 0.0 } else { dist_worst / denom });
    }

    // 6) Rank by descending score. The sort is stable, so equal scores keep
    //    their input order rather than sharing a rank.
    let mut order: Vec<usize> = (0..rows).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut ranks = vec![0usize; rows];
    for (pos, &i) in order.iter().enumerate() {
        ranks[i] = pos + 1;
    }

    Ok(Ranking { scores, ranks })
}
