//! Consistency checking
//!
//! Measures how far a judgment matrix is from a perfect ratio scale. The
//! consistency index `CI = (λmax - n) / (n - 1)` is compared against the
//! random index `RI(n)` of random reciprocal matrices; `CR = CI / RI` below
//! the threshold is acceptable.

use crate::error::{AhpError, Result};
use crate::matrix::JudgmentMatrix;
use serde::Serialize;
use std::fmt;

/// Conventional acceptability threshold for the consistency ratio
pub const CONSISTENCY_THRESHOLD: f64 = 0.1;

/// Random index for matrix orders 1 through 10
pub const RANDOM_INDEX: [f64; 10] = [0.0, 0.0, 0.58, 0.90, 1.12, 1.24, 1.32, 1.41, 1.45, 1.49];

/// Triples whose transitive product leaves `[1/F, F]` are flagged
const TRIPLE_DEVIATION_FACTOR: f64 = 2.0;

/// Random index for a matrix of order `n`
///
/// Orders above 10 reuse the value for 10; this is an approximation, the
/// published tables keep growing slowly.
pub fn random_index(n: usize) -> f64 {
    match n {
        0 => 0.0,
        n => RANDOM_INDEX[n.min(RANDOM_INDEX.len()) - 1],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyReport {
    pub lambda_max: f64,
    pub ci: f64,
    pub cr: f64,
    pub is_consistent: bool,
}

/// Check `weights` against `matrix` with the conventional 0.1 threshold
pub fn consistency_check(matrix: &JudgmentMatrix, weights: &[f64]) -> Result<ConsistencyReport> {
    consistency_check_with(matrix, weights, CONSISTENCY_THRESHOLD)
}

pub fn consistency_check_with(
    matrix: &JudgmentMatrix,
    weights: &[f64],
    threshold: f64,
) -> Result<ConsistencyReport> {
    let n = matrix.order();
    if weights.len() != n {
        return Err(AhpError::WeightLength {
            expected: n,
            actual: weights.len(),
        });
    }
    if let Some((index, &value)) = weights.iter().enumerate().find(|(_, w)| !(**w > 0.0)) {
        return Err(AhpError::NonPositiveWeight { index, value });
    }

    let lambda_max = lambda_max(matrix, weights);

    // Orders 1 and 2 are always consistent and RI is 0 there
    let (ci, cr) = if n <= 2 {
        (0.0, 0.0)
    } else {
        let ci = (lambda_max - n as f64) / (n as f64 - 1.0);
        (ci, ci / random_index(n))
    };

    Ok(ConsistencyReport {
        lambda_max,
        ci,
        cr,
        is_consistent: cr < threshold,
    })
}

/// Mean over rows of `(M·w)_i / w_i`
pub fn lambda_max(matrix: &JudgmentMatrix, weights: &[f64]) -> f64 {
    let product = matrix.multiply(weights);
    let n = product.len() as f64;
    product.iter().zip(weights).map(|(p, w)| p / w).sum::<f64>() / n
}

/// Qualitative band for a consistency ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConsistencyLevel {
    Excellent,
    Acceptable,
    NeedsImprovement,
    Unacceptable,
}

impl ConsistencyLevel {
    pub fn from_cr(cr: f64) -> Self {
        if cr < 0.05 {
            ConsistencyLevel::Excellent
        } else if cr < 0.1 {
            ConsistencyLevel::Acceptable
        } else if cr < 0.15 {
            ConsistencyLevel::NeedsImprovement
        } else {
            ConsistencyLevel::Unacceptable
        }
    }
}

impl fmt::Display for ConsistencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ConsistencyLevel::Excellent => "excellent",
            ConsistencyLevel::Acceptable => "acceptable",
            ConsistencyLevel::NeedsImprovement => "needs improvement",
            ConsistencyLevel::Unacceptable => "unacceptable",
        };
        f.write_str(text)
    }
}

/// Triples `(i, j, k)`, `i < j < k`, whose transitive judgment
/// `m[i][j] · m[j][k] / m[i][k]` is off by more than a factor of two
pub fn suspect_triples(matrix: &JudgmentMatrix) -> Vec<(usize, usize, usize)> {
    let n = matrix.order();
    let mut triples = Vec::new();
    if n < 3 {
        return triples;
    }

    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                let ratio = matrix.get(i, j) * matrix.get(j, k) / matrix.get(i, k);
                if ratio > TRIPLE_DEVIATION_FACTOR || ratio < 1.0 / TRIPLE_DEVIATION_FACTOR {
                    triples.push((i, j, k));
                }
            }
        }
    }
    triples
}

/// Text hints for revising an inconsistent matrix
///
/// Empty when `cr` is below the threshold. Element numbers in the text are
/// 1-based to match how experts see the comparison form.
pub fn adjustment_suggestions(matrix: &JudgmentMatrix, cr: f64) -> Vec<String> {
    if cr < CONSISTENCY_THRESHOLD {
        return Vec::new();
    }

    let mut suggestions =
        vec!["Matrix consistency is poor; re-evaluate the pairwise judgments".to_string()];

    for (i, j, k) in suspect_triples(matrix) {
        suggestions.push(format!(
            "Re-examine judgment between elements {}, {}, {}",
            i + 1,
            j + 1,
            k + 1
        ));
    }

    if suggestions.len() == 1 {
        suggestions.push(
            "Try softening extreme judgments (such as 9) to more moderate values (such as 7 or 5)"
                .to_string(),
        );
        suggestions.push(
            "Keep judgments transitive: if A > B and B > C, then A > C by a plausible margin"
                .to_string(),
        );
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::geometric_mean_weights;

    fn ratio_matrix(values: &[f64]) -> JudgmentMatrix {
        JudgmentMatrix::new(
            values
                .iter()
                .map(|a| values.iter().map(|b| a / b).collect())
                .collect(),
        )
        .unwrap()
    }

    fn inconsistent_matrix() -> JudgmentMatrix {
        // A > B by 9, B > C by 9, yet C > A by 9
        JudgmentMatrix::new(vec![
            vec![1.0, 9.0, 1.0 / 9.0],
            vec![1.0 / 9.0, 1.0, 9.0],
            vec![9.0, 1.0 / 9.0, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_random_index_lookup() {
        assert_eq!(random_index(1), 0.0);
        assert_eq!(random_index(3), 0.58);
        assert_eq!(random_index(5), 1.12);
        assert_eq!(random_index(10), 1.49);
        assert_eq!(random_index(11), 1.49);
        assert_eq!(random_index(40), 1.49);
    }

    #[test]
    fn test_consistent_matrix_has_zero_cr() {
        let matrix = ratio_matrix(&[1.0, 2.0, 3.0]);
        let weights = geometric_mean_weights(&matrix);
        let report = consistency_check(&matrix, &weights).unwrap();

        assert!((report.lambda_max - 3.0).abs() < 1e-9);
        assert!(report.ci.abs() < 1e-9);
        assert!(report.cr.abs() < 1e-9);
        assert!(report.is_consistent);
    }

    #[test]
    fn test_inconsistent_matrix_fails_check() {
        let matrix = inconsistent_matrix();
        let weights = geometric_mean_weights(&matrix);
        let report = consistency_check(&matrix, &weights).unwrap();
        assert!(report.cr > 0.1);
        assert!(!report.is_consistent);
    }

    #[test]
    fn test_order_two_always_consistent() {
        let matrix = ratio_matrix(&[1.0, 7.0]);
        let report = consistency_check(&matrix, &[0.125, 0.875]).unwrap();
        assert_eq!(report.cr, 0.0);
        assert!(report.is_consistent);
    }

    #[test]
    fn test_weight_length_mismatch() {
        let matrix = ratio_matrix(&[1.0, 2.0, 3.0]);
        assert_eq!(
            consistency_check(&matrix, &[0.5, 0.5]),
            Err(AhpError::WeightLength { expected: 3, actual: 2 })
        );
    }

    #[test]
    fn test_zero_weight_rejected() {
        let matrix = ratio_matrix(&[1.0, 2.0, 3.0]);
        assert!(matches!(
            consistency_check(&matrix, &[0.5, 0.5, 0.0]),
            Err(AhpError::NonPositiveWeight { index: 2, .. })
        ));
    }

    #[test]
    fn test_consistency_levels() {
        assert_eq!(ConsistencyLevel::from_cr(0.01), ConsistencyLevel::Excellent);
        assert_eq!(ConsistencyLevel::from_cr(0.07), ConsistencyLevel::Acceptable);
        assert_eq!(ConsistencyLevel::from_cr(0.12), ConsistencyLevel::NeedsImprovement);
        assert_eq!(ConsistencyLevel::from_cr(0.3), ConsistencyLevel::Unacceptable);
        assert_eq!(ConsistencyLevel::NeedsImprovement.to_string(), "needs improvement");
    }

    #[test]
    fn test_suggestions_flag_cyclic_triple() {
        let matrix = inconsistent_matrix();
        assert_eq!(suspect_triples(&matrix), vec![(0, 1, 2)]);

        let suggestions = adjustment_suggestions(&matrix, 0.5);
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions[1].contains("elements 1, 2, 3"));
    }

    #[test]
    fn test_suggestions_empty_when_consistent() {
        let matrix = inconsistent_matrix();
        assert!(adjustment_suggestions(&matrix, 0.05).is_empty());
    }

    #[test]
    fn test_generic_hints_without_suspect_triples() {
        let matrix = ratio_matrix(&[1.0, 2.0, 3.0]);
        let suggestions = adjustment_suggestions(&matrix, 0.2);
        assert_eq!(suggestions.len(), 3);
    }

    #[test]
    fn test_small_matrices_skip_triple_scan() {
        let matrix = ratio_matrix(&[1.0, 9.0]);
        assert!(suspect_triples(&matrix).is_empty());
    }
}
