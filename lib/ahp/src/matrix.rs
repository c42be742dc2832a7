//! Judgment matrices
//!
//! A judgment matrix holds pairwise importance ratios: entry `(i, j)` says how
//! much more important element `i` is than element `j`. A usable matrix is
//! square, has a unit diagonal, strictly positive entries, and is reciprocal
//! (`m[i][j] * m[j][i] ≈ 1`).

use crate::error::{AhpError, MatrixViolation, Result};
use serde::{Deserialize, Serialize};

/// Allowed deviation of `m[i][j] * m[j][i]` from 1
pub const RECIPROCAL_TOLERANCE: f64 = 0.001;

/// A validated, immutable judgment matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct JudgmentMatrix {
    rows: Vec<Vec<f64>>,
}

impl JudgmentMatrix {
    /// Validate `rows` and wrap them
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let violations = diagnose_matrix(&rows);
        if !violations.is_empty() {
            return Err(AhpError::InvalidMatrix(violations));
        }
        Ok(Self { rows })
    }

    /// Build a matrix from expert input where only the upper triangle is meaningful
    pub fn from_upper_triangle(upper: &[Vec<f64>]) -> Result<Self> {
        Self::new(fill_reciprocal(upper)?)
    }

    /// The all-ones matrix of order `n`: every element judged equally important
    pub fn equal_importance(n: usize) -> Result<Self> {
        Self::new(matrix_template(n))
    }

    /// Number of compared elements
    pub fn order(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.rows[row][col]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Matrix-vector product `M · v`
    pub fn multiply(&self, v: &[f64]) -> Vec<f64> {
        self.rows
            .iter()
            .map(|row| row.iter().zip(v).map(|(a, b)| a * b).sum())
            .collect()
    }
}

impl TryFrom<Vec<Vec<f64>>> for JudgmentMatrix {
    type Error = AhpError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::new(rows)
    }
}

impl From<JudgmentMatrix> for Vec<Vec<f64>> {
    fn from(matrix: JudgmentMatrix) -> Self {
        matrix.rows
    }
}

/// True iff `rows` is a usable judgment matrix
pub fn validate_matrix(rows: &[Vec<f64>]) -> bool {
    diagnose_matrix(rows).is_empty()
}

/// Every rule `rows` breaks, cell by cell
///
/// Shape problems are reported alone since cell checks are meaningless on a
/// ragged matrix. Reciprocal violations are reported once per pair.
pub fn diagnose_matrix(rows: &[Vec<f64>]) -> Vec<MatrixViolation> {
    let n = rows.len();
    if n == 0 {
        return vec![MatrixViolation::Empty];
    }

    let shape: Vec<MatrixViolation> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.len() != n)
        .map(|(row, r)| MatrixViolation::NotSquare {
            row,
            len: r.len(),
            expected: n,
        })
        .collect();
    if !shape.is_empty() {
        return shape;
    }

    let mut violations = Vec::new();

    for i in 0..n {
        for j in 0..n {
            let value = rows[i][j];
            if !value.is_finite() {
                violations.push(MatrixViolation::NonFinite { row: i, col: j });
            } else if value <= 0.0 {
                violations.push(MatrixViolation::NonPositive { row: i, col: j, value });
            }
        }
    }

    for i in 0..n {
        if rows[i][i] != 1.0 {
            violations.push(MatrixViolation::Diagonal {
                index: i,
                value: rows[i][i],
            });
        }
    }

    for i in 0..n {
        for j in (i + 1)..n {
            let product = rows[i][j] * rows[j][i];
            // NaN products fail this check too
            if !((product - 1.0).abs() <= RECIPROCAL_TOLERANCE) {
                violations.push(MatrixViolation::Reciprocal { row: i, col: j, product });
            }
        }
    }

    violations
}

/// Complete a matrix from its upper triangle
///
/// The diagonal is set to 1 and every lower cell `(i, j)` to `1 / m[j][i]`;
/// whatever the lower triangle held before is ignored.
pub fn fill_reciprocal(upper: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    let n = upper.len();
    if n == 0 {
        return Err(AhpError::InvalidMatrix(vec![MatrixViolation::Empty]));
    }

    let mut violations = Vec::new();
    for (row, r) in upper.iter().enumerate() {
        if r.len() != n {
            violations.push(MatrixViolation::NotSquare {
                row,
                len: r.len(),
                expected: n,
            });
        }
    }
    if !violations.is_empty() {
        return Err(AhpError::InvalidMatrix(violations));
    }

    for i in 0..n {
        for j in (i + 1)..n {
            let value = upper[i][j];
            if !value.is_finite() {
                violations.push(MatrixViolation::NonFinite { row: i, col: j });
            } else if value <= 0.0 {
                violations.push(MatrixViolation::NonPositive { row: i, col: j, value });
            }
        }
    }
    if !violations.is_empty() {
        return Err(AhpError::InvalidMatrix(violations));
    }

    let mut result: Vec<Vec<f64>> = upper.to_vec();
    for i in 0..n {
        result[i][i] = 1.0;
        for j in 0..i {
            result[i][j] = 1.0 / result[j][i];
        }
    }
    Ok(result)
}

/// An `n × n` matrix of ones, the starting point for expert input
pub fn matrix_template(n: usize) -> Vec<Vec<f64>> {
    vec![vec![1.0; n]; n]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio_matrix(values: &[f64]) -> Vec<Vec<f64>> {
        values
            .iter()
            .map(|a| values.iter().map(|b| a / b).collect())
            .collect()
    }

    #[test]
    fn test_valid_matrix() {
        let rows = vec![
            vec![1.0, 2.0, 3.0],
            vec![0.5, 1.0, 1.5],
            vec![1.0 / 3.0, 1.0 / 1.5, 1.0],
        ];
        assert!(validate_matrix(&rows));
        assert!(JudgmentMatrix::new(rows).is_ok());
    }

    #[test]
    fn test_reciprocal_within_tolerance() {
        // 3 * 0.3334 = 1.0002
        let rows = vec![vec![1.0, 3.0], vec![0.3334, 1.0]];
        assert!(validate_matrix(&rows));
    }

    #[test]
    fn test_reciprocal_violation() {
        let rows = vec![vec![1.0, 3.0], vec![0.5, 1.0]];
        assert!(!validate_matrix(&rows));
        let violations = diagnose_matrix(&rows);
        assert_eq!(violations.len(), 1);
        assert!(matches!(
            violations[0],
            MatrixViolation::Reciprocal { row: 0, col: 1, product } if (product - 1.5).abs() < 1e-12
        ));
    }

    #[test]
    fn test_not_square() {
        let rows = vec![vec![1.0, 2.0], vec![0.5]];
        assert!(!validate_matrix(&rows));
        assert_eq!(
            diagnose_matrix(&rows),
            vec![MatrixViolation::NotSquare { row: 1, len: 1, expected: 2 }]
        );
    }

    #[test]
    fn test_bad_diagonal() {
        let rows = vec![vec![2.0, 1.0], vec![1.0, 1.0]];
        let violations = diagnose_matrix(&rows);
        assert!(violations.contains(&MatrixViolation::Diagonal { index: 0, value: 2.0 }));
    }

    #[test]
    fn test_non_positive_entries() {
        let rows = vec![vec![1.0, -2.0], vec![-0.5, 1.0]];
        let violations = diagnose_matrix(&rows);
        assert!(violations.contains(&MatrixViolation::NonPositive { row: 0, col: 1, value: -2.0 }));
        assert!(violations.contains(&MatrixViolation::NonPositive { row: 1, col: 0, value: -0.5 }));
    }

    #[test]
    fn test_nan_rejected() {
        let rows = vec![vec![1.0, f64::NAN], vec![1.0, 1.0]];
        assert!(!validate_matrix(&rows));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(!validate_matrix(&[]));
        assert!(matches!(
            JudgmentMatrix::new(vec![]),
            Err(AhpError::InvalidMatrix(ref v)) if v == &vec![MatrixViolation::Empty]
        ));
    }

    #[test]
    fn test_fill_reciprocal() {
        let mut upper = matrix_template(3);
        upper[0][1] = 3.0;
        upper[0][2] = 5.0;
        upper[1][2] = 2.0;

        let filled = fill_reciprocal(&upper).unwrap();
        assert!((filled[1][0] - 1.0 / 3.0).abs() < 1e-12);
        assert!((filled[2][0] - 0.2).abs() < 1e-12);
        assert!((filled[2][1] - 0.5).abs() < 1e-12);
        assert!(validate_matrix(&filled));
    }

    #[test]
    fn test_fill_reciprocal_overwrites_lower_and_diagonal() {
        let upper = vec![vec![7.0, 4.0], vec![9.0, 0.0]];
        let filled = fill_reciprocal(&upper).unwrap();
        assert_eq!(filled, vec![vec![1.0, 4.0], vec![0.25, 1.0]]);
    }

    #[test]
    fn test_fill_reciprocal_rejects_zero_upper() {
        let upper = vec![vec![1.0, 0.0], vec![1.0, 1.0]];
        assert!(fill_reciprocal(&upper).is_err());
    }

    #[test]
    fn test_multiply() {
        let m = JudgmentMatrix::new(ratio_matrix(&[1.0, 2.0])).unwrap();
        assert_eq!(m.multiply(&[1.0, 1.0]), vec![1.5, 3.0]);
    }

    #[test]
    fn test_serde_validates() {
        let m: JudgmentMatrix = serde_json::from_str("[[1.0, 4.0], [0.25, 1.0]]").unwrap();
        assert_eq!(m.order(), 2);
        assert!(serde_json::from_str::<JudgmentMatrix>("[[1.0, 4.0], [4.0, 1.0]]").is_err());
        assert_eq!(serde_json::to_string(&m).unwrap(), "[[1.0,4.0],[0.25,1.0]]");
    }
}
