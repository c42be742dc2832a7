//! Priority vectors from judgment matrices
//!
//! Two derivations are supported: the row geometric mean, and the principal
//! eigenvector by power iteration. Both return a vector summing to 1.

use crate::matrix::JudgmentMatrix;
use serde::{Deserialize, Serialize};

/// Iteration cap for the power method
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Convergence threshold on the largest per-component change
pub const DEFAULT_TOLERANCE: f64 = 1e-8;

/// How a priority vector is derived from a judgment matrix
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum WeightMethod {
    /// Normalized geometric mean of each row
    #[default]
    GeometricMean,
    /// Principal eigenvector by power iteration
    Eigenvector,
}

/// Outcome of power iteration
#[derive(Debug, Clone, PartialEq)]
pub struct EigenEstimate {
    /// Normalized principal eigenvector estimate
    pub vector: Vec<f64>,
    /// Sum of the last product before normalization, divided by `n`
    pub eigenvalue: f64,
    pub iterations: usize,
    /// False when the iteration cap was reached first
    pub converged: bool,
}

/// Row geometric means, normalized to sum 1
///
/// Computed in log space so long rows of large ratios do not overflow.
pub fn geometric_mean_weights(matrix: &JudgmentMatrix) -> Vec<f64> {
    let n = matrix.order() as f64;
    let means: Vec<f64> = matrix
        .rows()
        .iter()
        .map(|row| (row.iter().map(|v| v.ln()).sum::<f64>() / n).exp())
        .collect();
    normalize(means)
}

/// Principal eigenvector by power iteration
///
/// Starts from the uniform vector, multiplies by the matrix and renormalizes
/// by the sum until no component moves by `tolerance` or more, or until
/// `max_iterations` products have been taken.
pub fn eigenvector_weights(
    matrix: &JudgmentMatrix,
    max_iterations: usize,
    tolerance: f64,
) -> EigenEstimate {
    let n = matrix.order();
    let mut vector = vec![1.0 / n as f64; n];
    let mut eigenvalue = 0.0;

    for iteration in 0..max_iterations {
        let product = matrix.multiply(&vector);
        let sum: f64 = product.iter().sum();
        eigenvalue = sum / n as f64;

        let next: Vec<f64> = product.iter().map(|v| v / sum).collect();
        let change = vector
            .iter()
            .zip(&next)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);

        if change < tolerance {
            return EigenEstimate {
                vector: next,
                eigenvalue,
                iterations: iteration + 1,
                converged: true,
            };
        }
        vector = next;
    }

    EigenEstimate {
        vector,
        eigenvalue,
        iterations: max_iterations,
        converged: false,
    }
}

/// Scale `values` so they sum to 1
pub(crate) fn normalize(values: Vec<f64>) -> Vec<f64> {
    let sum: f64 = values.iter().sum();
    values.into_iter().map(|v| v / sum).collect()
}
