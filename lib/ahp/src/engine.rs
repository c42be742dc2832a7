use crate::consistency::{
    adjustment_suggestions, consistency_check_with, ConsistencyLevel, ConsistencyReport,
    CONSISTENCY_THRESHOLD,
};
use crate::error::Result;
use crate::matrix::{validate_matrix, JudgmentMatrix};
use crate::weights::{
    eigenvector_weights, geometric_mean_weights, normalize, WeightMethod, DEFAULT_MAX_ITERATIONS,
    DEFAULT_TOLERANCE,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Tuning for weight elicitation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AhpOptions {
    pub max_iterations: usize,
    pub tolerance: f64,
    pub consistency_threshold: f64,
}

impl Default for AhpOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            consistency_threshold: CONSISTENCY_THRESHOLD,
        }
    }
}

/// Weights derived from one judgment matrix, with its consistency figures
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightResult {
    pub weights: Vec<f64>,
    pub lambda_max: f64,
    pub ci: f64,
    pub cr: f64,
    pub is_consistent: bool,
    pub method: WeightMethod,
    /// Power iteration stopped at its cap before converging
    pub approximate: bool,
}

impl WeightResult {
    pub fn consistency_level(&self) -> ConsistencyLevel {
        ConsistencyLevel::from_cr(self.cr)
    }
}

/// Turns expert pairwise comparisons into consistency-checked weights
#[derive(Debug, Clone, Default)]
pub struct AhpEngine {
    options: AhpOptions,
}

impl AhpEngine {
    pub fn new(options: AhpOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AhpOptions {
        &self.options
    }

    pub fn validate_matrix(&self, rows: &[Vec<f64>]) -> bool {
        validate_matrix(rows)
    }

    /// Validate raw expert input, then derive weights
    pub fn compute_weights(&self, rows: &[Vec<f64>], method: WeightMethod) -> Result<WeightResult> {
        let matrix = JudgmentMatrix::new(rows.to_vec())?;
        self.weigh(&matrix, method)
    }

    /// Derive weights from an already validated matrix and check consistency
    pub fn weigh(&self, matrix: &JudgmentMatrix, method: WeightMethod) -> Result<WeightResult> {
        let (weights, approximate) = match method {
            WeightMethod::GeometricMean => (geometric_mean_weights(matrix), false),
            WeightMethod::Eigenvector => {
                let estimate = eigenvector_weights(
                    matrix,
                    self.options.max_iterations,
                    self.options.tolerance,
                );
                if !estimate.converged {
                    warn!(
                        order = matrix.order(),
                        iterations = estimate.iterations,
                        "power iteration did not converge, returning best estimate"
                    );
                }
                // Renormalize so the sum is exact regardless of where iteration stopped
                (normalize(estimate.vector), !estimate.converged)
            }
        };

        let report = consistency_check_with(matrix, &weights, self.options.consistency_threshold)?;
        debug!(
            order = matrix.order(),
            ?method,
            lambda_max = report.lambda_max,
            cr = report.cr,
            "weights computed"
        );
        if !report.is_consistent {
            warn!(order = matrix.order(), cr = report.cr, "judgment matrix is inconsistent");
        }

        Ok(WeightResult {
            weights,
            lambda_max: report.lambda_max,
            ci: report.ci,
            cr: report.cr,
            is_consistent: report.is_consistent,
            method,
            approximate,
        })
    }

    /// Weigh several matrices, failing on the first invalid one
    pub fn compute_many(
        &self,
        matrices: &[Vec<Vec<f64>>],
        method: WeightMethod,
    ) -> Result<Vec<WeightResult>> {
        matrices
            .iter()
            .map(|rows| self.compute_weights(rows, method))
            .collect()
    }

    /// Validate raw input and check `weights` against it
    pub fn consistency_check(
        &self,
        rows: &[Vec<f64>],
        weights: &[f64],
    ) -> Result<ConsistencyReport> {
        let matrix = JudgmentMatrix::new(rows.to_vec())?;
        consistency_check_with(&matrix, weights, self.options.consistency_threshold)
    }

    /// Revision hints for `matrix` given its weight result
    pub fn suggestions(&self, matrix: &JudgmentMatrix, result: &WeightResult) -> Vec<String> {
        if result.cr < self.options.consistency_threshold {
            return Vec::new();
        }
        adjustment_suggestions(matrix, result.cr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AhpError;

    fn consistent_rows() -> Vec<Vec<f64>> {
        vec![
            vec![1.0, 2.0, 3.0],
            vec![0.5, 1.0, 1.5],
            vec![1.0 / 3.0, 1.0 / 1.5, 1.0],
        ]
    }

    #[test]
    fn test_both_methods_agree_on_consistent_matrix() {
        let engine = AhpEngine::default();
        let geo = engine.compute_weights(&consistent_rows(), WeightMethod::GeometricMean).unwrap();
        let eig = engine.compute_weights(&consistent_rows(), WeightMethod::Eigenvector).unwrap();

        for (a, b) in geo.weights.iter().zip(&eig.weights) {
            assert!((a - b).abs() < 1e-8);
        }
        assert!(geo.is_consistent && eig.is_consistent);
        assert!(geo.cr.abs() < 1e-9);
        assert!(!eig.approximate);
        assert_eq!(geo.consistency_level(), ConsistencyLevel::Excellent);
    }

    #[test]
    fn test_invalid_matrix_is_validation_error() {
        let engine = AhpEngine::default();
        let rows = vec![vec![1.0, 3.0], vec![3.0, 1.0]];
        assert!(!engine.validate_matrix(&rows));
        assert!(matches!(
            engine.compute_weights(&rows, WeightMethod::GeometricMean),
            Err(AhpError::InvalidMatrix(_))
        ));
        assert!(matches!(
            engine.consistency_check(&rows, &[0.5, 0.5]),
            Err(AhpError::InvalidMatrix(_))
        ));
    }

    #[test]
    fn test_capped_iteration_is_flagged() {
        let engine = AhpEngine::new(AhpOptions {
            max_iterations: 1,
            tolerance: 0.0,
            ..AhpOptions::default()
        });
        let result = engine.compute_weights(&consistent_rows(), WeightMethod::Eigenvector).unwrap();
        assert!(result.approximate);
        assert!((result.weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_compute_many_fails_on_invalid_member() {
        let engine = AhpEngine::default();
        let matrices = vec![consistent_rows(), vec![vec![1.0, 0.0], vec![0.0, 1.0]]];
        assert!(engine.compute_many(&matrices, WeightMethod::GeometricMean).is_err());
        assert_eq!(
            engine
                .compute_many(&matrices[..1], WeightMethod::GeometricMean)
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_suggestions_for_inconsistent_matrix() {
        let engine = AhpEngine::default();
        let matrix = JudgmentMatrix::from_upper_triangle(&[
            vec![1.0, 9.0, 1.0 / 9.0],
            vec![0.0, 1.0, 9.0],
            vec![0.0, 0.0, 1.0],
        ])
        .unwrap();
        let result = engine.weigh(&matrix, WeightMethod::Eigenvector).unwrap();
        assert!(!result.is_consistent);
        let suggestions = engine.suggestions(&matrix, &result);
        assert!(suggestions.iter().any(|s| s.contains("elements 1, 2, 3")));
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let engine = AhpEngine::default();
        let result = engine
            .compute_weights(&consistent_rows(), WeightMethod::GeometricMean)
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("lambdaMax").is_some());
        assert!(json.get("isConsistent").is_some());
        assert_eq!(json["method"], "geometricMean");
    }
}
