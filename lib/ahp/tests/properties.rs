use finishcase_ahp::{validate_matrix, AhpEngine, JudgmentMatrix, WeightMethod};
use proptest::prelude::*;

/// Saaty-scale judgments 1/9 ..= 9
fn judgment() -> impl Strategy<Value = f64> {
    (1u32..=9, any::<bool>()).prop_map(|(v, invert)| if invert { 1.0 / v as f64 } else { v as f64 })
}

/// A reciprocal matrix of order 2..=8 built from an arbitrary upper triangle
fn reciprocal_matrix() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (2usize..=8).prop_flat_map(|n| {
        prop::collection::vec(judgment(), n * (n - 1) / 2).prop_map(move |upper| {
            let mut rows = vec![vec![1.0; n]; n];
            let mut values = upper.into_iter();
            for i in 0..n {
                for j in (i + 1)..n {
                    let v = values.next().unwrap_or(1.0);
                    rows[i][j] = v;
                    rows[j][i] = 1.0 / v;
                }
            }
            rows
        })
    })
}

/// A perfectly consistent matrix from positive underlying values
fn ratio_matrix() -> impl Strategy<Value = Vec<Vec<f64>>> {
    prop::collection::vec(0.1f64..50.0, 2..=10).prop_map(|values| {
        values
            .iter()
            .map(|a| values.iter().map(|b| a / b).collect())
            .collect()
    })
}

proptest! {
    #[test]
    fn reciprocal_matrices_validate(rows in reciprocal_matrix()) {
        prop_assert!(validate_matrix(&rows));
    }

    #[test]
    fn broken_reciprocity_fails_validation(rows in reciprocal_matrix(), bump in 0.01f64..5.0) {
        let mut rows = rows;
        rows[0][1] += bump;
        prop_assert!(!validate_matrix(&rows));
    }

    #[test]
    fn geometric_weights_sum_to_one(rows in reciprocal_matrix()) {
        let result = AhpEngine::default()
            .compute_weights(&rows, WeightMethod::GeometricMean)
            .unwrap();
        prop_assert!((result.weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        prop_assert!(result.weights.iter().all(|w| *w > 0.0));
    }

    #[test]
    fn eigenvector_weights_sum_to_one(rows in reciprocal_matrix()) {
        let result = AhpEngine::default()
            .compute_weights(&rows, WeightMethod::Eigenvector)
            .unwrap();
        prop_assert!((result.weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn consistent_matrices_have_zero_cr(rows in ratio_matrix()) {
        let matrix = JudgmentMatrix::new(rows).unwrap();
        let engine = AhpEngine::default();
        for method in [WeightMethod::GeometricMean, WeightMethod::Eigenvector] {
            let result = engine.weigh(&matrix, method).unwrap();
            prop_assert!(result.cr.abs() < 1e-6, "cr = {}", result.cr);
            prop_assert!(result.is_consistent);
        }
    }

    #[test]
    fn lambda_max_is_at_least_order(rows in reciprocal_matrix()) {
        let n = rows.len() as f64;
        let result = AhpEngine::default()
            .compute_weights(&rows, WeightMethod::Eigenvector)
            .unwrap();
        prop_assert!(result.lambda_max >= n - 1e-6);
    }
}
