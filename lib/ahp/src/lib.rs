//! # finishcase AHP
//!
//! Weight elicitation with the Analytic Hierarchy Process.
//!
//! Experts compare features pairwise ("roughness matters 3x more than
//! defects"); the comparisons form a reciprocal [`JudgmentMatrix`] from which
//! a priority vector is derived and checked for consistency.
//!
//! ## Example
//!
//! ```rust
//! use finishcase_ahp::{AhpEngine, WeightMethod};
//!
//! let engine = AhpEngine::default();
//! let result = engine
//!     .compute_weights(
//!         &[
//!             vec![1.0, 2.0, 3.0],
//!             vec![0.5, 1.0, 1.5],
//!             vec![1.0 / 3.0, 1.0 / 1.5, 1.0],
//!         ],
//!         WeightMethod::Eigenvector,
//!     )
//!     .unwrap();
//!
//! assert!(result.is_consistent);
//! assert!((result.weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
//! ```

pub mod consistency;
pub mod engine;
pub mod error;
pub mod hierarchy;
pub mod matrix;
pub mod presets;
pub mod weights;

pub use consistency::{
    adjustment_suggestions, consistency_check, random_index, suspect_triples, ConsistencyLevel,
    ConsistencyReport, CONSISTENCY_THRESHOLD, RANDOM_INDEX,
};
pub use engine::{AhpEngine, AhpOptions, WeightResult};
pub use error::{AhpError, MatrixViolation, Result};
pub use hierarchy::aggregate_hierarchy;
pub use matrix::{
    diagnose_matrix, fill_reciprocal, matrix_template, validate_matrix, JudgmentMatrix,
    RECIPROCAL_TOLERANCE,
};
pub use weights::{eigenvector_weights, geometric_mean_weights, EigenEstimate, WeightMethod};
