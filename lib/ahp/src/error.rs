use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AhpError>;

/// Errors raised by weight elicitation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AhpError {
    #[error("Invalid judgment matrix: {}", summarize(.0))]
    InvalidMatrix(Vec<MatrixViolation>),

    #[error("Weight vector has {actual} entries, matrix order is {expected}")]
    WeightLength { expected: usize, actual: usize },

    #[error("Weight {index} is not positive: {value}")]
    NonPositiveWeight { index: usize, value: f64 },

    #[error("Hierarchy dimension mismatch: {0}")]
    DimensionMismatch(String),
}

/// A single broken rule in a judgment matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatrixViolation {
    Empty,
    NotSquare { row: usize, len: usize, expected: usize },
    Diagonal { index: usize, value: f64 },
    Reciprocal { row: usize, col: usize, product: f64 },
    NonPositive { row: usize, col: usize, value: f64 },
    NonFinite { row: usize, col: usize },
}

impl fmt::Display for MatrixViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixViolation::Empty => write!(f, "matrix has no rows"),
            MatrixViolation::NotSquare { row, len, expected } => {
                write!(f, "row {} has {} entries, expected {}", row, len, expected)
            }
            MatrixViolation::Diagonal { index, value } => {
                write!(f, "diagonal entry ({}, {}) is {}, expected 1", index, index, value)
            }
            MatrixViolation::Reciprocal { row, col, product } => write!(
                f,
                "entries ({}, {}) and ({}, {}) are not reciprocal (product {})",
                row, col, col, row, product
            ),
            MatrixViolation::NonPositive { row, col, value } => {
                write!(f, "entry ({}, {}) is not positive: {}", row, col, value)
            }
            MatrixViolation::NonFinite { row, col } => {
                write!(f, "entry ({}, {}) is not a finite number", row, col)
            }
        }
    }
}

fn summarize(violations: &[MatrixViolation]) -> String {
    match violations {
        [] => "no violations recorded".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{} (and {} more)", first, rest.len()),
    }
}
