use crate::config::Algorithm;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueryError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("{algorithm} similarity needs at least one numeric feature with a target value")]
    NoNumericFeatures { algorithm: Algorithm },

    #[error("No configured feature has a target value")]
    NoScorableFeatures,

    #[error("Target vector has zero weighted norm; cosine similarity is undefined")]
    ZeroTargetNorm,

    #[error("'{0}' is not a valid column name")]
    InvalidIdentifier(String),

    #[error("Feature '{feature}' has invalid weight {weight}")]
    InvalidWeight { feature: String, weight: f64 },

    #[error("Target value for numeric feature '{feature}' is not a number")]
    NonNumericTarget { feature: String },

    #[error("Target value for feature '{feature}' cannot be bound as a SQL value")]
    UnsupportedValue { feature: String },

    #[error("Invalid page {page} with page size {page_size}")]
    InvalidPage { page: u64, page_size: u64 },
}
