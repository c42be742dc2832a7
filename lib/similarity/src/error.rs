use finishcase_core::FeatureKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MatchError>;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("No feature weight configuration loaded")]
    ConfigurationMissing,

    #[error(transparent)]
    InvalidConfig(#[from] finishcase_core::Error),

    #[error("Case '{case_id}': feature '{feature}' expected a {expected} value, found {found}")]
    FeatureType {
        case_id: String,
        feature: String,
        expected: FeatureKind,
        found: &'static str,
    },

    #[error("Target case '{case_id}' cannot be matched: {reason}")]
    InvalidTarget { case_id: String, reason: String },

    #[error("Batch match timed out after {completed} of {total} targets")]
    Timeout { completed: usize, total: usize },

    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    #[error("Export error: {0}")]
    Export(#[from] serde_json::Error),
}
