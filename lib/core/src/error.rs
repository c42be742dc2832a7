use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid weight configuration: {0}")]
    InvalidConfig(String),

    #[error("Duplicate feature key in weight configuration: {0}")]
    DuplicateFeature(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
