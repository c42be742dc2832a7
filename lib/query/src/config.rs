use finishcase_core::{FeatureKind, FeatureWeightConfig};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scoring formula of a generated query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    #[default]
    WeightedEuclidean,
    Cosine,
    Manhattan,
    /// 0.4 euclidean + 0.3 cosine + 0.3 manhattan
    Comprehensive,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::WeightedEuclidean => "weighted_euclidean",
            Algorithm::Cosine => "cosine",
            Algorithm::Manhattan => "manhattan",
            Algorithm::Comprehensive => "comprehensive",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryConfig {
    pub algorithm: Algorithm,
    /// Minimum similarity score (0-100) a row must reach
    pub threshold: f64,
    pub max_results: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            threshold: 70.0,
            max_results: 10,
        }
    }
}

/// Column comparison used in SQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Numeric,
    Categorical,
}

/// A weighted column of the case table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureConfig {
    pub key: String,
    pub weight: f64,
    pub data_type: DataType,
}

impl FeatureConfig {
    pub fn numeric(key: impl Into<String>, weight: f64) -> Self {
        Self {
            key: key.into(),
            weight,
            data_type: DataType::Numeric,
        }
    }

    pub fn categorical(key: impl Into<String>, weight: f64) -> Self {
        Self {
            key: key.into(),
            weight,
            data_type: DataType::Categorical,
        }
    }

    /// One column per configured feature, in configuration order
    ///
    /// Boolean features compare by equality, so they become categorical
    /// columns.
    pub fn from_weight_config(config: &FeatureWeightConfig) -> Vec<FeatureConfig> {
        config
            .features()
            .map(|f| FeatureConfig {
                key: f.key.clone(),
                weight: f.weight,
                data_type: match f.kind {
                    FeatureKind::Numeric => DataType::Numeric,
                    FeatureKind::Categorical | FeatureKind::Boolean => DataType::Categorical,
                },
            })
            .collect()
    }
}
