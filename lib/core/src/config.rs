//! Feature weight configuration
//!
//! Declares which case features matter for similarity, how each feature is
//! compared, and how much it weighs. The configuration is produced by weight
//! elicitation, persisted by an external store and loaded here as a read-only
//! snapshot for matching and query synthesis.

use crate::error::{Error, Result};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashSet;

/// Normalization floor used by numeric similarity when a feature declares no scale.
pub const DEFAULT_NUMERIC_SCALE: f64 = 100.0;

/// Grouped feature weights with the time they were produced
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeatureWeightConfig {
    pub groups: Vec<FeatureGroup>,

    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub timestamp: i64,
}

impl FeatureWeightConfig {
    /// Create a configuration stamped with the current time
    pub fn new(groups: Vec<FeatureGroup>) -> Self {
        Self {
            groups,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Parse and validate a configuration from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check keys, weights and scales
    /// - keys must be non-empty and unique across all groups
    /// - weights must be finite and non-negative
    /// - scales, when present, must be finite and positive
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for feature in self.features() {
            if feature.key.trim().is_empty() {
                return Err(Error::InvalidConfig("feature key cannot be empty".to_string()));
            }
            if !seen.insert(feature.key.as_str()) {
                return Err(Error::DuplicateFeature(feature.key.clone()));
            }
            if !feature.weight.is_finite() || feature.weight < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "feature '{}' has invalid weight {}",
                    feature.key, feature.weight
                )));
            }
            if let Some(scale) = feature.scale {
                if !scale.is_finite() || scale <= 0.0 {
                    return Err(Error::InvalidConfig(format!(
                        "feature '{}' has invalid scale {}",
                        feature.key, scale
                    )));
                }
            }
        }
        Ok(())
    }

    /// All features in declaration order, group by group
    pub fn features(&self) -> impl Iterator<Item = &FeatureWeight> {
        self.groups.iter().flat_map(|g| g.features.iter())
    }

    /// Features paired with the name of their group
    pub fn features_with_group(&self) -> impl Iterator<Item = (&str, &FeatureWeight)> {
        self.groups
            .iter()
            .flat_map(|g| g.features.iter().map(move |f| (g.name.as_str(), f)))
    }

    pub fn get_feature(&self, key: &str) -> Option<&FeatureWeight> {
        self.features().find(|f| f.key == key)
    }

    pub fn feature_count(&self) -> usize {
        self.groups.iter().map(|g| g.features.len()).sum()
    }

    pub fn total_weight(&self) -> f64 {
        self.features().map(|f| f.weight).sum()
    }

    /// Features ordered by weight, heaviest first; equal weights keep
    /// declaration order
    pub fn feature_importance(&self) -> Vec<FeatureImportance> {
        let mut importance: Vec<FeatureImportance> = self
            .features_with_group()
            .map(|(group, f)| FeatureImportance {
                feature: f.label.clone(),
                weight: f.weight,
                group: group.to_string(),
            })
            .collect();
        importance.sort_by_key(|i| Reverse(OrderedFloat(i.weight)));
        importance
    }
}

/// A named group of features, e.g. geometry or surface
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureGroup {
    pub name: String,
    pub features: Vec<FeatureWeight>,
}

impl FeatureGroup {
    pub fn new(name: impl Into<String>, features: Vec<FeatureWeight>) -> Self {
        Self {
            name: name.into(),
            features,
        }
    }
}

/// Weight and comparison rule for a single feature
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureWeight {
    /// Key into `CaseRecord::features`; also the column name for query synthesis
    pub key: String,

    /// Human readable label used in reports
    pub label: String,

    pub weight: f64,

    #[serde(default)]
    pub kind: FeatureKind,

    /// Normalization floor for numeric similarity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

impl FeatureWeight {
    pub fn numeric(key: impl Into<String>, label: impl Into<String>, weight: f64) -> Self {
        Self::with_kind(key, label, weight, FeatureKind::Numeric)
    }

    pub fn categorical(key: impl Into<String>, label: impl Into<String>, weight: f64) -> Self {
        Self::with_kind(key, label, weight, FeatureKind::Categorical)
    }

    pub fn boolean(key: impl Into<String>, label: impl Into<String>, weight: f64) -> Self {
        Self::with_kind(key, label, weight, FeatureKind::Boolean)
    }

    fn with_kind(
        key: impl Into<String>,
        label: impl Into<String>,
        weight: f64,
        kind: FeatureKind,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            weight,
            kind,
            scale: None,
        }
    }

    /// Override the numeric normalization floor
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn effective_scale(&self) -> f64 {
        self.scale.unwrap_or(DEFAULT_NUMERIC_SCALE)
    }
}

/// Declared comparison type of a feature
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    /// Compared by normalized absolute difference
    #[default]
    Numeric,
    /// Exact match
    Categorical,
    /// Exact match
    Boolean,
}

impl FeatureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKind::Numeric => "numeric",
            FeatureKind::Categorical => "categorical",
            FeatureKind::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a feature importance listing
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeatureImportance {
    pub feature: String,
    pub weight: f64,
    pub group: String,
}
