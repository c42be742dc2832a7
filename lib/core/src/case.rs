use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A recorded finishing job with its feature values
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Feature values keyed by `FeatureWeight::key`
    #[serde(default)]
    pub features: Map<String, Value>,
    #[serde(default)]
    pub metadata: CaseMetadata,
}

impl CaseRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        features: Map<String, Value>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            features,
            metadata: CaseMetadata::default(),
        }
    }

    /// Build a record from a JSON object of features; non-object values give
    /// an empty feature map
    pub fn from_features(id: impl Into<String>, features: Value) -> Self {
        let features = match features {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(id, String::new(), features)
    }

    pub fn with_metadata(mut self, metadata: CaseMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Feature value, treating JSON null as absent
    pub fn feature(&self, key: &str) -> Option<&Value> {
        self.features.get(key).filter(|v| !v.is_null())
    }

    pub fn has_feature(&self, key: &str) -> bool {
        self.features.contains_key(key)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CaseMetadata {
    #[serde(default)]
    pub create_time: String,
    #[serde(default)]
    pub update_time: String,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "default_quality")]
    pub quality: f64,
}

fn default_source() -> String {
    "manual".to_string()
}

fn default_quality() -> f64 {
    1.0
}

impl Default for CaseMetadata {
    fn default() -> Self {
        Self {
            create_time: String::new(),
            update_time: String::new(),
            source: default_source(),
            quality: default_quality(),
        }
    }
}
