//! Surface-finishing presets
//!
//! Standard feature groups for barrel / tumbling finishing jobs, default
//! expert judgments, and sanity checks on the resulting weights. Elicited
//! weights are turned into a [`FeatureWeightConfig`] here so the matcher and
//! the query synthesizer can consume them.

use crate::engine::WeightResult;
use crate::error::{AhpError, Result};
use crate::hierarchy::aggregate_hierarchy;
use crate::matrix::{fill_reciprocal, matrix_template, JudgmentMatrix};
use finishcase_core::{FeatureGroup, FeatureKind, FeatureWeight, FeatureWeightConfig};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetFeature {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FeatureKind,
}

const fn feature(key: &'static str, label: &'static str, kind: FeatureKind) -> PresetFeature {
    PresetFeature { key, label, kind }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupPreset {
    pub name: &'static str,
    pub label: &'static str,
    pub features: &'static [PresetFeature],
}

pub const GEOMETRY: GroupPreset = GroupPreset {
    name: "geometry",
    label: "Geometry",
    features: &[
        feature("length", "Length", FeatureKind::Numeric),
        feature("diameter", "Diameter", FeatureKind::Numeric),
        feature("thickness", "Thickness", FeatureKind::Numeric),
        feature("surface_area", "Surface area", FeatureKind::Numeric),
        feature("volume", "Volume", FeatureKind::Numeric),
    ],
};

pub const MATERIAL: GroupPreset = GroupPreset {
    name: "material",
    label: "Material",
    features: &[
        feature("hardness", "Hardness", FeatureKind::Numeric),
        feature("material_type", "Material type", FeatureKind::Categorical),
        feature("heat_treatment", "Heat treatment", FeatureKind::Categorical),
        feature("surface_coating", "Surface coating", FeatureKind::Categorical),
    ],
};

pub const SURFACE: GroupPreset = GroupPreset {
    name: "surface",
    label: "Surface",
    features: &[
        feature("surface_roughness", "Surface roughness", FeatureKind::Numeric),
        feature("surface_defects", "Surface defects", FeatureKind::Categorical),
        feature("residual_stress", "Residual stress", FeatureKind::Numeric),
        feature("surface_hardness", "Surface hardness", FeatureKind::Numeric),
    ],
};

pub const PROCESSING: GroupPreset = GroupPreset {
    name: "processing",
    label: "Processing requirements",
    features: &[
        feature("precision_requirement", "Precision requirement", FeatureKind::Categorical),
        feature("surface_quality", "Surface quality", FeatureKind::Categorical),
        feature("deburring", "Deburring", FeatureKind::Boolean),
        feature("edge_rounding", "Edge rounding", FeatureKind::Boolean),
        feature("surface_finish", "Surface finish", FeatureKind::Numeric),
    ],
};

pub const GROUPS: [GroupPreset; 4] = [GEOMETRY, MATERIAL, SURFACE, PROCESSING];

const SURFACE_QUALITY_KEYS: [&str; 3] = ["surface_roughness", "surface_quality", "surface_finish"];
const GEOMETRY_KEYS: [&str; 4] = ["length", "diameter", "thickness", "surface_area"];

/// Minimum combined weight for surface-quality features
const MIN_SURFACE_WEIGHT: f64 = 0.3;
/// Maximum combined weight for geometry features
const MAX_GEOMETRY_WEIGHT: f64 = 0.5;

/// Default judgment matrix for a group
///
/// Every pair starts at equal importance. For the surface group, roughness is
/// judged 3x as important as defects, 5x residual stress and 2x hardness.
pub fn standard_matrix(group: &GroupPreset) -> Result<JudgmentMatrix> {
    let mut upper = matrix_template(group.features.len());
    if group.name == SURFACE.name {
        upper[0][1] = 3.0;
        upper[0][2] = 5.0;
        upper[0][3] = 2.0;
    }
    JudgmentMatrix::new(fill_reciprocal(&upper)?)
}

/// Build a weight configuration from elicited group weights
///
/// `criteria` weighs the groups against each other; `local[i]` weighs the
/// features inside `groups[i]`. Each feature ends up with
/// `criteria[i] * local[i][j]`.
pub fn weight_config(
    groups: &[GroupPreset],
    criteria: &WeightResult,
    local: &[WeightResult],
) -> Result<FeatureWeightConfig> {
    if groups.len() != criteria.weights.len() || groups.len() != local.len() {
        return Err(AhpError::DimensionMismatch(format!(
            "{} groups, {} criteria weights, {} local weight results",
            groups.len(),
            criteria.weights.len(),
            local.len()
        )));
    }

    let mut feature_groups = Vec::with_capacity(groups.len());
    for ((group, &group_weight), result) in groups.iter().zip(&criteria.weights).zip(local) {
        if result.weights.len() != group.features.len() {
            return Err(AhpError::DimensionMismatch(format!(
                "group '{}' has {} features but {} local weights",
                group.name,
                group.features.len(),
                result.weights.len()
            )));
        }
        let global = aggregate_hierarchy(&[group_weight], std::slice::from_ref(&result.weights))?;
        let features = group
            .features
            .iter()
            .zip(global)
            .map(|(f, weight)| FeatureWeight {
                key: f.key.to_string(),
                label: f.label.to_string(),
                weight,
                kind: f.kind,
                scale: None,
            })
            .collect();
        feature_groups.push(FeatureGroup::new(group.name, features));
    }

    Ok(FeatureWeightConfig::new(feature_groups))
}

/// Outcome of the domain sanity checks
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightReview {
    pub is_valid: bool,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Check global weights (keyed by feature key) against finishing practice
///
/// Tumbling is mostly about surface quality, so surface features should carry
/// real weight and geometry should not dominate.
pub fn review_weights(weights: &HashMap<String, f64>) -> WeightReview {
    let sum_of = |keys: &[&str]| -> f64 { keys.iter().filter_map(|k| weights.get(*k)).sum() };

    let mut warnings = Vec::new();
    let mut suggestions = Vec::new();

    if sum_of(&SURFACE_QUALITY_KEYS) < MIN_SURFACE_WEIGHT {
        warnings.push("Surface quality features carry little weight".to_string());
        suggestions.push(
            "Finishing mainly improves surface quality; increase the weight of surface features"
                .to_string(),
        );
    }

    if sum_of(&GEOMETRY_KEYS) > MAX_GEOMETRY_WEIGHT {
        warnings.push("Geometry features carry too much weight".to_string());
        suggestions.push(
            "Geometry has a comparatively small effect on finishing; reduce its weight".to_string(),
        );
    }

    WeightReview {
        is_valid: warnings.is_empty(),
        warnings,
        suggestions,
    }
}

/// Flatten a configuration into `key -> weight` for [`review_weights`]
pub fn weights_by_key(config: &FeatureWeightConfig) -> HashMap<String, f64> {
    config.features().map(|f| (f.key.clone(), f.weight)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AhpEngine;
    use crate::weights::WeightMethod;

    #[test]
    fn test_standard_surface_matrix_prefers_roughness() {
        let matrix = standard_matrix(&SURFACE).unwrap();
        assert_eq!(matrix.order(), 4);
        assert!((matrix.get(2, 0) - 0.2).abs() < 1e-12);

        let result = AhpEngine::default()
            .weigh(&matrix, WeightMethod::GeometricMean)
            .unwrap();
        let top = result
            .weights
            .iter()
            .enumerate()
            .fold((0, 0.0), |best, (i, &w)| if w > best.1 { (i, w) } else { best });
        assert_eq!(top.0, 0);
    }

    #[test]
    fn test_standard_matrix_of_other_groups_is_uniform() {
        let matrix = standard_matrix(&GEOMETRY).unwrap();
        let result = AhpEngine::default()
            .weigh(&matrix, WeightMethod::Eigenvector)
            .unwrap();
        for w in &result.weights {
            assert!((w - 0.2).abs() < 1e-9);
        }
    }

    #[test]
    fn test_weight_config_composes_global_weights() {
        let engine = AhpEngine::default();
        let groups = [GEOMETRY, SURFACE];
        let criteria = engine
            .compute_weights(&[vec![1.0, 1.0 / 3.0], vec![3.0, 1.0]], WeightMethod::GeometricMean)
            .unwrap();
        let local = vec![
            engine
                .weigh(&standard_matrix(&GEOMETRY).unwrap(), WeightMethod::GeometricMean)
                .unwrap(),
            engine
                .weigh(&standard_matrix(&SURFACE).unwrap(), WeightMethod::GeometricMean)
                .unwrap(),
        ];

        let config = weight_config(&groups, &criteria, &local).unwrap();
        assert_eq!(config.feature_count(), 9);
        assert!((config.total_weight() - 1.0).abs() < 1e-9);
        assert!((config.get_feature("length").unwrap().weight - 0.25 * 0.2).abs() < 1e-9);
        assert_eq!(config.get_feature("surface_defects").unwrap().kind, FeatureKind::Categorical);
    }

    #[test]
    fn test_weight_config_dimension_mismatch() {
        let engine = AhpEngine::default();
        let criteria = engine
            .weigh(&JudgmentMatrix::equal_importance(2).unwrap(), WeightMethod::GeometricMean)
            .unwrap();
        let local = vec![engine
            .weigh(&standard_matrix(&GEOMETRY).unwrap(), WeightMethod::GeometricMean)
            .unwrap()];
        assert!(weight_config(&[GEOMETRY, SURFACE], &criteria, &local).is_err());
    }

    #[test]
    fn test_review_flags_heavy_geometry() {
        let weights = HashMap::from([
            ("length".to_string(), 0.3),
            ("diameter".to_string(), 0.3),
            ("surface_roughness".to_string(), 0.4),
        ]);
        let review = review_weights(&weights);
        assert!(!review.is_valid);
        assert_eq!(review.warnings.len(), 1);
        assert_eq!(review.suggestions.len(), 1);
    }

    #[test]
    fn test_review_flags_light_surface() {
        let weights = HashMap::from([
            ("length".to_string(), 0.1),
            ("surface_finish".to_string(), 0.1),
        ]);
        let review = review_weights(&weights);
        assert!(!review.is_valid);
        assert!(review.warnings[0].contains("Surface quality"));
    }

    #[test]
    fn test_review_accepts_balanced_weights() {
        let weights = HashMap::from([
            ("length".to_string(), 0.2),
            ("surface_roughness".to_string(), 0.5),
            ("hardness".to_string(), 0.3),
        ]);
        assert!(review_weights(&weights).is_valid);
    }
}
