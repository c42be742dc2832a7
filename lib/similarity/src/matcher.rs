//! Case matcher
//!
//! Scores candidate cases against a target under the active feature weight
//! configuration and ranks them.

use crate::distance::{check_value, feature_similarity, ValueKindError};
use crate::error::{MatchError, Result};
use finishcase_core::{
    CaseRecord, FeatureImportance, FeatureWeight, FeatureWeightConfig, MatchContext,
};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use tracing::{debug, warn};

/// Per-feature similarity above which a feature counts as matched
pub const MATCHED_FEATURE_THRESHOLD: f64 = 0.7;

/// Filtering and truncation for a ranking pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOptions {
    /// Minimum public similarity (0-100) to keep a candidate
    pub min_similarity: u8,
    pub max_results: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            min_similarity: 70,
            max_results: 10,
        }
    }
}

/// Similarity of one candidate to the target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityResult {
    pub case_id: String,
    /// `round(normalized_score * 100)`
    pub similarity: u8,
    /// Labels of features with similarity above 0.7, in configuration order
    pub matched_features: Vec<String>,
    /// Sum of `similarity * weight` over configured features
    pub weighted_score: f64,
    pub details: SimilarityDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityDetails {
    /// Unweighted per-feature similarity keyed by feature key
    pub feature_scores: FeatureScores,
    pub normalized_score: f64,
}

/// Per-feature scores kept in configuration order
///
/// Serializes as a JSON object whose keys follow insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureScores(Vec<(String, f64)>);

impl FeatureScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the score for `key`, keeping its original position if present
    pub fn insert(&mut self, key: impl Into<String>, score: f64) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = score,
            None => self.0.push((key, score)),
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.iter().find(|(k, _)| k == key).map(|&(_, score)| score)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, score)| (k.as_str(), *score))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for FeatureScores {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut scores = Self::new();
        for (key, score) in iter {
            scores.insert(key, score);
        }
        scores
    }
}

impl Serialize for FeatureScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, score)| (k, score)))
    }
}

impl<'de> Deserialize<'de> for FeatureScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ScoresVisitor;

        impl<'de> Visitor<'de> for ScoresVisitor {
            type Value = FeatureScores;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of feature keys to scores")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<FeatureScores, A::Error> {
                let mut scores = FeatureScores::new();
                while let Some((key, score)) = map.next_entry::<String, f64>()? {
                    scores.insert(key, score);
                }
                Ok(scores)
            }
        }

        deserializer.deserialize_map(ScoresVisitor)
    }
}

/// A candidate that could not be scored
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedCandidate {
    pub case_id: String,
    pub reason: String,
}

/// Outcome of a ranking pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedMatches {
    /// Kept candidates, most similar first
    pub results: Vec<SimilarityResult>,
    /// Candidates scored or attempted, excluding the target itself
    pub candidates_considered: usize,
    pub skipped: Vec<SkippedCandidate>,
}

impl RankedMatches {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Score `candidate` against `target` under the context's configuration
pub fn calculate_similarity(
    ctx: &MatchContext,
    target: &CaseRecord,
    candidate: &CaseRecord,
) -> Result<SimilarityResult> {
    let config = active_config(ctx)?;
    score_pair(config, target, candidate)
}

/// The context's configuration, validated before any scoring
pub(crate) fn active_config(ctx: &MatchContext) -> Result<&FeatureWeightConfig> {
    let config = ctx.config().ok_or(MatchError::ConfigurationMissing)?;
    config.validate()?;
    Ok(config)
}

fn score_pair(
    config: &FeatureWeightConfig,
    target: &CaseRecord,
    candidate: &CaseRecord,
) -> Result<SimilarityResult> {
    let mut feature_scores = FeatureScores::new();
    let mut matched_features = Vec::new();
    let mut weighted_score = 0.0;
    let mut total_weight = 0.0;

    for feature in config.features() {
        let similarity = feature_similarity(
            target.feature(&feature.key),
            candidate.feature(&feature.key),
            feature.kind,
            feature.effective_scale(),
        )
        .map_err(|e| {
            // Blame whichever side holds the unreadable value
            let culprit = match target.feature(&feature.key) {
                Some(v) if check_value(v, feature.kind).is_err() => target,
                _ => candidate,
            };
            type_error(culprit, feature, e)
        })?;

        feature_scores.insert(feature.key.as_str(), similarity);
        if similarity > MATCHED_FEATURE_THRESHOLD {
            matched_features.push(feature.label.clone());
        }
        weighted_score += similarity * feature.weight;
        total_weight += feature.weight;
    }

    let normalized_score = if total_weight > 0.0 {
        weighted_score / total_weight
    } else {
        0.0
    };

    Ok(SimilarityResult {
        case_id: candidate.id.clone(),
        similarity: (normalized_score * 100.0).round().clamp(0.0, 100.0) as u8,
        matched_features,
        weighted_score,
        details: SimilarityDetails {
            feature_scores,
            normalized_score,
        },
    })
}

fn type_error(case: &CaseRecord, feature: &FeatureWeight, e: ValueKindError) -> MatchError {
    MatchError::FeatureType {
        case_id: case.id.clone(),
        feature: feature.key.clone(),
        expected: e.expected,
        found: e.found,
    }
}

/// Check the target's own values before ranking; an unreadable target value
/// would fail every candidate
fn check_target(config: &FeatureWeightConfig, target: &CaseRecord) -> Result<()> {
    for feature in config.features() {
        if let Some(value) = target.feature(&feature.key) {
            check_value(value, feature.kind).map_err(|e| MatchError::InvalidTarget {
                case_id: target.id.clone(),
                reason: type_error(target, feature, e).to_string(),
            })?;
        }
    }
    Ok(())
}

/// Rank the context's cases by similarity to `target`
///
/// The target is excluded by id. Candidates below `min_similarity` are
/// dropped; the rest are sorted by similarity, highest first, with ties kept
/// in collection order, and truncated to `max_results`. A candidate that
/// fails to score is logged and listed in `skipped`; it never aborts the pass.
pub fn find_similar_cases(
    ctx: &MatchContext,
    target: &CaseRecord,
    options: &MatchOptions,
) -> Result<RankedMatches> {
    let config = active_config(ctx)?;
    check_target(config, target)?;

    let mut ranked = RankedMatches::default();

    for candidate in ctx.cases() {
        if candidate.id == target.id {
            continue;
        }
        ranked.candidates_considered += 1;

        match score_pair(config, target, candidate) {
            Ok(result) if result.similarity >= options.min_similarity => {
                ranked.results.push(result)
            }
            Ok(_) => {}
            Err(e) => {
                warn!(
                    case_id = %candidate.id,
                    error = %e,
                    "skipping candidate that failed to score"
                );
                ranked.skipped.push(SkippedCandidate {
                    case_id: candidate.id.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    // Stable: equal similarities keep collection order
    ranked.results.sort_by(|a, b| b.similarity.cmp(&a.similarity));
    ranked.results.truncate(options.max_results);

    debug!(
        target_id = %target.id,
        considered = ranked.candidates_considered,
        kept = ranked.results.len(),
        skipped = ranked.skipped.len(),
        "ranking pass complete"
    );

    Ok(ranked)
}

/// Configured features ranked by weight, heaviest first
pub fn feature_importance(ctx: &MatchContext) -> Result<Vec<FeatureImportance>> {
    ctx.config()
        .map(FeatureWeightConfig::feature_importance)
        .ok_or(MatchError::ConfigurationMissing)
}
