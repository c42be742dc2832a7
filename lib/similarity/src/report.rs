//! Match reports
//!
//! Summarizes a ranking pass for a process engineer: how many cases matched,
//! which ones to look at first and which features drove the result.

use crate::matcher::{RankedMatches, SimilarityResult};
use ahash::AHashSet;
use finishcase_core::{CaseRecord, MatchContext};
use serde::Serialize;

const RECOMMENDATION_COUNT: usize = 3;
const REASON_COUNT: usize = 3;
const STRONG_FEATURE_SCORE: f64 = 0.8;
const WEAK_FEATURE_SCORE: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub summary: ReportSummary,
    pub recommendations: Vec<Recommendation>,
    pub analysis: FeatureAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Size of the case collection the pass ran against
    pub total_candidates: usize,
    pub matched_cases: usize,
    pub average_similarity: u8,
    pub top_similarity: u8,
    pub skipped_candidates: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub case_id: String,
    pub similarity: u8,
    pub reasons: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureAnalysis {
    /// Features scoring above 0.8 in any result
    pub strong_matches: Vec<String>,
    /// Features scoring below 0.3 in any result
    pub weak_matches: Vec<String>,
    /// Configured features the target has no value for
    pub missing_features: Vec<String>,
}

pub fn generate_match_report(
    ctx: &MatchContext,
    target: &CaseRecord,
    ranked: &RankedMatches,
) -> MatchReport {
    let results = &ranked.results;
    let matched_cases = results.len();

    let average_similarity = if matched_cases > 0 {
        let sum: f64 = results.iter().map(|r| f64::from(r.similarity)).sum();
        (sum / matched_cases as f64).round() as u8
    } else {
        0
    };
    let top_similarity = results.iter().map(|r| r.similarity).max().unwrap_or(0);

    let recommendations = results
        .iter()
        .take(RECOMMENDATION_COUNT)
        .map(|r| Recommendation {
            case_id: r.case_id.clone(),
            similarity: r.similarity,
            reasons: r.matched_features.iter().take(REASON_COUNT).cloned().collect(),
            suggestions: case_suggestions(r),
        })
        .collect();

    let missing_features = ctx
        .config()
        .map(|config| {
            config
                .features()
                .filter(|f| !target.has_feature(&f.key))
                .map(|f| f.key.clone())
                .collect()
        })
        .unwrap_or_default();

    MatchReport {
        summary: ReportSummary {
            total_candidates: ctx.case_count(),
            matched_cases,
            average_similarity,
            top_similarity,
            skipped_candidates: ranked.skipped_count(),
        },
        recommendations,
        analysis: FeatureAnalysis {
            strong_matches: features_where(results, |score| score > STRONG_FEATURE_SCORE),
            weak_matches: features_where(results, |score| score < WEAK_FEATURE_SCORE),
            missing_features,
        },
    }
}

/// Distinct feature keys whose score satisfies `keep` in any result, in
/// order of first appearance
fn features_where(results: &[SimilarityResult], keep: impl Fn(f64) -> bool) -> Vec<String> {
    let mut seen = AHashSet::new();
    results
        .iter()
        .flat_map(|r| r.details.feature_scores.iter())
        .filter(|&(key, score)| keep(score) && seen.insert(key))
        .map(|(key, _)| key.to_string())
        .collect()
}

fn case_suggestions(result: &SimilarityResult) -> Vec<String> {
    let mut suggestions: Vec<String> = match result.similarity {
        s if s > 90 => vec!["High confidence match; process parameters can be reused directly"],
        s if s > 80 => vec![
            "Good match; adjust process parameters as needed",
            "Verify the differences in key features",
        ],
        s if s > 70 => vec![
            "Partial match; analyze the differing features carefully",
            "Validate with a trial run",
        ],
        _ => Vec::new(),
    }
    .into_iter()
    .map(String::from)
    .collect();

    if result.matched_features.len() < 3 {
        suggestions.push("Few features matched; use this case with caution".to_string());
    }
    suggestions
}
