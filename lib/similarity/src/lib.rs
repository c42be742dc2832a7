//! # finishcase Similarity
//!
//! Case-based matching of finishing jobs.
//!
//! Given a target case and a [`MatchContext`](finishcase_core::MatchContext)
//! snapshot, the matcher scores every stored case feature by feature, weighs
//! the scores by the configured feature weights and ranks the candidates.
//!
//! ## Features
//!
//! - **Declared comparison kinds**: numeric, categorical and boolean features
//!   compare by their configured kind, not by the runtime value type
//! - **Fault isolation**: a candidate that cannot be scored is skipped and
//!   reported, the ranking still completes
//! - **Batch matching**: one task per target on a bounded worker pool, with an
//!   optional overall deadline
//! - **Reports and export**: engineer-facing summaries, JSON and CSV output
//!
//! ## Example
//!
//! ```rust
//! use finishcase_core::{CaseRecord, FeatureGroup, FeatureWeight, FeatureWeightConfig, MatchContext};
//! use finishcase_similarity::{find_similar_cases, MatchOptions};
//! use serde_json::json;
//!
//! let config = FeatureWeightConfig::new(vec![FeatureGroup::new(
//!     "surface",
//!     vec![
//!         FeatureWeight::numeric("surface_roughness", "Surface roughness", 0.7),
//!         FeatureWeight::categorical("material_type", "Material type", 0.3),
//!     ],
//! )]);
//! let cases = vec![
//!     CaseRecord::from_features("case-1", json!({"surface_roughness": 1.6, "material_type": "steel"})),
//!     CaseRecord::from_features("case-2", json!({"surface_roughness": 3.2, "material_type": "brass"})),
//! ];
//! let ctx = MatchContext::new(config, cases);
//!
//! let target = CaseRecord::from_features("new", json!({"surface_roughness": 1.6, "material_type": "steel"}));
//! let ranked = find_similar_cases(&ctx, &target, &MatchOptions::default()).unwrap();
//! assert_eq!(ranked.results[0].case_id, "case-1");
//! assert_eq!(ranked.results[0].similarity, 100);
//! ```

pub mod batch;
pub mod distance;
pub mod error;
pub mod export;
pub mod matcher;
pub mod report;

pub use batch::{batch_match, BatchOptions, BatchResults};
pub use distance::{
    boolean_similarity, categorical_similarity, feature_similarity, numeric_similarity,
    ValueKindError,
};
pub use error::{MatchError, Result};
pub use export::{export_results, ExportFormat};
pub use matcher::{
    calculate_similarity, feature_importance, find_similar_cases, FeatureScores, MatchOptions,
    RankedMatches, SimilarityDetails, SimilarityResult, SkippedCandidate,
    MATCHED_FEATURE_THRESHOLD,
};
pub use report::{
    generate_match_report, FeatureAnalysis, MatchReport, Recommendation, ReportSummary,
};
