//! # finishcase
//!
//! Case-based reasoning for surface-finishing (barrel and tumbling) process
//! records.
//!
//! An engineer describes a new workpiece; finishcase finds the recorded jobs
//! most like it so their process parameters can be reused. How much each
//! feature matters is elicited from experts with the Analytic Hierarchy
//! Process.
//!
//! ## Quick Start
//!
//! ```rust
//! use finishcase::prelude::*;
//! use serde_json::json;
//!
//! // Experts judge roughness 3x as important as length
//! let engine = AhpEngine::default();
//! let criteria = engine
//!     .compute_weights(&[vec![1.0, 1.0 / 3.0], vec![3.0, 1.0]], WeightMethod::GeometricMean)
//!     .unwrap();
//!
//! let config = FeatureWeightConfig::new(vec![FeatureGroup::new(
//!     "workpiece",
//!     vec![
//!         FeatureWeight::numeric("length", "Length", criteria.weights[0]),
//!         FeatureWeight::numeric("surface_roughness", "Surface roughness", criteria.weights[1]),
//!     ],
//! )]);
//!
//! let store = ContextStore::new(MatchContext::new(
//!     config,
//!     vec![
//!         CaseRecord::from_features("job-17", json!({"length": 42.0, "surface_roughness": 1.6})),
//!         CaseRecord::from_features("job-23", json!({"length": 90.0, "surface_roughness": 6.3})),
//!     ],
//! ));
//!
//! let target = CaseRecord::from_features("new", json!({"length": 40.0, "surface_roughness": 1.6}));
//! let ranked = find_similar_cases(&store.snapshot(), &target, &MatchOptions::default()).unwrap();
//! assert_eq!(ranked.results[0].case_id, "job-17");
//! ```
//!
//! ## Crate Structure
//!
//! - [`finishcase-core`](finishcase_core) - weight configuration, case records, matching snapshots
//! - [`finishcase-ahp`](finishcase_ahp) - judgment matrices, weights, consistency checks, presets
//! - [`finishcase-similarity`](finishcase_similarity) - case matching, batch matching, reports, export
//! - [`finishcase-query`](finishcase_query) - parameterized SQL for table-backed case stores

use thiserror::Error;

pub use finishcase_ahp as ahp;
pub use finishcase_query as query;
pub use finishcase_similarity as similarity;

pub use finishcase_ahp::{
    AhpEngine, AhpError, AhpOptions, JudgmentMatrix, WeightMethod, WeightResult,
};
pub use finishcase_core::{
    CaseMetadata, CaseRecord, ContextStore, FeatureGroup, FeatureKind, FeatureWeight,
    FeatureWeightConfig, MatchContext,
};
pub use finishcase_query::{build_query, FeatureConfig, QueryConfig, QueryError, SqlQuery, SqlValue};
pub use finishcase_similarity::{
    batch_match, calculate_similarity, export_results, find_similar_cases, generate_match_report,
    BatchOptions, ExportFormat, MatchError, MatchOptions, MatchReport, RankedMatches,
    SimilarityResult,
};

/// Any error raised by the finishcase crates
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] finishcase_core::Error),

    #[error(transparent)]
    Ahp(#[from] AhpError),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        batch_match, build_query, calculate_similarity, export_results, find_similar_cases,
        generate_match_report, AhpEngine, AhpOptions, BatchOptions, CaseMetadata, CaseRecord,
        ContextStore, Error, ExportFormat, FeatureConfig, FeatureGroup, FeatureKind,
        FeatureWeight, FeatureWeightConfig, JudgmentMatrix, MatchContext, MatchOptions,
        MatchReport, QueryConfig, RankedMatches, Result, SimilarityResult, SqlQuery, SqlValue,
        WeightMethod, WeightResult,
    };
}
