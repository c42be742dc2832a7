//! # finishcase Core
//!
//! Shared data model for the finishcase engine.
//!
//! - [`FeatureWeightConfig`] - grouped feature weights with declared comparison kinds
//! - [`CaseRecord`] - a recorded finishing job with its feature values
//! - [`MatchContext`] - immutable configuration and case snapshot for one matching pass
//! - [`ContextStore`] - swaps whole snapshots so in-flight passes never see partial updates
//!
//! ## Example
//!
//! ```rust
//! use finishcase_core::{CaseRecord, FeatureGroup, FeatureWeight, FeatureWeightConfig, MatchContext};
//! use serde_json::json;
//!
//! let config = FeatureWeightConfig::new(vec![FeatureGroup::new(
//!     "geometry",
//!     vec![FeatureWeight::numeric("length", "Length", 1.0)],
//! )]);
//! let cases = vec![CaseRecord::from_features("case-1", json!({"length": 42.0}))];
//!
//! let ctx = MatchContext::new(config, cases);
//! assert_eq!(ctx.case_count(), 1);
//! ```

pub mod case;
pub mod config;
pub mod context;
pub mod error;

pub use case::{CaseMetadata, CaseRecord};
pub use config::{
    FeatureGroup, FeatureImportance, FeatureKind, FeatureWeight, FeatureWeightConfig,
    DEFAULT_NUMERIC_SCALE,
};
pub use context::{ContextStore, MatchContext};
pub use error::{Error, Result};
