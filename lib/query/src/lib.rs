//! # finishcase Query
//!
//! SQL synthesis for stores that keep the case collection in a relational
//! table. The in-memory matcher and these queries share the same weight
//! configuration; the store runs the scoring.
//!
//! Every generated statement is parameterized: target values, weights, the
//! threshold and the row limit travel in [`SqlQuery::params`], never in the
//! SQL text.
//!
//! ## Example
//!
//! ```rust
//! use finishcase_core::CaseRecord;
//! use finishcase_query::{build_query, FeatureConfig, QueryConfig, SqlValue};
//! use serde_json::json;
//!
//! let target = CaseRecord::from_features("new", json!({"grinding_speed": 120}));
//! let features = [FeatureConfig::numeric("grinding_speed", 1.0)];
//!
//! let query = build_query(&target, &features, &QueryConfig::default()).unwrap();
//! assert!(query.sql.contains("POWER((grinding_speed - ?), 2)"));
//! assert_eq!(query.params[1], SqlValue::Float(120.0));
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod schema;
pub mod sql;

pub use builder::{
    build_comprehensive_query, build_cosine_similarity_query, build_manhattan_distance_query,
    build_optimized_query, build_paginated_query, build_query, build_weighted_euclidean_query,
};
pub use config::{Algorithm, DataType, FeatureConfig, QueryConfig};
pub use error::{QueryError, Result};
pub use sql::{validate_identifier, SqlQuery, SqlValue};
