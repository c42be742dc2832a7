//! Similarity query synthesis
//!
//! Each builder turns a target case, the weighted columns to compare and a
//! [`QueryConfig`] into one parameterized statement over the case table.
//! Column names come from configuration and are checked as identifiers;
//! weights, target values, the threshold and the row limit are all bound.

use crate::config::{Algorithm, DataType, FeatureConfig, QueryConfig};
use crate::error::{QueryError, Result};
use crate::schema::{
    CASE_TABLE, COMPOSITE_INDEX, COMPREHENSIVE_COLUMNS, EUCLIDEAN_COLUMNS, RESULT_COLUMNS,
};
use crate::sql::{validate_identifier, Fragment, SqlQuery, SqlValue};
use finishcase_core::CaseRecord;
use serde_json::Value;
use tracing::debug;

/// Relative half-width of the numeric pre-filter range
const PREFILTER_TOLERANCE: f64 = 0.5;
/// Pre-filters combined into the optimized query's coarse `OR` clause
const PREFILTER_LIMIT: usize = 2;

/// Target side of one weighted comparison
enum TargetValue {
    Number(f64),
    Scalar(SqlValue),
}

struct Term<'a> {
    key: &'a str,
    weight: f64,
    target: TargetValue,
}

impl Term<'_> {
    fn number(&self) -> Option<f64> {
        match self.target {
            TargetValue::Number(v) => Some(v),
            TargetValue::Scalar(_) => None,
        }
    }
}

/// Features the target has a value for, with that value read per data type
fn collect_terms<'a>(
    target: &CaseRecord,
    features: &'a [FeatureConfig],
    numeric_only: bool,
) -> Result<Vec<Term<'a>>> {
    let mut terms = Vec::new();
    for feature in features {
        let key = validate_identifier(&feature.key)?;
        if !feature.weight.is_finite() || feature.weight < 0.0 {
            return Err(QueryError::InvalidWeight {
                feature: key.to_string(),
                weight: feature.weight,
            });
        }
        if numeric_only && feature.data_type != DataType::Numeric {
            continue;
        }
        let Some(value) = target.feature(key) else {
            continue;
        };
        let target = match feature.data_type {
            DataType::Numeric => TargetValue::Number(read_number(value).ok_or_else(|| {
                QueryError::NonNumericTarget {
                    feature: key.to_string(),
                }
            })?),
            DataType::Categorical => TargetValue::Scalar(read_scalar(value).ok_or_else(|| {
                QueryError::UnsupportedValue {
                    feature: key.to_string(),
                }
            })?),
        };
        terms.push(Term {
            key,
            weight: feature.weight,
            target,
        });
    }
    Ok(terms)
}

fn read_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn read_scalar(value: &Value) -> Option<SqlValue> {
    match value {
        Value::String(s) => Some(SqlValue::Text(s.clone())),
        Value::Bool(b) => Some(SqlValue::Bool(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(SqlValue::Int)
            .or_else(|| n.as_f64().map(SqlValue::Float)),
        _ => None,
    }
}

fn numeric_terms<'a>(
    target: &CaseRecord,
    features: &'a [FeatureConfig],
    algorithm: Algorithm,
) -> Result<Vec<Term<'a>>> {
    let terms = collect_terms(target, features, true)?;
    if terms.is_empty() {
        return Err(QueryError::NoNumericFeatures { algorithm });
    }
    Ok(terms)
}

fn not_null(terms: &[Term<'_>]) -> String {
    terms
        .iter()
        .map(|t| format!("{} IS NOT NULL", t.key))
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// `GREATEST(0, 100 - SQRT(Σ w * POWER((key - t), 2)) * 10)`, with
/// categorical terms contributing `w * CASE WHEN key = t THEN 0 ELSE 1 END`
fn euclidean_score(terms: &[Term<'_>]) -> Fragment {
    let parts: Vec<Fragment> = terms
        .iter()
        .map(|t| {
            let mut f = Fragment::new();
            f.bind(t.weight);
            match &t.target {
                TargetValue::Number(v) => f
                    .sql(" * POWER((")
                    .sql(t.key)
                    .sql(" - ")
                    .bind(*v)
                    .sql("), 2)"),
                TargetValue::Scalar(v) => f
                    .sql(" * CASE WHEN ")
                    .sql(t.key)
                    .sql(" = ")
                    .bind(v.clone())
                    .sql(" THEN 0 ELSE 1 END"),
            };
            f
        })
        .collect();

    let mut score = Fragment::new();
    score
        .sql("GREATEST(0, 100 - SQRT(")
        .append(&Fragment::join(&parts, " + "))
        .sql(") * 10)");
    score
}

/// Dot product and both norms of the weighted vectors
struct CosineParts {
    dot: Fragment,
    target_norm: Fragment,
    case_norm: Fragment,
}

fn cosine_parts(terms: &[Term<'_>]) -> CosineParts {
    let mut dot = Vec::new();
    let mut target_norm = Vec::new();
    let mut case_norm = Vec::new();

    for t in terms {
        let Some(v) = t.number() else { continue };
        let mut weighted_case = Fragment::new();
        weighted_case.bind(t.weight).sql(" * ").sql(t.key);
        let mut weighted_target = Fragment::new();
        weighted_target.bind(t.weight).sql(" * ").bind(v);

        let mut d = Fragment::new();
        d.sql("(").append(&weighted_case).sql(") * (").append(&weighted_target).sql(")");
        dot.push(d);

        let mut tn = Fragment::new();
        tn.sql("POWER(").append(&weighted_target).sql(", 2)");
        target_norm.push(tn);

        let mut cn = Fragment::new();
        cn.sql("POWER(").append(&weighted_case).sql(", 2)");
        case_norm.push(cn);
    }

    CosineParts {
        dot: Fragment::join(&dot, " + "),
        target_norm: Fragment::join(&target_norm, " + "),
        case_norm: Fragment::join(&case_norm, " + "),
    }
}

/// `(dot) / (SQRT(targetNorm) * SQRT(caseNorm)) * 100`
fn cosine_score(parts: &CosineParts) -> Fragment {
    let mut score = Fragment::new();
    score
        .sql("(")
        .append(&parts.dot)
        .sql(") / (SQRT(")
        .append(&parts.target_norm)
        .sql(") * SQRT(")
        .append(&parts.case_norm)
        .sql(")) * 100");
    score
}

fn weighted_target_norm(terms: &[Term<'_>]) -> f64 {
    terms
        .iter()
        .filter_map(|t| t.number().map(|v| (t.weight * v).powi(2)))
        .sum()
}

/// `GREATEST(0, 100 - (Σ w * ABS(key - t)) / N)`
fn manhattan_score(terms: &[Term<'_>]) -> Fragment {
    let parts: Vec<Fragment> = terms
        .iter()
        .filter_map(|t| {
            let v = t.number()?;
            let mut f = Fragment::new();
            f.bind(t.weight).sql(" * ABS(").sql(t.key).sql(" - ").bind(v).sql(")");
            Some(f)
        })
        .collect();

    let mut score = Fragment::new();
    score
        .sql("GREATEST(0, 100 - (")
        .append(&Fragment::join(&parts, " + "))
        // N is the term count; it shapes the formula and is not a target value
        .sql(&format!(") / {})", parts.len()));
    score
}

fn threshold_and_limit(query: &mut Fragment, filter: &str, config: &QueryConfig) {
    query
        .sql(filter)
        .sql(" similarity_score >= ")
        .bind(config.threshold)
        .sql(" ORDER BY similarity_score DESC LIMIT ")
        .bind(i64::from(config.max_results));
}

fn finish(query: Fragment, algorithm: &str, terms: usize) -> SqlQuery {
    let query = query.build();
    debug!(
        algorithm,
        terms,
        params = query.params.len(),
        "similarity query built"
    );
    query
}

/// Extra clauses for the optimized variant of the euclidean query
#[derive(Default)]
struct Shortcuts {
    index_hint: bool,
    prefilter: Fragment,
}

fn euclidean_query(
    target: &CaseRecord,
    features: &[FeatureConfig],
    config: &QueryConfig,
    shortcuts: impl FnOnce(&[Term<'_>]) -> Shortcuts,
) -> Result<(Fragment, usize)> {
    let terms = collect_terms(target, features, false)?;
    if terms.is_empty() {
        return Err(QueryError::NoScorableFeatures);
    }
    let shortcuts = shortcuts(&terms);

    let mut query = Fragment::new();
    query
        .sql("SELECT ")
        .sql(EUCLIDEAN_COLUMNS)
        .sql(", ")
        .append(&euclidean_score(&terms))
        .sql(" AS similarity_score FROM ")
        .sql(CASE_TABLE);
    if shortcuts.index_hint {
        query.sql(&format!(" /*+ USE_INDEX({}, {}) */", CASE_TABLE, COMPOSITE_INDEX));
    }
    query.sql(" WHERE ");
    if !shortcuts.prefilter.is_empty() {
        query.sql("(").append(&shortcuts.prefilter).sql(") AND ");
    }
    query.sql(&not_null(&terms));
    threshold_and_limit(&mut query, " HAVING", config);

    Ok((query, terms.len()))
}

/// Weighted euclidean distance over numeric and categorical features
pub fn build_weighted_euclidean_query(
    target: &CaseRecord,
    features: &[FeatureConfig],
    config: &QueryConfig,
) -> Result<SqlQuery> {
    let (query, terms) = euclidean_query(target, features, config, |_| Shortcuts::default())?;
    Ok(finish(query, Algorithm::WeightedEuclidean.as_str(), terms))
}

/// Cosine similarity of the weighted numeric vectors
pub fn build_cosine_similarity_query(
    target: &CaseRecord,
    features: &[FeatureConfig],
    config: &QueryConfig,
) -> Result<SqlQuery> {
    let terms = numeric_terms(target, features, Algorithm::Cosine)?;
    if weighted_target_norm(&terms) == 0.0 {
        return Err(QueryError::ZeroTargetNorm);
    }
    let parts = cosine_parts(&terms);
    let conditions = terms
        .iter()
        .map(|t| format!("{key} IS NOT NULL AND {key} > 0", key = t.key))
        .collect::<Vec<_>>()
        .join(" AND ");

    let mut query = Fragment::new();
    query
        .sql("WITH normalized_features AS (SELECT *, ")
        .append(&cosine_score(&parts))
        .sql(" AS similarity_score FROM ")
        .sql(CASE_TABLE)
        .sql(" WHERE ")
        .sql(&conditions)
        .sql(" AND SQRT(")
        .append(&parts.case_norm)
        .sql(") > 0) SELECT ")
        .sql(RESULT_COLUMNS)
        .sql(", COALESCE(similarity_score, 0) AS similarity_score FROM normalized_features");
    threshold_and_limit(&mut query, " WHERE", config);

    Ok(finish(query, Algorithm::Cosine.as_str(), terms.len()))
}

/// Weighted manhattan distance over numeric features
pub fn build_manhattan_distance_query(
    target: &CaseRecord,
    features: &[FeatureConfig],
    config: &QueryConfig,
) -> Result<SqlQuery> {
    let terms = numeric_terms(target, features, Algorithm::Manhattan)?;

    let mut query = Fragment::new();
    query
        .sql("SELECT ")
        .sql(RESULT_COLUMNS)
        .sql(", ")
        .append(&manhattan_score(&terms))
        .sql(" AS similarity_score FROM ")
        .sql(CASE_TABLE)
        .sql(" WHERE ")
        .sql(&not_null(&terms));
    threshold_and_limit(&mut query, " HAVING", config);

    Ok(finish(query, Algorithm::Manhattan.as_str(), terms.len()))
}

/// Blend of the three numeric scores, each also returned as its own column
///
/// A row whose weighted vector has zero norm gets a cosine score of 0.
pub fn build_comprehensive_query(
    target: &CaseRecord,
    features: &[FeatureConfig],
    config: &QueryConfig,
) -> Result<SqlQuery> {
    let terms = numeric_terms(target, features, Algorithm::Comprehensive)?;

    let euclidean = euclidean_score(&terms);
    let mut cosine = Fragment::new();
    cosine.sql("COALESCE(").append(&cosine_score(&cosine_parts(&terms))).sql(", 0)");
    let manhattan = manhattan_score(&terms);

    let mut query = Fragment::new();
    query
        .sql("SELECT ")
        .sql(COMPREHENSIVE_COLUMNS)
        .sql(", (0.4 * (")
        .append(&euclidean)
        .sql(") + 0.3 * (")
        .append(&cosine)
        .sql(") + 0.3 * (")
        .append(&manhattan)
        .sql(")) AS similarity_score, (")
        .append(&euclidean)
        .sql(") AS euclidean_score, (")
        .append(&cosine)
        .sql(") AS cosine_score, (")
        .append(&manhattan)
        .sql(") AS manhattan_score FROM ")
        .sql(CASE_TABLE)
        .sql(" WHERE ")
        .sql(&not_null(&terms))
        .sql(" AND material_type IS NOT NULL");
    threshold_and_limit(&mut query, " HAVING", config);

    Ok(finish(query, Algorithm::Comprehensive.as_str(), terms.len()))
}

/// Wrap `base` with a total row count and a page window
///
/// Pages start at 1; the window skips `(page - 1) * page_size` rows.
pub fn build_paginated_query(base: &SqlQuery, page: u64, page_size: u64) -> Result<SqlQuery> {
    let invalid = || QueryError::InvalidPage { page, page_size };
    if page == 0 || page_size == 0 {
        return Err(invalid());
    }
    let offset = (page - 1).checked_mul(page_size).ok_or_else(invalid)?;
    let limit = i64::try_from(page_size).map_err(|_| invalid())?;
    let offset = i64::try_from(offset).map_err(|_| invalid())?;

    let mut params = base.params.clone();
    params.push(SqlValue::Int(limit));
    params.push(SqlValue::Int(offset));

    Ok(SqlQuery {
        sql: format!(
            "WITH paginated_results AS ({}), total_count AS (SELECT COUNT(*) AS total FROM paginated_results) \
             SELECT pr.*, tc.total FROM paginated_results pr CROSS JOIN total_count tc LIMIT ? OFFSET ?",
            base.sql
        ),
        params,
    })
}

/// Weighted euclidean query narrowed by a coarse pre-filter
///
/// Numeric features keep rows within ±50% of the target value, categorical
/// features keep exact matches. The first two such conditions are OR-ed and
/// placed ahead of the null checks, and the composite index is hinted.
pub fn build_optimized_query(
    target: &CaseRecord,
    features: &[FeatureConfig],
    config: &QueryConfig,
) -> Result<SqlQuery> {
    let (query, terms) = euclidean_query(target, features, config, |terms| {
        let filters: Vec<Fragment> = terms
            .iter()
            .take(PREFILTER_LIMIT)
            .map(|t| {
                let mut f = Fragment::new();
                match &t.target {
                    TargetValue::Number(v) => {
                        let tolerance = v.abs() * PREFILTER_TOLERANCE;
                        f.sql(t.key)
                            .sql(" BETWEEN ")
                            .bind(v - tolerance)
                            .sql(" AND ")
                            .bind(v + tolerance)
                    }
                    TargetValue::Scalar(v) => f.sql(t.key).sql(" = ").bind(v.clone()),
                };
                f
            })
            .collect();
        Shortcuts {
            index_hint: true,
            prefilter: Fragment::join(&filters, " OR "),
        }
    })?;
    Ok(finish(query, "optimized", terms))
}

/// Build the query for `config.algorithm`
pub fn build_query(
    target: &CaseRecord,
    features: &[FeatureConfig],
    config: &QueryConfig,
) -> Result<SqlQuery> {
    match config.algorithm {
        Algorithm::WeightedEuclidean => build_weighted_euclidean_query(target, features, config),
        Algorithm::Cosine => build_cosine_similarity_query(target, features, config),
        Algorithm::Manhattan => build_manhattan_distance_query(target, features, config),
        Algorithm::Comprehensive => build_comprehensive_query(target, features, config),
    }
}
