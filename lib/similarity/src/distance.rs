//! Per-feature similarity functions
//!
//! Every function returns a similarity in [0.0, 1.0] where 1.0 means identical.
//! The comparison rule comes from the feature's declared [`FeatureKind`], never
//! from the runtime type of the values.

use finishcase_core::FeatureKind;
use serde_json::Value;

/// A value whose JSON type cannot be read as the declared feature kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueKindError {
    pub expected: FeatureKind,
    pub found: &'static str,
}

/// Similarity of two optional feature values
///
/// An absent value on either side scores 0, so missing data lowers the
/// aggregate instead of being ignored.
pub fn feature_similarity(
    a: Option<&Value>,
    b: Option<&Value>,
    kind: FeatureKind,
    scale: f64,
) -> Result<f64, ValueKindError> {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        _ => return Ok(0.0),
    };

    match kind {
        FeatureKind::Numeric => Ok(numeric_similarity(
            read_number(a)?,
            read_number(b)?,
            scale,
        )),
        FeatureKind::Categorical => {
            check_scalar(a)?;
            check_scalar(b)?;
            Ok(categorical_similarity(a, b))
        }
        FeatureKind::Boolean => Ok(boolean_similarity(read_bool(a)?, read_bool(b)?)),
    }
}

/// `max(0, 1 - |a - b| / max(a, b, scale))`
///
/// `scale` is a floor on the denominator so that small values close to each
/// other in absolute terms are not judged far apart.
pub fn numeric_similarity(a: f64, b: f64, scale: f64) -> f64 {
    let denominator = a.max(b).max(scale);
    (1.0 - (a - b).abs() / denominator).max(0.0)
}

/// Exact match: 1 if equal, 0 otherwise
///
/// Numbers compare by value (`5` equals `5.0`); strings are case sensitive;
/// values of different JSON types never match.
pub fn categorical_similarity(a: &Value, b: &Value) -> f64 {
    let equal = match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    };
    if equal { 1.0 } else { 0.0 }
}

pub fn boolean_similarity(a: bool, b: bool) -> f64 {
    if a == b { 1.0 } else { 0.0 }
}

/// Check that `value` can be compared under `kind`
pub fn check_value(value: &Value, kind: FeatureKind) -> Result<(), ValueKindError> {
    match kind {
        FeatureKind::Numeric => read_number(value).map(|_| ()),
        FeatureKind::Categorical => check_scalar(value),
        FeatureKind::Boolean => read_bool(value).map(|_| ()),
    }
}

/// Numbers, and strings that parse as finite numbers
fn read_number(value: &Value) -> Result<f64, ValueKindError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    };
    parsed.ok_or(ValueKindError {
        expected: FeatureKind::Numeric,
        found: json_type(value),
    })
}

fn read_bool(value: &Value) -> Result<bool, ValueKindError> {
    value.as_bool().ok_or(ValueKindError {
        expected: FeatureKind::Boolean,
        found: json_type(value),
    })
}

fn check_scalar(value: &Value) -> Result<(), ValueKindError> {
    match value {
        Value::Array(_) | Value::Object(_) => Err(ValueKindError {
            expected: FeatureKind::Categorical,
            found: json_type(value),
        }),
        _ => Ok(()),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
