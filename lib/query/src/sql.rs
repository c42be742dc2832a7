//! Parameterized SQL
//!
//! Generated statements never contain target values as text. Every value is a
//! `?` placeholder in [`SqlQuery::sql`] with its value at the same position in
//! [`SqlQuery::params`], ready for a driver's prepared statement.

use crate::error::{QueryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A value bound to one `?` placeholder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl fmt::Display for SqlValue {
    /// SQL literal form, for logs and golden tests
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Int(v) => write!(f, "{}", v),
            SqlValue::Float(v) => write!(f, "{}", v),
            SqlValue::Text(v) => write!(f, "'{}'", v.replace('\\', "\\\\").replace('\'', "''")),
            SqlValue::Bool(true) => f.write_str("TRUE"),
            SqlValue::Bool(false) => f.write_str("FALSE"),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

/// A statement and the values for its placeholders, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl SqlQuery {
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }

    /// The statement with every placeholder replaced by its literal value
    ///
    /// Only for logging and comparing against known query text. Never send
    /// this to a database.
    pub fn to_inline_sql(&self) -> String {
        let mut params = self.params.iter().peekable();
        let mut out = String::with_capacity(self.sql.len() + self.params.len() * 4);
        for c in self.sql.chars() {
            match (c, params.next_if(|_| c == '?')) {
                (_, Some(value)) => out.push_str(&value.to_string()),
                (c, None) => out.push(c),
            }
        }
        out
    }
}

impl fmt::Display for SqlQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// SQL text under construction together with the values it binds
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Fragment {
    sql: String,
    params: Vec<SqlValue>,
}

impl Fragment {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn sql(&mut self, text: &str) -> &mut Self {
        self.sql.push_str(text);
        self
    }

    /// Append a placeholder bound to `value`
    pub(crate) fn bind(&mut self, value: impl Into<SqlValue>) -> &mut Self {
        self.sql.push('?');
        self.params.push(value.into());
        self
    }

    /// Append another fragment, copying its bound values
    pub(crate) fn append(&mut self, other: &Fragment) -> &mut Self {
        self.sql.push_str(&other.sql);
        self.params.extend(other.params.iter().cloned());
        self
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    pub(crate) fn join(parts: &[Fragment], separator: &str) -> Fragment {
        let mut joined = Fragment::new();
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                joined.sql(separator);
            }
            joined.append(part);
        }
        joined
    }

    pub(crate) fn build(self) -> SqlQuery {
        SqlQuery {
            sql: self.sql,
            params: self.params,
        }
    }
}

/// Accept `name` as a column name only if it matches `[A-Za-z_][A-Za-z0-9_]*`
pub fn validate_identifier(name: &str) -> Result<&str> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(name)
    } else {
        Err(QueryError::InvalidIdentifier(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_keeps_params_in_placeholder_order() {
        let mut inner = Fragment::new();
        inner.sql("a = ").bind(1i64);

        let mut outer = Fragment::new();
        outer
            .sql("(")
            .append(&inner)
            .sql(") OR b = ")
            .bind("x")
            .sql(" OR (")
            .append(&inner)
            .sql(")");
        let query = outer.build();

        assert_eq!(query.sql, "(a = ?) OR b = ? OR (a = ?)");
        assert_eq!(
            query.params,
            vec![SqlValue::Int(1), SqlValue::Text("x".into()), SqlValue::Int(1)]
        );
        assert_eq!(query.placeholder_count(), query.params.len());
    }

    #[test]
    fn test_join() {
        let parts: Vec<Fragment> = (0..3)
            .map(|i| {
                let mut f = Fragment::new();
                f.sql("c").bind(i as i64);
                f
            })
            .collect();
        let joined = Fragment::join(&parts, " + ");
        assert_eq!(joined.build().sql, "c? + c? + c?");
        assert!(Fragment::join(&[], ", ").is_empty());
    }

    #[test]
    fn test_inline_rendering() {
        let query = SqlQuery {
            sql: "SELECT ? , ?, ?, ?, ?".to_string(),
            params: vec![
                SqlValue::Float(2.0),
                SqlValue::Float(0.25),
                SqlValue::Text("O'Brien".into()),
                SqlValue::Bool(true),
                SqlValue::Int(-3),
            ],
        };
        assert_eq!(query.to_inline_sql(), "SELECT 2 , 0.25, 'O''Brien', TRUE, -3");
    }

    #[test]
    fn test_identifier_validation() {
        assert!(validate_identifier("surface_roughness").is_ok());
        assert!(validate_identifier("_x1").is_ok());
        for bad in ["", "1abc", "a-b", "a b", "x; DROP TABLE grinding_cases", "length'"] {
            assert_eq!(
                validate_identifier(bad),
                Err(QueryError::InvalidIdentifier(bad.to_string()))
            );
        }
    }
}
