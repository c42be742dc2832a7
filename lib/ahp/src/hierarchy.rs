//! Multi-level composition
//!
//! A two-level hierarchy has criteria weights `c` and, for each criterion,
//! local weights `s[i]` over the same set of alternatives. The global weight
//! of alternative `j` is `Σ_i c[i] · s[i][j]`.

use crate::error::{AhpError, Result};

pub fn aggregate_hierarchy(criteria_weights: &[f64], sub_weights: &[Vec<f64>]) -> Result<Vec<f64>> {
    if criteria_weights.len() != sub_weights.len() {
        return Err(AhpError::DimensionMismatch(format!(
            "{} criteria weights but {} sub-criteria weight vectors",
            criteria_weights.len(),
            sub_weights.len()
        )));
    }

    let width = match sub_weights.first() {
        Some(first) => first.len(),
        None => return Ok(Vec::new()),
    };
    if let Some((i, row)) = sub_weights.iter().enumerate().find(|(_, r)| r.len() != width) {
        return Err(AhpError::DimensionMismatch(format!(
            "sub-criteria weight vector {} has {} entries, expected {}",
            i,
            row.len(),
            width
        )));
    }

    let global = (0..width)
        .map(|j| {
            criteria_weights
                .iter()
                .zip(sub_weights)
                .map(|(c, s)| c * s[j])
                .sum()
        })
        .collect();
    Ok(global)
}
