//! Cell-by-cell comparison of a reconstructed field against a reference.

use crate::error::Result;
use mesh_common::{GridField, MeshError};
use serde::{Deserialize, Serialize};

/// Summary error statistics over cells where both fields are finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonStats {
    /// Number of comparable cells
    pub count: usize,
    /// Mean absolute error, NaN when `count == 0`
    pub mae: f64,
    /// Root-mean-square error, NaN when `count == 0`
    pub rmse: f64,
    /// Pearson correlation, NaN when `count < 2` or either side is constant
    pub correlation: f64,
}

#[derive(Debug, Clone)]
pub struct Comparison {
    /// `reconstructed - reference` where both are finite, else NaN
    pub error_field: GridField,
    pub stats: ComparisonStats,
}

/// Compare two aligned fields. Differing shapes are a structural error.
pub fn compare_fields(reference: &GridField, reconstructed: &GridField) -> Result<Comparison> {
    if reference.shape() != reconstructed.shape() {
        return Err(MeshError::ShapeMismatch {
            expected_rows: reference.rows(),
            expected_cols: reference.cols(),
            rows: reconstructed.rows(),
            cols: reconstructed.cols(),
        }
        .into());
    }

    let mut errors = Vec::with_capacity(reference.len());
    let mut pairs = Vec::new();
    for (&r, &c) in reference.data().iter().zip(reconstructed.data()) {
        if r.is_finite() && c.is_finite() {
            errors.push(c - r);
            pairs.push((r, c));
        } else {
            errors.push(f64::NAN);
        }
    }

    let error_field = GridField::new(reference.rows(), reference.cols(), errors)?;
    Ok(Comparison {
        error_field,
        stats: summarize(&pairs),
    })
}

fn summarize(pairs: &[(f64, f64)]) -> ComparisonStats {
    let count = pairs.len();
    if count == 0 {
        return ComparisonStats {
            count,
            mae: f64::NAN,
            rmse: f64::NAN,
            correlation: f64::NAN,
        };
    }

    let n = count as f64;
    let mae = pairs.iter().map(|(r, c)| (c - r).abs()).sum::<f64>() / n;
    let rmse = (pairs.iter().map(|(r, c)| (c - r).powi(2)).sum::<f64>() / n).sqrt();

    ComparisonStats {
        count,
        mae,
        rmse,
        correlation: pearson(pairs),
    }
}

fn pearson(pairs: &[(f64, f64)]) -> f64 {
    if pairs.len() < 2 {
        return f64::NAN;
    }
    let n = pairs.len() as f64;
    let mean_r = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_c = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_r, mut var_c) = (0.0, 0.0, 0.0);
    for (r, c) in pairs {
        let (dr, dc) = (r - mean_r, c - mean_c);
        cov += dr * dc;
        var_r += dr * dr;
        var_c += dc * dc;
    }

    if var_r == 0.0 || var_c == 0.0 {
        return f64::NAN;
    }
    cov / (var_r.sqrt() * var_c.sqrt())
}
