//! Structural agreement between a triangle listing and a value file.
//!
//! No geometry is involved: the check compares facet layouts and counts so
//! that a pipeline is never started with files that do not belong together.

use crate::scalar_values::read_scalar_values;
use crate::triangle_list::read_facet_sizes;
use crate::FormatResult;
use mesh_common::FacetGrouping;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Summary statistics of a value array. Every float is NaN when it is empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Share of values exactly equal to zero, in percent
    pub percent_zero: f64,
}

impl ValueStats {
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                count: 0,
                min: f64::NAN,
                max: f64::NAN,
                mean: f64::NAN,
                percent_zero: f64::NAN,
            };
        }

        let n = values.len() as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / n;
        let zeros = values.iter().filter(|v| **v == 0.0).count();

        Self {
            count: values.len(),
            min,
            max,
            mean,
            percent_zero: zeros as f64 * 100.0 / n,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    /// Same number of facets with the same sizes, in order
    pub facets_match: bool,
    /// Triangle total equals the number of values
    pub counts_match: bool,
    pub cir_facets: usize,
    pub val_facets: usize,
    pub cir_triangles: usize,
    pub val_values: usize,
    pub stats: ValueStats,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.facets_match && self.counts_match
    }
}

/// Compare the facet layout of a triangle listing with that of a value file.
pub fn check_consistency(
    cir_facets: &FacetGrouping,
    val_facets: &FacetGrouping,
    values: &[f64],
) -> ConsistencyReport {
    let report = ConsistencyReport {
        facets_match: cir_facets.ensure_matches(val_facets).is_ok(),
        counts_match: cir_facets.triangle_count() == values.len(),
        cir_facets: cir_facets.facet_count(),
        val_facets: val_facets.facet_count(),
        cir_triangles: cir_facets.triangle_count(),
        val_values: values.len(),
        stats: ValueStats::from_values(values),
    };

    if report.is_consistent() {
        info!(
            facets = report.cir_facets,
            triangles = report.cir_triangles,
            "Triangle list and values agree"
        );
    } else {
        warn!(
            cir_facets = report.cir_facets,
            val_facets = report.val_facets,
            cir_triangles = report.cir_triangles,
            val_values = report.val_values,
            "Triangle list and values disagree"
        );
    }

    report
}

/// Check a `.cir` file against a `.val` file.
pub fn check_files(cir_path: impl AsRef<Path>, val_path: impl AsRef<Path>) -> FormatResult<ConsistencyReport> {
    let cir = read_facet_sizes(cir_path)?;
    let (val, values) = read_scalar_values(val_path)?;
    Ok(check_consistency(&cir, &val, &values))
}
