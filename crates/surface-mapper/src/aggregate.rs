//! Value transfer through the correspondence.
//!
//! Both directions share one reduction: pairs with a non-finite value are
//! dropped, the rest are averaged (optionally weighted by intersection
//! area), and an empty result is `NaN` rather than zero.

use crate::correspondence::{PixelTriangleMap, TrianglePixelMap};
use crate::error::{MappingError, Result};
use mesh_common::{GridField, MeshError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How overlapping values are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMode {
    /// Arithmetic mean of the contributing values
    #[default]
    Mean,
    /// Mean weighted by intersection area
    AreaWeighted,
}

impl AggregationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationMode::Mean => "mean",
            AggregationMode::AreaWeighted => "area_weighted",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mean" => Some(AggregationMode::Mean),
            "area_weighted" | "weighted" => Some(AggregationMode::AreaWeighted),
            _ => None,
        }
    }

    /// Reduce `(value, area)` pairs.
    ///
    /// Returns `NaN` when no finite value remains, and in weighted mode when
    /// the remaining areas sum to zero.
    pub fn reduce<I>(&self, pairs: I) -> f64
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut sum = 0.0;
        let mut weight = 0.0;
        let mut count = 0usize;

        for (value, area) in pairs {
            if !value.is_finite() {
                continue;
            }
            match self {
                AggregationMode::Mean => sum += value,
                AggregationMode::AreaWeighted => {
                    sum += value * area;
                    weight += area;
                }
            }
            count += 1;
        }

        match self {
            _ if count == 0 => f64::NAN,
            AggregationMode::Mean => sum / count as f64,
            AggregationMode::AreaWeighted if weight > 0.0 => sum / weight,
            AggregationMode::AreaWeighted => f64::NAN,
        }
    }
}

/// One value per triangle from a per-cell field.
///
/// A cell referenced by the correspondence but outside `field` means the map
/// was built for another grid and is an error.
pub fn cells_to_triangles(
    field: &GridField,
    map: &TrianglePixelMap,
    mode: AggregationMode,
) -> Result<Vec<f64>> {
    let (rows, cols) = field.shape();
    let values: Vec<f64> = (0..map.triangle_count())
        .into_par_iter()
        .map(|triangle| -> Result<f64> {
            let mut pairs = Vec::with_capacity(map.get(triangle).len());
            for o in map.get(triangle) {
                let value = field.get(o.cell.row, o.cell.col).ok_or_else(|| MappingError::CellOutOfRange {
                    row: o.cell.row,
                    col: o.cell.col,
                    rows,
                    cols,
                })?;
                pairs.push((value, o.area));
            }
            Ok(mode.reduce(pairs))
        })
        .collect::<Result<_>>()?;

    debug!(
        triangles = values.len(),
        resolved = values.iter().filter(|v| v.is_finite()).count(),
        mode = mode.as_str(),
        "Aggregated cells onto triangles"
    );
    Ok(values)
}

/// A `rows x cols` field from per-triangle values.
///
/// Cells absent from the correspondence stay `NaN`. A triangle id past the
/// end of `values`, or a cell outside the requested shape, is an error.
pub fn triangles_to_cells(
    values: &[f64],
    map: &PixelTriangleMap,
    rows: usize,
    cols: usize,
    mode: AggregationMode,
) -> Result<GridField> {
    let reduced: Vec<_> = map
        .par_iter()
        .map(|(cell, overlaps)| {
            if cell.row >= rows || cell.col >= cols {
                return Err(MappingError::CellOutOfRange {
                    row: cell.row,
                    col: cell.col,
                    rows,
                    cols,
                });
            }
            let mut pairs = Vec::with_capacity(overlaps.len());
            for o in overlaps {
                let value = values.get(o.triangle).ok_or(MappingError::TriangleOutOfRange {
                    triangle: o.triangle,
                    count: values.len(),
                })?;
                pairs.push((*value, o.area));
            }
            Ok((cell, mode.reduce(pairs)))
        })
        .collect::<Result<_>>()?;

    let mut field = GridField::empty(rows, cols);
    for (cell, value) in reduced {
        field.set(cell, value);
    }

    debug!(
        cells = map.cell_count(),
        resolved = field.finite_count(),
        mode = mode.as_str(),
        "Aggregated triangles onto cells"
    );
    Ok(field)
}

/// Fail unless a per-triangle array covers exactly `triangle_count` triangles.
pub fn ensure_value_count(values: &[f64], triangle_count: usize) -> Result<()> {
    if values.len() != triangle_count {
        return Err(MeshError::LengthMismatch {
            expected: triangle_count,
            actual: values.len(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_common::CellIndex;

    #[test]
    fn test_mode_parsing() {
        assert_eq!(AggregationMode::from_str("MEAN"), Some(AggregationMode::Mean));
        assert_eq!(
            AggregationMode::from_str("area_weighted"),
            Some(AggregationMode::AreaWeighted)
        );
        assert_eq!(AggregationMode::from_str("median"), None);
        assert_eq!(AggregationMode::AreaWeighted.as_str(), "area_weighted");
    }

    #[test]
    fn test_reduce_skips_non_finite() {
        let pairs = [(1.0, 1.0), (f64::NAN, 5.0), (3.0, 3.0), (f64::INFINITY, 1.0)];
        assert_eq!(AggregationMode::Mean.reduce(pairs), 2.0);
        assert_eq!(AggregationMode::AreaWeighted.reduce(pairs), 2.5);
    }

    #[test]
    fn test_reduce_empty_is_nan() {
        assert!(AggregationMode::Mean.reduce(std::iter::empty()).is_nan());
        assert!(AggregationMode::AreaWeighted.reduce([(f64::NAN, 1.0)]).is_nan());
    }

    #[test]
    fn test_weighted_zero_area_does_not_fall_back() {
        assert!(AggregationMode::AreaWeighted.reduce([(4.0, 0.0)]).is_nan());
        assert_eq!(AggregationMode::Mean.reduce([(4.0, 0.0)]), 4.0);
    }

    #[test]
    fn test_triangles_to_cells_checks_lengths() {
        let mut map = PixelTriangleMap::new();
        map.insert(CellIndex::new(0, 0), 3, 1.0);
        let err = triangles_to_cells(&[1.0, 2.0], &map, 1, 1, AggregationMode::Mean);
        assert!(matches!(err, Err(MappingError::TriangleOutOfRange { triangle: 3, count: 2 })));

        let mut map = PixelTriangleMap::new();
        map.insert(CellIndex::new(2, 0), 0, 1.0);
        let err = triangles_to_cells(&[1.0], &map, 1, 1, AggregationMode::Mean);
        assert!(matches!(err, Err(MappingError::CellOutOfRange { row: 2, .. })));
    }

    #[test]
    fn test_cells_to_triangles_rejects_cells_outside_field() {
        let mut pixels = PixelTriangleMap::new();
        pixels.insert(CellIndex::new(2, 2), 0, 0.5);
        let triangles = pixels.invert(1).unwrap();

        let field = GridField::filled(1, 1, 4.0);
        let err = cells_to_triangles(&field, &triangles, AggregationMode::Mean);
        assert!(matches!(
            err,
            Err(MappingError::CellOutOfRange { row: 2, col: 2, rows: 1, cols: 1 })
        ));

        let field = GridField::filled(3, 3, 4.0);
        assert_eq!(
            cells_to_triangles(&field, &triangles, AggregationMode::Mean).unwrap(),
            vec![4.0]
        );
    }

    #[test]
    fn test_triangles_to_cells_leaves_unmapped_nan() {
        let mut map = PixelTriangleMap::new();
        map.insert(CellIndex::new(0, 1), 0, 0.5);
        map.insert(CellIndex::new(0, 1), 1, 1.5);
        let field =
            triangles_to_cells(&[2.0, 6.0], &map, 1, 2, AggregationMode::AreaWeighted).unwrap();
        assert!(field.get(0, 0).unwrap().is_nan());
        assert_eq!(field.get(0, 1), Some(5.0));
    }

    #[test]
    fn test_value_count() {
        assert!(ensure_value_count(&[1.0, 2.0], 2).is_ok());
        assert!(matches!(
            ensure_value_count(&[1.0], 2),
            Err(MappingError::Mesh(MeshError::LengthMismatch { expected: 2, actual: 1 }))
        ));
    }
}
