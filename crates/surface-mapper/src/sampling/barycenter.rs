//! Nearest-cell mapping through triangle barycenters.
//!
//! Each triangle is assigned the single cell containing its barycenter. Many
//! triangles may land in one cell. This is a fast preview; use
//! [`crate::SurfaceMapper`] when geometric fidelity matters.

use crate::error::{MappingError, Result};
use crate::indexer::GridIndexer;
use mesh_common::{CellIndex, GridDescriptor, GridField, Mesh};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Triangle -> cell assignment and its cell -> triangles view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarycenterMap {
    triangle_cell: Vec<Option<CellIndex>>,
    cells: HashMap<CellIndex, Vec<usize>>,
}

impl BarycenterMap {
    pub fn triangle_count(&self) -> usize {
        self.triangle_cell.len()
    }

    /// Cell holding the barycenter of `triangle`.
    pub fn cell_of(&self, triangle: usize) -> Option<CellIndex> {
        self.triangle_cell.get(triangle).copied().flatten()
    }

    /// Triangles whose barycenter lies in `cell`, in id order.
    pub fn triangles_in(&self, cell: CellIndex) -> &[usize] {
        self.cells.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellIndex, &[usize])> {
        self.cells.iter().map(|(cell, ids)| (*cell, ids.as_slice()))
    }

    /// Per-triangle cell over `0..triangle_count`, first hit wins.
    ///
    /// `None` for triangles that were never assigned, including ids past the
    /// mapped mesh.
    pub fn triangle_cells(&self, triangle_count: usize) -> Vec<Option<CellIndex>> {
        let mut out = vec![None; triangle_count];
        let mut cells: Vec<_> = self.iter().collect();
        cells.sort_by_key(|(cell, _)| *cell);
        for (cell, ids) in cells {
            for &id in ids {
                if let Some(slot) = out.get_mut(id) {
                    if slot.is_none() {
                        *slot = Some(cell);
                    }
                }
            }
        }
        out
    }
}

/// Assign every triangle of `mesh` to the cell containing its barycenter.
pub fn map_barycenters(mesh: &Mesh, grid: &GridDescriptor) -> BarycenterMap {
    let indexer = GridIndexer::new(*grid);
    let mut map = BarycenterMap::default();

    for id in 0..mesh.triangle_count() {
        let (x, y) = mesh.barycenter(id).xy();
        let cell = indexer.cell_at(x, y);
        if let Some(cell) = cell {
            map.cells.entry(cell).or_default().push(id);
        }
        map.triangle_cell.push(cell);
    }

    debug!(
        triangles = map.triangle_count(),
        cells = map.cell_count(),
        unmapped = map.triangle_cell.iter().filter(|c| c.is_none()).count(),
        "Barycenter mapping complete"
    );
    map
}

/// One value per triangle: the value of the cell holding its barycenter.
///
/// Unmapped triangles and cells that are non-finite or equal to `nodata` give
/// `NaN`.
pub fn cells_to_triangles_direct(
    field: &GridField,
    map: &BarycenterMap,
    nodata: Option<f64>,
) -> Vec<f64> {
    (0..map.triangle_count())
        .map(|id| {
            map.cell_of(id)
                .map(|cell| field.value(cell))
                .filter(|v| v.is_finite() && Some(*v) != nodata)
                .unwrap_or(f64::NAN)
        })
        .collect()
}

/// How triangle values sharing one cell are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellReducer {
    #[default]
    Mean,
    Median,
    Sum,
    Min,
    Max,
    /// First finite value in triangle id order
    First,
    /// Number of triangles, NaN or not
    Count,
    /// Most frequent value, smallest on ties
    Mode,
}

impl CellReducer {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellReducer::Mean => "mean",
            CellReducer::Median => "median",
            CellReducer::Sum => "sum",
            CellReducer::Min => "min",
            CellReducer::Max => "max",
            CellReducer::First => "first",
            CellReducer::Count => "count",
            CellReducer::Mode => "mode",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mean" => Some(CellReducer::Mean),
            "median" => Some(CellReducer::Median),
            "sum" => Some(CellReducer::Sum),
            "min" => Some(CellReducer::Min),
            "max" => Some(CellReducer::Max),
            "first" => Some(CellReducer::First),
            "count" => Some(CellReducer::Count),
            "mode" => Some(CellReducer::Mode),
            _ => None,
        }
    }

    /// Reduce the values of one cell. `NaN` inputs are ignored, and a cell
    /// with no finite input is `NaN`, except for `Count`.
    pub fn reduce(&self, values: &[f64]) -> f64 {
        if let CellReducer::Count = self {
            return values.len() as f64;
        }

        let mut finite: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if finite.is_empty() {
            return f64::NAN;
        }

        match self {
            CellReducer::Mean => finite.iter().sum::<f64>() / finite.len() as f64,
            CellReducer::Sum => finite.iter().sum(),
            CellReducer::Min => finite.iter().copied().fold(f64::INFINITY, f64::min),
            CellReducer::Max => finite.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            CellReducer::First => finite[0],
            CellReducer::Median => {
                finite.sort_by(f64::total_cmp);
                let mid = finite.len() / 2;
                if finite.len() % 2 == 0 {
                    0.5 * (finite[mid - 1] + finite[mid])
                } else {
                    finite[mid]
                }
            }
            CellReducer::Mode => {
                finite.sort_by(f64::total_cmp);
                let mut best = finite[0];
                let mut best_run = 0;
                let mut i = 0;
                while i < finite.len() {
                    let run = finite[i..].iter().take_while(|v| **v == finite[i]).count();
                    if run > best_run {
                        best = finite[i];
                        best_run = run;
                    }
                    i += run;
                }
                best
            }
            CellReducer::Count => values.len() as f64,
        }
    }
}

/// A `rows x cols` field from per-triangle values via a barycenter map.
///
/// Cells without triangles stay `NaN`.
pub fn project_to_cells(
    values: &[f64],
    map: &BarycenterMap,
    rows: usize,
    cols: usize,
    reducer: CellReducer,
) -> Result<GridField> {
    let mut field = GridField::empty(rows, cols);

    for (cell, ids) in map.iter() {
        let mut gathered = Vec::with_capacity(ids.len());
        for &id in ids {
            let value = values.get(id).ok_or(MappingError::TriangleOutOfRange {
                triangle: id,
                count: values.len(),
            })?;
            gathered.push(*value);
        }
        if !field.set(cell, reducer.reduce(&gathered)) {
            return Err(MappingError::CellOutOfRange {
                row: cell.row,
                col: cell.col,
                rows,
                cols,
            });
        }
    }

    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_common::Point3;

    fn grid() -> GridDescriptor {
        GridDescriptor::new(0.0, 2.0, 1.0, -1.0, 2, 2).unwrap()
    }

    /// Small triangle with its barycenter at `(cx, cy)`.
    fn around(cx: f64, cy: f64) -> [Point3; 3] {
        [
            Point3::new(cx - 0.1, cy - 0.1, 0.0),
            Point3::new(cx + 0.2, cy - 0.1, 0.0),
            Point3::new(cx - 0.1, cy + 0.2, 0.0),
        ]
    }

    fn mesh() -> Mesh {
        Mesh::from_triangle_soup([
            around(0.5, 1.5),
            around(0.4, 1.6),
            around(1.5, 0.5),
            around(5.0, 5.0),
        ])
    }

    #[test]
    fn test_map_barycenters() {
        let map = map_barycenters(&mesh(), &grid());
        assert_eq!(map.triangle_count(), 4);
        assert_eq!(map.triangles_in(CellIndex::new(0, 0)), &[0, 1]);
        assert_eq!(map.cell_of(2), Some(CellIndex::new(1, 1)));
        assert_eq!(map.cell_of(3), None);
        assert_eq!(map.cell_count(), 2);

        let cells = map.triangle_cells(5);
        assert_eq!(cells[1], Some(CellIndex::new(0, 0)));
        assert_eq!(cells[3], None);
        assert_eq!(cells[4], None);
    }

    #[test]
    fn test_direct_lookup() {
        let field = GridField::new(2, 2, vec![1.0, 2.0, 3.0, 9999.0]).unwrap();
        let map = map_barycenters(&mesh(), &grid());
        let values = cells_to_triangles_direct(&field, &map, Some(9999.0));
        assert_eq!(&values[..2], &[1.0, 1.0]);
        assert!(values[2].is_nan());
        assert!(values[3].is_nan());
    }

    #[test]
    fn test_reducers() {
        let values = [3.0, f64::NAN, 1.0, 3.0, 2.0];
        assert_eq!(CellReducer::Mean.reduce(&values), 2.25);
        assert_eq!(CellReducer::Median.reduce(&values), 2.5);
        assert_eq!(CellReducer::Sum.reduce(&values), 9.0);
        assert_eq!(CellReducer::Min.reduce(&values), 1.0);
        assert_eq!(CellReducer::Max.reduce(&values), 3.0);
        assert_eq!(CellReducer::First.reduce(&values), 3.0);
        assert_eq!(CellReducer::Count.reduce(&values), 5.0);
        assert_eq!(CellReducer::Mode.reduce(&values), 3.0);
        assert_eq!(CellReducer::Mode.reduce(&[2.0, 1.0]), 1.0);
    }

    #[test]
    fn test_all_nan_cell_stays_nan() {
        let values = [f64::NAN, f64::NAN];
        assert!(CellReducer::Mean.reduce(&values).is_nan());
        assert!(CellReducer::First.reduce(&values).is_nan());
        assert_eq!(CellReducer::Count.reduce(&values), 2.0);
    }

    #[test]
    fn test_project_to_cells() {
        let map = map_barycenters(&mesh(), &grid());
        let field = project_to_cells(&[2.0, 4.0, 7.0, 0.0], &map, 2, 2, CellReducer::Mean).unwrap();
        assert_eq!(field.get(0, 0), Some(3.0));
        assert_eq!(field.get(1, 1), Some(7.0));
        assert!(field.get(0, 1).unwrap().is_nan());

        let err = project_to_cells(&[2.0], &map, 2, 2, CellReducer::Mean);
        assert!(matches!(err, Err(MappingError::TriangleOutOfRange { .. })));
    }

    #[test]
    fn test_reducer_names() {
        for name in ["mean", "median", "sum", "min", "max", "first", "count", "mode"] {
            let reducer = CellReducer::from_str(name).unwrap();
            assert_eq!(reducer.as_str(), name);
        }
        assert!(CellReducer::from_str("avg").is_none());
    }
}
