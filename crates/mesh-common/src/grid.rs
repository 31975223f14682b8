//! Grid descriptors and per-cell scalar fields.

use crate::error::{MeshError, MeshResult};
use crate::BoundingBox;
use serde::{Deserialize, Serialize};

/// Affine placement of a north-up raster.
///
/// Row 0 is the northernmost row, so `dy` is negative. Rotation terms are not
/// representable: [`GridDescriptor::from_geotransform`] rejects them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridDescriptor {
    /// West edge of column 0
    pub x_min: f64,
    /// North edge of row 0
    pub y_max: f64,
    /// Cell width, positive
    pub dx: f64,
    /// Cell height, negative (rows increase southward)
    pub dy: f64,
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
}

impl GridDescriptor {
    /// Create a descriptor, validating the cell-size sign convention.
    pub fn new(
        x_min: f64,
        y_max: f64,
        dx: f64,
        dy: f64,
        rows: usize,
        cols: usize,
    ) -> MeshResult<Self> {
        if !(dx.is_finite() && dx > 0.0) {
            return Err(MeshError::InvalidCellSize(format!(
                "dx must be positive and finite, got {}",
                dx
            )));
        }
        if !(dy.is_finite() && dy < 0.0) {
            return Err(MeshError::InvalidCellSize(format!(
                "dy must be negative and finite, got {}",
                dy
            )));
        }
        if !x_min.is_finite() || !y_max.is_finite() {
            return Err(MeshError::InvalidOrigin(format!("({}, {})", x_min, y_max)));
        }

        Ok(Self {
            x_min,
            y_max,
            dx,
            dy,
            rows,
            cols,
        })
    }

    /// Square-celled grid anchored at its lower-left corner, as in ASCII grids.
    pub fn from_lower_left(
        x_ll: f64,
        y_ll: f64,
        cellsize: f64,
        rows: usize,
        cols: usize,
    ) -> MeshResult<Self> {
        Self::new(x_ll, y_ll + rows as f64 * cellsize, cellsize, -cellsize, rows, cols)
    }

    /// Build from a GDAL-style geotransform `(x_min, dx, rx, y_max, ry, dy)`.
    ///
    /// Non-zero rotation terms are an error rather than being ignored.
    pub fn from_geotransform(gt: [f64; 6], rows: usize, cols: usize) -> MeshResult<Self> {
        if gt[2] != 0.0 || gt[4] != 0.0 {
            return Err(MeshError::RotatedGrid {
                row_rotation: gt[2],
                col_rotation: gt[4],
            });
        }
        Self::new(gt[0], gt[3], gt[1], gt[5], rows, cols)
    }

    /// The equivalent GDAL-style geotransform.
    pub fn geotransform(&self) -> [f64; 6] {
        [self.x_min, self.dx, 0.0, self.y_max, 0.0, self.dy]
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// Check if grid is empty.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// East edge of the last column.
    pub fn x_max(&self) -> f64 {
        self.x_min + self.cols as f64 * self.dx
    }

    /// South edge of the last row.
    pub fn y_min(&self) -> f64 {
        self.y_max + self.rows as f64 * self.dy
    }

    /// World-space extent of the whole grid.
    pub fn extent(&self) -> BoundingBox {
        BoundingBox::new(self.x_min, self.y_min(), self.x_max(), self.y_max)
    }

    /// Area of a single cell.
    pub fn cell_area(&self) -> f64 {
        self.dx * -self.dy
    }

    /// World-space bounds of cell `(row, col)`.
    pub fn cell_bounds(&self, row: usize, col: usize) -> BoundingBox {
        let min_x = self.x_min + col as f64 * self.dx;
        let max_y = self.y_max + row as f64 * self.dy;
        BoundingBox::new(min_x, max_y + self.dy, min_x + self.dx, max_y)
    }
}

/// Address of one grid cell. Row 0 is the northernmost row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellIndex {
    pub row: usize,
    pub col: usize,
}

impl CellIndex {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// One value per cell, row-major, `NaN` for missing data.
#[derive(Debug, Clone, PartialEq)]
pub struct GridField {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl GridField {
    /// Wrap row-major data; the length must equal `rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> MeshResult<Self> {
        if data.len() != rows * cols {
            return Err(MeshError::DataLength {
                len: data.len(),
                rows,
                cols,
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Wrap raw stored values, turning every listed sentinel into `NaN`.
    pub fn from_raw(rows: usize, cols: usize, mut data: Vec<f64>, nodata: &[f64]) -> MeshResult<Self> {
        for v in data.iter_mut() {
            if nodata.iter().any(|nd| *v == *nd) {
                *v = f64::NAN;
            }
        }
        Self::new(rows, cols, data)
    }

    /// A field with every cell set to `value`.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// A field with no data anywhere.
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, f64::NAN)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.data[row * self.cols + col])
    }

    /// Value at `index`; `NaN` outside the grid.
    pub fn value(&self, index: CellIndex) -> f64 {
        self.get(index.row, index.col).unwrap_or(f64::NAN)
    }

    /// Set the value at `index`. Returns false if the index is outside the grid.
    pub fn set(&mut self, index: CellIndex, value: f64) -> bool {
        if index.row >= self.rows || index.col >= self.cols {
            return false;
        }
        self.data[index.row * self.cols + index.col] = value;
        true
    }

    /// One row of values.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Number of cells holding a finite value.
    pub fn finite_count(&self) -> usize {
        self.data.iter().filter(|v| v.is_finite()).count()
    }

    /// Values with every non-finite cell replaced by `nodata`, for writers.
    pub fn to_raw(&self, nodata: f64) -> Vec<f64> {
        self.data
            .iter()
            .map(|v| if v.is_finite() { *v } else { nodata })
            .collect()
    }

    /// Fail unless this field has the shape described by `grid`.
    pub fn ensure_shape(&self, grid: &GridDescriptor) -> MeshResult<()> {
        if self.rows != grid.rows || self.cols != grid.cols {
            return Err(MeshError::ShapeMismatch {
                expected_rows: grid.rows,
                expected_cols: grid.cols,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_3x4() -> GridDescriptor {
        GridDescriptor::new(100.0, 50.0, 2.0, -1.0, 3, 4).unwrap()
    }

    #[test]
    fn test_extent_and_cell_bounds() {
        let grid = grid_3x4();
        assert_eq!(grid.extent(), BoundingBox::new(100.0, 47.0, 108.0, 50.0));

        let cell = grid.cell_bounds(0, 0);
        assert_eq!(cell, BoundingBox::new(100.0, 49.0, 102.0, 50.0));

        let last = grid.cell_bounds(2, 3);
        assert_eq!(last, BoundingBox::new(106.0, 47.0, 108.0, 48.0));
        assert_eq!(grid.cell_area(), 2.0);
    }

    #[test]
    fn test_sign_convention_enforced() {
        assert!(GridDescriptor::new(0.0, 0.0, -1.0, -1.0, 1, 1).is_err());
        assert!(GridDescriptor::new(0.0, 0.0, 1.0, 1.0, 1, 1).is_err());
        assert!(GridDescriptor::new(f64::NAN, 0.0, 1.0, -1.0, 1, 1).is_err());
    }

    #[test]
    fn test_rotated_geotransform_rejected() {
        let err = GridDescriptor::from_geotransform([0.0, 1.0, 0.2, 10.0, 0.0, -1.0], 10, 10);
        assert!(matches!(err, Err(MeshError::RotatedGrid { .. })));

        let ok = GridDescriptor::from_geotransform([0.0, 1.0, 0.0, 10.0, 0.0, -1.0], 10, 10).unwrap();
        assert_eq!(ok.geotransform(), [0.0, 1.0, 0.0, 10.0, 0.0, -1.0]);
    }

    #[test]
    fn test_from_lower_left() {
        let grid = GridDescriptor::from_lower_left(10.0, 20.0, 5.0, 4, 2).unwrap();
        assert_eq!(grid.y_max, 40.0);
        assert_eq!(grid.dy, -5.0);
        assert_eq!(grid.y_min(), 20.0);
    }

    #[test]
    fn test_field_from_raw_replaces_sentinels() {
        let field = GridField::from_raw(2, 2, vec![1.0, 9999.0, -1.0, 4.0], &[-1.0, 9999.0]).unwrap();
        assert_eq!(field.get(0, 0), Some(1.0));
        assert!(field.get(0, 1).unwrap().is_nan());
        assert!(field.get(1, 0).unwrap().is_nan());
        assert_eq!(field.finite_count(), 2);
        assert_eq!(field.to_raw(9999.0), vec![1.0, 9999.0, 9999.0, 4.0]);
    }

    #[test]
    fn test_field_length_checked() {
        assert!(matches!(
            GridField::new(2, 3, vec![0.0; 5]),
            Err(MeshError::DataLength { len: 5, rows: 2, cols: 3 })
        ));
    }

    #[test]
    fn test_field_out_of_range_access() {
        let mut field = GridField::filled(2, 2, 1.0);
        assert!(field.get(2, 0).is_none());
        assert!(field.value(CellIndex::new(0, 5)).is_nan());
        assert!(!field.set(CellIndex::new(3, 3), 2.0));
        assert!(field.set(CellIndex::new(1, 1), 2.0));
        assert_eq!(field.row(1), &[1.0, 2.0]);
    }
}
