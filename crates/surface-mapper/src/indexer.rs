//! World coordinate to grid cell lookup.

use mesh_common::{BoundingBox, CellIndex, GridDescriptor};

/// Inclusive block of candidate cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub row_min: usize,
    pub row_max: usize,
    pub col_min: usize,
    pub col_max: usize,
}

impl CellRange {
    /// Number of cells in the block.
    pub fn len(&self) -> usize {
        (self.row_max - self.row_min + 1) * (self.col_max - self.col_min + 1)
    }

    /// A range always holds at least one cell.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = CellIndex> + '_ {
        (self.row_min..=self.row_max)
            .flat_map(move |row| (self.col_min..=self.col_max).map(move |col| CellIndex::new(row, col)))
    }
}

/// Resolves points and boxes to cells of one grid.
///
/// Cells are half-open: a point on the boundary between two cells belongs to
/// the cell to its east (column) or south (row).
#[derive(Debug, Clone, Copy)]
pub struct GridIndexer {
    grid: GridDescriptor,
}

impl GridIndexer {
    pub fn new(grid: GridDescriptor) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &GridDescriptor {
        &self.grid
    }

    /// Fractional `(row, col)` of a world point, measured from the grid's
    /// north-west corner. Not clipped.
    pub fn fractional(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (y - self.grid.y_max) / self.grid.dy,
            (x - self.grid.x_min) / self.grid.dx,
        )
    }

    /// The cell containing `(x, y)`, or `None` outside the grid.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<CellIndex> {
        let (row_f, col_f) = self.fractional(x, y);
        let row = index_in(row_f.floor(), self.grid.rows)?;
        let col = index_in(col_f.floor(), self.grid.cols)?;
        Some(CellIndex::new(row, col))
    }

    /// Cells a box can possibly overlap, clipped to the grid.
    ///
    /// This is a candidate set only: overlap still has to be confirmed by
    /// intersecting with each cell. Returns `None` when the box lies wholly
    /// outside the grid or has non-finite bounds.
    pub fn candidate_range(&self, bbox: &BoundingBox) -> Option<CellRange> {
        if self.grid.is_empty() {
            return None;
        }

        let (row_top, col_left) = self.fractional(bbox.min_x, bbox.max_y);
        let (row_bottom, col_right) = self.fractional(bbox.max_x, bbox.min_y);

        let (row_min, row_max) = clip_span(row_top.floor(), row_bottom.floor(), self.grid.rows)?;
        let (col_min, col_max) = clip_span(col_left.floor(), col_right.floor(), self.grid.cols)?;

        Some(CellRange {
            row_min,
            row_max,
            col_min,
            col_max,
        })
    }
}

fn index_in(value: f64, len: usize) -> Option<usize> {
    if value.is_finite() && value >= 0.0 && value < len as f64 {
        Some(value as usize)
    } else {
        None
    }
}

/// Clip the inclusive span `[lo, hi]` to `[0, len)`.
fn clip_span(lo: f64, hi: f64, len: usize) -> Option<(usize, usize)> {
    if !lo.is_finite() || !hi.is_finite() || hi < 0.0 || lo >= len as f64 || lo > hi {
        return None;
    }
    let last = (len - 1) as f64;
    Some((lo.max(0.0) as usize, hi.min(last) as usize))
}
