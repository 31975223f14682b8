//! Sparse pixel/triangle correspondence.
//!
//! The forward view ([`PixelTriangleMap`]) is keyed by cell: a cell with no
//! overlapping triangle is absent rather than present with an empty list. The
//! transposed view ([`TrianglePixelMap`]) is dense over triangle ids so every
//! triangle can be addressed by position, with an empty list for unmapped
//! triangles.

use crate::error::{MappingError, Result};
use mesh_common::CellIndex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One triangle overlapping a cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriangleOverlap {
    pub triangle: usize,
    pub area: f64,
}

/// One cell overlapped by a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellOverlap {
    pub cell: CellIndex,
    pub area: f64,
}

fn is_recordable(area: f64) -> bool {
    area.is_finite() && area > 0.0
}

/// Cell -> overlapping triangles with intersection areas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PixelTriangleMap {
    cells: HashMap<CellIndex, Vec<TriangleOverlap>>,
}

impl PixelTriangleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an overlap. Non-positive or non-finite areas are ignored.
    pub fn insert(&mut self, cell: CellIndex, triangle: usize, area: f64) {
        if !is_recordable(area) {
            return;
        }
        self.cells
            .entry(cell)
            .or_default()
            .push(TriangleOverlap { triangle, area });
    }

    /// Triangles overlapping `cell`, `None` if it has none.
    pub fn get(&self, cell: CellIndex) -> Option<&[TriangleOverlap]> {
        self.cells.get(&cell).map(Vec::as_slice)
    }

    /// Number of cells with at least one overlap.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Total number of (cell, triangle) entries.
    pub fn entry_count(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellIndex, &[TriangleOverlap])> {
        self.cells.iter().map(|(cell, list)| (*cell, list.as_slice()))
    }

    pub fn par_iter(&self) -> impl ParallelIterator<Item = (CellIndex, &[TriangleOverlap])> {
        self.cells
            .par_iter()
            .map(|(cell, list)| (*cell, list.as_slice()))
    }

    /// Sum of recorded areas for one triangle.
    pub fn triangle_area_sum(&self, triangle: usize) -> f64 {
        self.cells
            .values()
            .flatten()
            .filter(|o| o.triangle == triangle)
            .map(|o| o.area)
            .sum()
    }

    /// Transpose into a per-triangle view covering ids `0..triangle_count`.
    pub fn invert(&self, triangle_count: usize) -> Result<TrianglePixelMap> {
        invert(self, triangle_count)
    }
}

/// Triangle -> overlapped cells, dense over triangle ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrianglePixelMap {
    triangles: Vec<Vec<CellOverlap>>,
}

impl TrianglePixelMap {
    /// A map where every triangle has an empty list.
    pub fn with_triangles(triangle_count: usize) -> Self {
        Self {
            triangles: vec![Vec::new(); triangle_count],
        }
    }

    /// Record an overlap. Non-positive or non-finite areas are ignored.
    pub fn insert(&mut self, triangle: usize, cell: CellIndex, area: f64) -> Result<()> {
        let count = self.triangles.len();
        let list = self
            .triangles
            .get_mut(triangle)
            .ok_or(MappingError::TriangleOutOfRange { triangle, count })?;
        if is_recordable(area) {
            list.push(CellOverlap { cell, area });
        }
        Ok(())
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Cells overlapped by `triangle`; empty for unmapped or unknown ids.
    pub fn get(&self, triangle: usize) -> &[CellOverlap] {
        self.triangles
            .get(triangle)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Triangles with at least one overlap.
    pub fn mapped_count(&self) -> usize {
        self.triangles.iter().filter(|l| !l.is_empty()).count()
    }

    pub fn entry_count(&self) -> usize {
        self.triangles.iter().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[CellOverlap])> {
        self.triangles.iter().map(Vec::as_slice).enumerate()
    }

    /// Transpose back into the per-cell view. Empty lists produce no entries.
    pub fn invert(&self) -> PixelTriangleMap {
        let mut map = PixelTriangleMap::new();
        for (triangle, cells) in self.iter() {
            for overlap in cells {
                map.insert(overlap.cell, triangle, overlap.area);
            }
        }
        map
    }
}

/// Transpose a per-cell map into a per-triangle map over `0..triangle_count`.
///
/// Triangles absent from `map` get an empty list. Each list is sorted by
/// `(row, col)` so the result does not depend on hash iteration order. A
/// triangle id outside the domain is a structural error.
pub fn invert(map: &PixelTriangleMap, triangle_count: usize) -> Result<TrianglePixelMap> {
    let mut inverse = TrianglePixelMap::with_triangles(triangle_count);
    for (cell, overlaps) in map.iter() {
        for overlap in overlaps {
            inverse.insert(overlap.triangle, cell, overlap.area)?;
        }
    }
    for list in inverse.triangles.iter_mut() {
        list.sort_by_key(|o| o.cell);
    }
    Ok(inverse)
}
