//! Exact triangle/cell overlap mapping.

use crate::config::MapperConfig;
use crate::correspondence::PixelTriangleMap;
use crate::error::Result;
use crate::geometry::{Point2, Polygon};
use crate::indexer::GridIndexer;
use mesh_common::{CellIndex, GridDescriptor, Mesh};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Counts from one mapping run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingStats {
    /// Triangles in the input mesh
    pub triangles: usize,
    /// Triangles skipped for zero, negative or non-finite area
    pub degenerate: usize,
    /// Valid triangles that overlap no cell
    pub outside: usize,
    /// Triangles with at least one recorded overlap
    pub mapped: usize,
    /// Recorded (cell, triangle) entries
    pub entries: usize,
    /// Distinct cells with at least one overlap
    pub cells: usize,
}

enum TriangleOutcome {
    Degenerate,
    Mapped(Vec<(CellIndex, f64)>),
}

/// Computes the pixel -> triangles correspondence for a mesh over a grid.
#[derive(Debug, Clone, Default)]
pub struct SurfaceMapper {
    config: MapperConfig,
}

impl SurfaceMapper {
    /// Create a mapper, validating its configuration.
    pub fn new(config: MapperConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Map every triangle of `mesh` onto the cells of `grid`.
    pub fn map(&self, mesh: &Mesh, grid: &GridDescriptor) -> PixelTriangleMap {
        self.map_with_stats(mesh, grid).0
    }

    /// Like [`SurfaceMapper::map`], also returning run counts.
    ///
    /// Degenerate triangles and triangles outside the grid contribute no
    /// entries; neither is an error.
    pub fn map_with_stats(&self, mesh: &Mesh, grid: &GridDescriptor) -> (PixelTriangleMap, MappingStats) {
        let indexer = GridIndexer::new(*grid);
        let triangle_count = mesh.triangle_count();

        let outcomes: Vec<TriangleOutcome> = if self.config.parallel {
            (0..triangle_count)
                .into_par_iter()
                .map(|id| self.map_triangle(mesh, &indexer, id))
                .collect()
        } else {
            (0..triangle_count)
                .map(|id| self.map_triangle(mesh, &indexer, id))
                .collect()
        };

        let mut map = PixelTriangleMap::new();
        let mut stats = MappingStats {
            triangles: triangle_count,
            ..Default::default()
        };

        for (id, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                TriangleOutcome::Degenerate => {
                    debug!(triangle = id, "Skipping degenerate triangle");
                    stats.degenerate += 1;
                }
                TriangleOutcome::Mapped(cells) if cells.is_empty() => stats.outside += 1,
                TriangleOutcome::Mapped(cells) => {
                    stats.mapped += 1;
                    stats.entries += cells.len();
                    for (cell, area) in cells {
                        map.insert(cell, id, area);
                    }
                }
            }
        }
        stats.cells = map.cell_count();

        info!(
            triangles = stats.triangles,
            mapped = stats.mapped,
            degenerate = stats.degenerate,
            outside = stats.outside,
            entries = stats.entries,
            cells = stats.cells,
            "Surface mapping complete"
        );

        (map, stats)
    }

    fn map_triangle(&self, mesh: &Mesh, indexer: &GridIndexer, id: usize) -> TriangleOutcome {
        let epsilon = self.config.area_epsilon;
        if mesh.is_degenerate(id, epsilon) {
            return TriangleOutcome::Degenerate;
        }

        let Some(range) = indexer.candidate_range(&mesh.triangle_bbox(id)) else {
            return TriangleOutcome::Mapped(Vec::new());
        };

        let [a, b, c] = mesh.triangle_xy(id);
        let triangle = Polygon::triangle(Point2::from(a), Point2::from(b), Point2::from(c)).to_ccw();
        let grid = indexer.grid();

        let cells = range
            .iter()
            .filter_map(|cell| {
                let bounds = grid.cell_bounds(cell.row, cell.col);
                let area = triangle.intersection(&Polygon::from_bbox(&bounds)).area();
                (area.is_finite() && area > epsilon).then_some((cell, area))
            })
            .collect();

        TriangleOutcome::Mapped(cells)
    }
}
