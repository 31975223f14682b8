//! File-to-file conversions run by the command-line front-end.

use crate::config::{ConverterConfig, GridToMeshMethod};
use anyhow::{Context, Result};
use mesh_common::{GridDescriptor, Mesh};
use mesh_formats::{
    check_files, read_aligned, read_ascii_grid, read_triangle_list, write_ascii_grid,
    write_scalar_values, ConsistencyReport,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use surface_mapper::sampling::{
    barycenters_bilinear, cells_to_triangles_direct, map_barycenters, multisample_triangles,
};
use surface_mapper::{
    cells_to_triangles, compare_fields, ensure_value_count, rigid_align, rotate_xy,
    triangles_to_cells, ComparisonStats, RigidTransform, SurfaceMapper,
};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridToMeshSummary {
    pub facets: usize,
    pub triangles: usize,
    /// Translation applied to the mesh before mapping
    pub translation: (f64, f64),
    pub rotation_deg: f64,
    pub method: GridToMeshMethod,
    /// Triangles that received a finite value
    pub mapped: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshToGridSummary {
    pub rows: usize,
    pub cols: usize,
    pub triangles: usize,
    pub translation: (f64, f64),
    /// Cells that received a finite value
    pub covered_cells: usize,
}

/// Apply the configured rotation and bounding-box alignment.
fn place_mesh(mesh: &Mesh, grid: &GridDescriptor, config: &ConverterConfig) -> (Mesh, RigidTransform) {
    if config.align {
        return rigid_align(mesh, grid, config.rotation_deg);
    }

    let placed = if config.rotation_deg == 0.0 {
        mesh.clone()
    } else {
        rotate_xy(mesh, config.rotation_deg, None)
    };
    let transform = RigidTransform {
        angle_deg: config.rotation_deg,
        ..Default::default()
    };
    (placed, transform)
}

/// Carry an ASCII grid onto the triangles of a `.cir` file and write the
/// result as a `.val` file in facet order.
pub fn grid_to_mesh(
    grid_path: &Path,
    cir_path: &Path,
    out_val: &Path,
    config: &ConverterConfig,
) -> Result<GridToMeshSummary> {
    let grid = read_ascii_grid(grid_path)
        .with_context(|| format!("Failed to read grid {:?}", grid_path))?;
    let list = read_triangle_list(cir_path)
        .with_context(|| format!("Failed to read triangle list {:?}", cir_path))?;

    let (mesh, transform) = place_mesh(&list.mesh, &grid.descriptor, config);
    let nodata = Some(config.nodata_value);

    let values = match config.method {
        GridToMeshMethod::Surface => {
            let mapper = SurfaceMapper::new(config.mapper.clone())?;
            let map = mapper.map(&mesh, &grid.descriptor);
            let triangles = map.invert(mesh.triangle_count())?;
            cells_to_triangles(&grid.field, &triangles, config.aggregation)?
        }
        GridToMeshMethod::Barycenter => {
            let map = map_barycenters(&mesh, &grid.descriptor);
            cells_to_triangles_direct(&grid.field, &map, nodata)
        }
        GridToMeshMethod::Bilinear => barycenters_bilinear(&grid.field, &grid.descriptor, &mesh, nodata),
        GridToMeshMethod::Multisample => {
            multisample_triangles(&grid.field, &grid.descriptor, &mesh, &config.stencil, nodata)?
        }
    };

    write_scalar_values(out_val, &list.facets, &values, config.value_precision)
        .with_context(|| format!("Failed to write values {:?}", out_val))?;

    let summary = GridToMeshSummary {
        facets: list.facets.facet_count(),
        triangles: mesh.triangle_count(),
        translation: (transform.tx, transform.ty),
        rotation_deg: transform.angle_deg,
        method: config.method,
        mapped: values.iter().filter(|v| v.is_finite()).count(),
    };

    if summary.mapped < summary.triangles {
        warn!(
            unmapped = summary.triangles - summary.mapped,
            "Triangles without a value were written as 0"
        );
    }
    info!(
        method = config.method.as_str(),
        aggregation = config.aggregation.as_str(),
        facets = summary.facets,
        triangles = summary.triangles,
        mapped = summary.mapped,
        "Grid to mesh complete"
    );

    Ok(summary)
}

/// Rebuild a grid on the geometry of `reference_grid` from a `.val` file.
///
/// The value file's facets must match the triangle list exactly. Cells not
/// covered by any triangle are written as the nodata value.
pub fn mesh_to_grid(
    reference_grid: &Path,
    cir_path: &Path,
    val_path: &Path,
    out_grid: &Path,
    config: &ConverterConfig,
) -> Result<MeshToGridSummary> {
    let reference = read_ascii_grid(reference_grid)
        .with_context(|| format!("Failed to read reference grid {:?}", reference_grid))?;
    let list = read_triangle_list(cir_path)
        .with_context(|| format!("Failed to read triangle list {:?}", cir_path))?;
    let values = read_aligned(val_path, &list.facets)
        .with_context(|| format!("Values in {:?} do not fit {:?}", val_path, cir_path))?;

    let grid = reference.descriptor;
    let (mesh, transform) = place_mesh(&list.mesh, &grid, config);
    ensure_value_count(&values, mesh.triangle_count())?;

    let mapper = SurfaceMapper::new(config.mapper.clone())?;
    let map = mapper.map(&mesh, &grid);
    let field = triangles_to_cells(&values, &map, grid.rows, grid.cols, config.aggregation)?;

    write_ascii_grid(out_grid, &grid, &field, config.nodata_value)
        .with_context(|| format!("Failed to write grid {:?}", out_grid))?;

    let summary = MeshToGridSummary {
        rows: grid.rows,
        cols: grid.cols,
        triangles: mesh.triangle_count(),
        translation: (transform.tx, transform.ty),
        covered_cells: field.finite_count(),
    };
    info!(
        rows = summary.rows,
        cols = summary.cols,
        covered = summary.covered_cells,
        aggregation = config.aggregation.as_str(),
        "Mesh to grid complete"
    );

    Ok(summary)
}

/// Check that a `.val` file belongs to a `.cir` file.
pub fn verify(cir_path: &Path, val_path: &Path) -> Result<ConsistencyReport> {
    check_files(cir_path, val_path)
        .with_context(|| format!("Failed to check {:?} against {:?}", val_path, cir_path))
}

/// Compare a reconstructed grid with its reference, optionally writing the
/// per-cell error grid.
pub fn compare(
    reference_grid: &Path,
    reconstructed_grid: &Path,
    error_out: Option<&Path>,
    config: &ConverterConfig,
) -> Result<ComparisonStats> {
    let reference = read_ascii_grid(reference_grid)
        .with_context(|| format!("Failed to read reference grid {:?}", reference_grid))?;
    let reconstructed = read_ascii_grid(reconstructed_grid)
        .with_context(|| format!("Failed to read reconstructed grid {:?}", reconstructed_grid))?;

    if reference.descriptor != reconstructed.descriptor {
        warn!(
            reference = ?reference.descriptor,
            reconstructed = ?reconstructed.descriptor,
            "Grids are placed differently, comparing cell by cell"
        );
    }

    let comparison = compare_fields(&reference.field, &reconstructed.field)?;

    if let Some(path) = error_out {
        write_ascii_grid(path, &reference.descriptor, &comparison.error_field, config.nodata_value)
            .with_context(|| format!("Failed to write error grid {:?}", path))?;
    }

    let stats = comparison.stats;
    info!(
        count = stats.count,
        mae = stats.mae,
        rmse = stats.rmse,
        correlation = stats.correlation,
        "Comparison complete"
    );
    Ok(stats)
}
