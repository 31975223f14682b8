//! Test data generators for synthetic grids and meshes.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite.

use mesh_common::{FacetGrouping, GridDescriptor, GridField, Mesh, Point3};

/// A field holding `value` in every cell.
pub fn uniform_field(rows: usize, cols: usize, value: f64) -> GridField {
    GridField::filled(rows, cols, value)
}

/// Creates a field with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// This makes it easy to verify that data is being read/written correctly
/// by checking that `field.get(row, col) == col * 1000 + row`.
///
/// # Example
///
/// ```
/// use test_utils::gradient_field;
///
/// let field = gradient_field(5, 10);
/// assert_eq!(field.len(), 50);
/// assert_eq!(field.get(0, 0), Some(0.0));
/// assert_eq!(field.get(0, 1), Some(1000.0));
/// assert_eq!(field.get(1, 0), Some(1.0));
/// ```
pub fn gradient_field(rows: usize, cols: usize) -> GridField {
    let mut data = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            data.push((col * 1000 + row) as f64);
        }
    }
    GridField::new(rows, cols, data).expect("generated data matches shape")
}

/// Creates a uniform field with `NaN` at the given `(row, col)` cells.
pub fn field_with_nans(rows: usize, cols: usize, value: f64, nan_cells: &[(usize, usize)]) -> GridField {
    let mut data = vec![value; rows * cols];
    for &(row, col) in nan_cells {
        if row < rows && col < cols {
            data[row * cols + col] = f64::NAN;
        }
    }
    GridField::new(rows, cols, data).expect("generated data matches shape")
}

/// A unit-celled grid with its north-west corner at `(0, rows)`.
///
/// World coordinates then run `x` in `[0, cols]` and `y` in `[0, rows]`.
pub fn unit_grid(rows: usize, cols: usize) -> GridDescriptor {
    GridDescriptor::new(0.0, rows as f64, 1.0, -1.0, rows, cols).expect("valid unit grid")
}

/// Two triangles per cell, exactly tiling the grid extent.
///
/// Triangles are ordered row by row, west to east; cell `(r, c)` owns
/// triangles `2 * (r * cols + c)` and the one after. Vertices are duplicated
/// per triangle, as in triangle-list files. Z holds the triangle's row.
pub fn regular_triangulation(grid: &GridDescriptor) -> Mesh {
    let mut triangles = Vec::with_capacity(2 * grid.len());
    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let b = grid.cell_bounds(row, col);
            let z = row as f64;
            let sw = Point3::new(b.min_x, b.min_y, z);
            let se = Point3::new(b.max_x, b.min_y, z);
            let ne = Point3::new(b.max_x, b.max_y, z);
            let nw = Point3::new(b.min_x, b.max_y, z);
            triangles.push([sw, se, ne]);
            triangles.push([sw, ne, nw]);
        }
    }
    Mesh::from_triangle_soup(triangles)
}

/// One facet per grid row, matching [`regular_triangulation`]'s ordering.
pub fn row_facets(grid: &GridDescriptor) -> FacetGrouping {
    FacetGrouping::new(vec![2 * grid.cols; grid.rows])
}

/// A mesh from XY triangles, with every Z set to zero.
pub fn triangle_mesh(triangles: &[[(f64, f64); 3]]) -> Mesh {
    Mesh::from_triangle_soup(triangles.iter().map(|tri| {
        tri.map(|(x, y)| Point3::new(x, y, 0.0))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_field() {
        let field = gradient_field(3, 4);
        assert_eq!(field.shape(), (3, 4));
        assert_eq!(field.get(2, 3), Some(3002.0));
    }

    #[test]
    fn test_field_with_nans() {
        let field = field_with_nans(2, 2, 5.0, &[(0, 1), (9, 9)]);
        assert_eq!(field.finite_count(), 3);
        assert!(field.get(0, 1).unwrap().is_nan());
    }

    #[test]
    fn test_regular_triangulation_covers_grid() {
        let grid = unit_grid(3, 4);
        let mesh = regular_triangulation(&grid);
        assert_eq!(mesh.triangle_count(), 24);
        assert_eq!(mesh.point_count(), 72);

        let total: f64 = (0..mesh.triangle_count()).map(|t| mesh.triangle_area(t)).sum();
        assert!((total - 12.0).abs() < 1e-12);
        assert_eq!(mesh.bbox().unwrap(), grid.extent());
        assert_eq!(row_facets(&grid).triangle_count(), 24);
    }

    #[test]
    fn test_triangle_mesh() {
        let mesh = triangle_mesh(&[[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]]);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangle_area(0), 0.5);
    }
}
