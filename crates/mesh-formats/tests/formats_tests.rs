//! File round trips through temporary files.

use mesh_common::{FacetGrouping, GridDescriptor, GridField, MeshError};
use mesh_formats::{
    check_files, read_aligned, read_ascii_grid, read_scalar_values, read_triangle_list,
    write_ascii_grid, write_scalar_values, FormatError,
};
use tempfile::TempDir;
use test_utils::{
    ascii_grid, assert_approx_eq, regular_triangulation, row_facets, scalar_values, temp_file_with,
    triangle_list, unit_grid,
};

// ============================================================================
// ASCII grid
// ============================================================================

#[test]
fn test_ascii_grid_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.asc");

    let source = temp_file_with(ascii_grid::GRID_3X3);
    let grid = read_ascii_grid(source.path()).unwrap();

    write_ascii_grid(&path, &grid.descriptor, &grid.field, grid.nodata).unwrap();
    let again = read_ascii_grid(&path).unwrap();

    assert_eq!(again.descriptor, grid.descriptor);
    assert_eq!(again.nodata, -9999.0);
    // Both missing cells come back under the file's own nodata value.
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.matches("-9999").count(), 3);
    for (a, b) in again.field.data().iter().zip(grid.field.data()) {
        assert!(a == b || (a.is_nan() && b.is_nan()));
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = read_ascii_grid(dir.path().join("absent.asc")).unwrap_err();
    assert!(matches!(err, FormatError::IoError(_)));
}

// ============================================================================
// Scalar values
// ============================================================================

#[test]
fn test_values_preserve_facet_order_with_nan_as_zero() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("field.val");

    let facets = FacetGrouping::new(vec![2, 3]);
    let values = [0.25, f64::NAN, 7.0, -3.5, f64::NAN];
    write_scalar_values(&path, &facets, &values, Some(2)).unwrap();

    let (read_facets, read) = read_scalar_values(&path).unwrap();
    assert_eq!(read_facets, facets);
    // Missing values are stored as zero: a documented loss.
    assert_eq!(read, vec![0.25, 0.0, 7.0, -3.5, 0.0]);
}

#[test]
fn test_values_for_generated_mesh_keep_row_facets() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rows.val");

    let grid = unit_grid(2, 3);
    let mesh = regular_triangulation(&grid);
    let facets = row_facets(&grid);
    let values: Vec<f64> = (0..mesh.triangle_count())
        .map(|t| mesh.barycenter(t).x)
        .collect();

    write_scalar_values(&path, &facets, &values, Some(6)).unwrap();
    let read = read_aligned(&path, &facets).unwrap();
    assert_eq!(read.len(), values.len());
    for (a, b) in read.iter().zip(&values) {
        assert_approx_eq!(*a, *b, 1e-6);
    }
}

#[test]
fn test_values_file_is_exact_without_precision() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("exact.val");

    let facets = FacetGrouping::new(vec![1, 3]);
    let values = [0.125, 1.0 / 3.0, 42.987654, -2.0 / 7.0];
    write_scalar_values(&path, &facets, &values, None).unwrap();

    assert_eq!(read_aligned(&path, &facets).unwrap(), values);
}

#[test]
fn test_read_aligned_rejects_other_layout() {
    let expected = FacetGrouping::new(triangle_list::TWO_FACETS_SIZES.to_vec());

    let good = temp_file_with(scalar_values::TWO_FACETS);
    assert_eq!(
        read_aligned(good.path(), &expected).unwrap(),
        scalar_values::TWO_FACETS_VALUES
    );

    let bad = temp_file_with(scalar_values::MISMATCHED);
    let err = read_aligned(bad.path(), &expected).unwrap_err();
    assert!(matches!(err, FormatError::Mesh(MeshError::FacetMismatch(_))));
}

// ============================================================================
// Triangle list and consistency
// ============================================================================

#[test]
fn test_triangle_list_matches_value_file() {
    let cir = temp_file_with(triangle_list::TWO_FACETS);
    let list = read_triangle_list(cir.path()).unwrap();
    assert_eq!(list.mesh.triangle_count(), 3);

    let val = temp_file_with(scalar_values::TWO_FACETS);
    let report = check_files(cir.path(), val.path()).unwrap();
    assert!(report.is_consistent());
    assert_eq!(report.stats.count, 3);
    assert_eq!(report.stats.max, 3.25);

    let mismatched = temp_file_with(scalar_values::MISMATCHED);
    let report = check_files(cir.path(), mismatched.path()).unwrap();
    assert!(!report.facets_match);
    assert!(report.counts_match);
    assert!((report.stats.percent_zero - 200.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_written_grid_is_readable_by_descriptor() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gradient.asc");

    let grid = GridDescriptor::from_lower_left(500.0, 1000.0, 25.0, 2, 3).unwrap();
    let field = GridField::new(2, 3, vec![1.0, 2.5, f64::NAN, 4.0, 5.0, 6.125]).unwrap();
    write_ascii_grid(&path, &grid, &field, 9999.0).unwrap();

    let read = read_ascii_grid(&path).unwrap();
    assert_eq!(read.descriptor, grid);
    assert_eq!(read.field.get(1, 2), Some(6.125));
    assert!(read.field.get(0, 2).unwrap().is_nan());
}
