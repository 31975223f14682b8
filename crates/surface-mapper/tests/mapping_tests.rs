//! End-to-end properties of mapping, inversion and aggregation.

use mesh_common::{CellIndex, GridDescriptor, GridField};
use surface_mapper::{
    cells_to_triangles, triangles_to_cells, AggregationMode, MapperConfig, SurfaceMapper,
};
use test_utils::{
    assert_approx_eq, field_with_nans, regular_triangulation, triangle_mesh, uniform_field,
    unit_grid,
};

fn mapper() -> SurfaceMapper {
    SurfaceMapper::new(MapperConfig::default()).unwrap()
}

// ============================================================================
// Disjointness
// ============================================================================

#[test]
fn test_triangle_outside_grid_has_no_entries() {
    let grid = unit_grid(3, 3);
    let mesh = triangle_mesh(&[
        [(10.0, 10.0), (12.0, 10.0), (10.0, 12.0)],
        [(-5.0, -5.0), (-4.0, -5.0), (-5.0, -4.0)],
        // Touches the east edge from outside.
        [(3.0, 0.0), (4.0, 1.0), (3.0, 2.0)],
    ]);

    let (map, stats) = mapper().map_with_stats(&mesh, &grid);
    assert!(map.is_empty());
    assert_eq!(stats.outside, 3);

    let inverse = map.invert(mesh.triangle_count()).unwrap();
    assert!((0..3).all(|t| inverse.get(t).is_empty()));
}

// ============================================================================
// Area conservation
// ============================================================================

#[test]
fn test_area_conserved_inside_grid() {
    let grid = GridDescriptor::new(0.0, 10.0, 0.7, -0.45, 22, 14).unwrap();
    let mesh = triangle_mesh(&[
        [(0.3, 0.4), (9.1, 1.7), (4.2, 8.8)],
        [(5.15, 5.15), (5.16, 5.15), (5.15, 5.16)],
        [(1.0, 9.0), (1.4, 2.0), (8.0, 4.0)],
    ]);

    let map = mapper().map(&mesh, &grid);
    for t in 0..mesh.triangle_count() {
        assert_approx_eq!(map.triangle_area_sum(t), mesh.triangle_area(t), 1e-8);
    }
}

#[test]
fn test_area_never_exceeds_triangle_when_clipped() {
    let grid = unit_grid(4, 4);
    let mesh = triangle_mesh(&[
        [(-2.0, -1.0), (3.0, 2.0), (1.0, 6.0)],
        [(2.5, 2.5), (7.0, 3.0), (3.0, 9.0)],
    ]);

    let map = mapper().map(&mesh, &grid);
    for t in 0..mesh.triangle_count() {
        let recorded = map.triangle_area_sum(t);
        assert!(recorded > 0.0);
        assert!(recorded <= mesh.triangle_area(t) + 1e-9);
    }
}

#[test]
fn test_regular_triangulation_splits_cells_in_half() {
    let grid = unit_grid(3, 5);
    let mesh = regular_triangulation(&grid);
    let map = mapper().map(&mesh, &grid);

    assert_eq!(map.cell_count(), 15);
    assert_eq!(map.entry_count(), 30);
    for (_, overlaps) in map.iter() {
        assert_eq!(overlaps.len(), 2);
        for o in overlaps {
            assert_approx_eq!(o.area, 0.5, 1e-12);
        }
    }
}

// ============================================================================
// Inversion round trip
// ============================================================================

#[test]
fn test_inversion_round_trip() {
    let grid = GridDescriptor::new(100.0, 50.0, 2.0, -1.5, 8, 9).unwrap();
    let mesh = triangle_mesh(&[
        [(101.0, 40.0), (115.0, 41.0), (108.0, 49.0)],
        [(104.0, 44.0), (117.5, 38.5), (112.0, 48.5)],
        [(200.0, 0.0), (201.0, 0.0), (200.0, 1.0)],
    ]);

    let forward = mapper().map(&mesh, &grid);
    let inverse = forward.invert(mesh.triangle_count()).unwrap();
    assert_eq!(inverse.triangle_count(), 3);
    assert!(inverse.get(2).is_empty());

    let again = inverse.invert().invert(mesh.triangle_count()).unwrap();
    assert_eq!(again, inverse);
    assert_eq!(again.entry_count(), forward.entry_count());
}

// ============================================================================
// Aggregation
// ============================================================================

#[test]
fn test_weighted_constant_field_is_reproduced() {
    let grid = unit_grid(4, 4);
    // Cells (3, 0) and (3, 1) are missing.
    let field = field_with_nans(4, 4, 42.5, &[(3, 0), (3, 1)]);
    let mesh = triangle_mesh(&[
        [(0.2, 0.2), (3.7, 0.9), (1.4, 3.6)],
        [(0.1, 0.1), (1.9, 0.1), (0.1, 0.9)],
        [(5.0, 5.0), (6.0, 5.0), (5.0, 6.0)],
    ]);

    let map = mapper().map(&mesh, &grid).invert(3).unwrap();
    let values = cells_to_triangles(&field, &map, AggregationMode::AreaWeighted).unwrap();

    assert_approx_eq!(values[0], 42.5, 1e-12);
    assert!(values[1].is_nan(), "only missing cells under triangle 1");
    assert!(values[2].is_nan(), "triangle 2 is outside the grid");
}

#[test]
fn test_nodata_cell_excluded_in_both_modes() {
    let grid = unit_grid(3, 3);
    #[rustfmt::skip]
    let field = GridField::new(3, 3, vec![
        1.0, 2.0,      3.0,
        f64::NAN, 4.0, 6.0,
        7.0, 8.0,      9.0,
    ])
    .unwrap();
    // Symmetric about x = 2, inside row 1: equal overlap with (1, 1) and
    // (1, 2), a sliver over the missing (1, 0).
    let mesh = triangle_mesh(&[[(0.8, 1.2), (3.2, 1.2), (2.0, 1.8)]]);

    let map = mapper().map(&mesh, &grid);
    assert!(map.get(CellIndex::new(1, 0)).is_some());

    let inverse = map.invert(1).unwrap();
    for mode in [AggregationMode::Mean, AggregationMode::AreaWeighted] {
        let values = cells_to_triangles(&field, &inverse, mode).unwrap();
        assert_approx_eq!(values[0], 5.0, 1e-12);
    }
}

#[test]
fn test_grid_to_triangles_to_grid_round_trip() {
    let grid = unit_grid(4, 4);
    // The mesh covers only the two western columns.
    let covered = GridDescriptor::new(0.0, 4.0, 1.0, -1.0, 4, 2).unwrap();
    let mesh = regular_triangulation(&covered);
    let field = uniform_field(4, 4, 17.25);

    let forward = mapper().map(&mesh, &grid);
    let inverse = forward.invert(mesh.triangle_count()).unwrap();

    for mode in [AggregationMode::Mean, AggregationMode::AreaWeighted] {
        let tri_values = cells_to_triangles(&field, &inverse, mode).unwrap();
        let back = triangles_to_cells(&tri_values, &forward, 4, 4, mode).unwrap();

        for row in 0..4 {
            for col in 0..4 {
                let v = back.get(row, col).unwrap();
                if col < 2 {
                    assert_approx_eq!(v, 17.25, 1e-12);
                } else {
                    assert!(v.is_nan(), "cell ({}, {}) should be uncovered", row, col);
                }
            }
        }
    }
}

#[test]
fn test_unmapped_triangle_value_stays_nan_on_the_way_back() {
    let grid = unit_grid(2, 2);
    let mesh = regular_triangulation(&grid);
    let forward = mapper().map(&mesh, &grid);

    let mut values = vec![3.0; mesh.triangle_count()];
    // Both triangles of cell (0, 0) have no value.
    values[0] = f64::NAN;
    values[1] = f64::NAN;

    let back = triangles_to_cells(&values, &forward, 2, 2, AggregationMode::Mean).unwrap();
    assert!(back.get(0, 0).unwrap().is_nan());
    assert_eq!(back.finite_count(), 3);
}
