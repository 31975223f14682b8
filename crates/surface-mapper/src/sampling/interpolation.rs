//! Bilinear point sampling of a grid field.
//!
//! Fractional indices are measured from the grid's north-west corner, so
//! cell `(r, c)` contributes its value at world point
//! `(x_min + c * dx, y_max + r * dy)`. No extrapolation: a point whose 2x2
//! window leaves the grid samples to `NaN`.

use crate::indexer::GridIndexer;
use mesh_common::{GridDescriptor, GridField, Mesh};
use rayon::prelude::*;

/// Sample `field` at world point `(x, y)`.
///
/// Returns `NaN` when the 2x2 window falls outside the grid, or when any of
/// its four values is non-finite or equal to `nodata`.
pub fn sample_bilinear(
    field: &GridField,
    grid: &GridDescriptor,
    x: f64,
    y: f64,
    nodata: Option<f64>,
) -> f64 {
    let (row_f, col_f) = GridIndexer::new(*grid).fractional(x, y);
    if !row_f.is_finite() || !col_f.is_finite() {
        return f64::NAN;
    }

    let r0 = row_f.floor();
    let c0 = col_f.floor();
    if r0 < 0.0 || c0 < 0.0 || r0 + 1.0 >= field.rows() as f64 || c0 + 1.0 >= field.cols() as f64 {
        return f64::NAN;
    }
    let (r0, c0) = (r0 as usize, c0 as usize);

    let window = [
        field.get(r0, c0),
        field.get(r0, c0 + 1),
        field.get(r0 + 1, c0),
        field.get(r0 + 1, c0 + 1),
    ];
    let mut v = [0.0; 4];
    for (slot, value) in v.iter_mut().zip(window) {
        match value {
            Some(val) if val.is_finite() && Some(val) != nodata => *slot = val,
            _ => return f64::NAN,
        }
    }
    let [v00, v01, v10, v11] = v;

    let wc = col_f - c0 as f64;
    let wr = row_f - r0 as f64;

    let top = v00 * (1.0 - wc) + v01 * wc;
    let bottom = v10 * (1.0 - wc) + v11 * wc;
    top * (1.0 - wr) + bottom * wr
}

/// Sample at many points.
pub fn sample_points(
    field: &GridField,
    grid: &GridDescriptor,
    points: &[(f64, f64)],
    nodata: Option<f64>,
) -> Vec<f64> {
    points
        .par_iter()
        .map(|&(x, y)| sample_bilinear(field, grid, x, y, nodata))
        .collect()
}

/// One value per triangle, sampled at each triangle's barycenter.
pub fn barycenters_bilinear(
    field: &GridField,
    grid: &GridDescriptor,
    mesh: &Mesh,
    nodata: Option<f64>,
) -> Vec<f64> {
    let centers: Vec<(f64, f64)> = (0..mesh.triangle_count())
        .map(|id| mesh.barycenter(id).xy())
        .collect();
    sample_points(field, grid, &centers, nodata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_common::Point3;

    /// Unit cells, x in [0, 3], y in [0, 3].
    fn grid() -> GridDescriptor {
        GridDescriptor::new(0.0, 3.0, 1.0, -1.0, 3, 3).unwrap()
    }

    #[rustfmt::skip]
    fn field() -> GridField {
        GridField::new(3, 3, vec![
            1.0, 2.0, 3.0,
            4.0, 5.0, 6.0,
            7.0, 8.0, 9.0,
        ])
        .unwrap()
    }

    #[test]
    fn test_bilinear_at_anchors() {
        let (f, g) = (field(), grid());
        assert_eq!(sample_bilinear(&f, &g, 0.0, 3.0, None), 1.0);
        assert_eq!(sample_bilinear(&f, &g, 1.0, 3.0, None), 2.0);
        assert_eq!(sample_bilinear(&f, &g, 1.0, 2.0, None), 5.0);
    }

    #[test]
    fn test_bilinear_center() {
        let center = sample_bilinear(&field(), &grid(), 0.5, 2.5, None);
        assert!((center - 3.0).abs() < 1e-12);

        let quarter = sample_bilinear(&field(), &grid(), 1.25, 1.5, None);
        // Row 1.5, col 1.25 between 5, 6, 8, 9.
        assert!((quarter - 6.75).abs() < 1e-12);
    }

    #[test]
    fn test_bilinear_no_extrapolation() {
        let (f, g) = (field(), grid());
        assert!(sample_bilinear(&f, &g, -0.1, 2.5, None).is_nan());
        assert!(sample_bilinear(&f, &g, 2.5, 2.5, None).is_nan());
        assert!(sample_bilinear(&f, &g, 0.5, 0.5, None).is_nan());
        assert!(sample_bilinear(&f, &g, 0.5, 3.5, None).is_nan());
    }

    #[test]
    fn test_bilinear_with_nan() {
        let mut f = field();
        f.set(mesh_common::CellIndex::new(0, 1), f64::NAN);
        assert!(sample_bilinear(&f, &grid(), 0.5, 2.5, None).is_nan());
        // The window to the south does not touch the NaN.
        assert!(sample_bilinear(&f, &grid(), 0.5, 1.5, None).is_finite());
    }

    #[test]
    fn test_bilinear_with_nodata_value() {
        let f = field();
        assert!(sample_bilinear(&f, &grid(), 0.5, 2.5, Some(5.0)).is_nan());
        assert!(sample_bilinear(&f, &grid(), 1.5, 1.5, Some(1.0)).is_finite());
    }

    #[test]
    fn test_barycenters() {
        let mesh = Mesh::from_triangle_soup([[
            Point3::new(0.0, 3.0, 0.0),
            Point3::new(1.5, 3.0, 0.0),
            Point3::new(0.0, 1.5, 0.0),
        ]]);
        let values = barycenters_bilinear(&field(), &grid(), &mesh, None);
        // Barycenter (0.5, 2.5).
        assert_eq!(values.len(), 1);
        assert!((values[0] - 3.0).abs() < 1e-12);
    }
}
