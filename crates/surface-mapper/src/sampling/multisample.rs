//! Multi-sample triangle integration.
//!
//! Each triangle is sampled bilinearly at a fixed set of barycentric points
//! and the finite samples are averaged. Cheaper and smoother than exact
//! overlap weighting, at the cost of accuracy on coarse meshes.

use super::interpolation::sample_bilinear;
use crate::error::{MappingError, Result};
use mesh_common::{GridDescriptor, GridField, Mesh};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

const THIRD: f64 = 1.0 / 3.0;

const FOUR_POINT: [[f64; 3]; 4] = [
    [THIRD, THIRD, THIRD],
    [0.6, 0.2, 0.2],
    [0.2, 0.6, 0.2],
    [0.2, 0.2, 0.6],
];

const SEVEN_POINT: [[f64; 3]; 7] = [
    [THIRD, THIRD, THIRD],
    [0.6, 0.2, 0.2],
    [0.2, 0.6, 0.2],
    [0.2, 0.2, 0.6],
    [0.5, 0.5, 0.0],
    [0.5, 0.0, 0.5],
    [0.0, 0.5, 0.5],
];

/// Barycentric sample positions used inside each triangle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleStencil {
    /// Barycenter plus one point toward each vertex
    FourPoint,
    /// Four-point stencil plus the three edge midpoints
    #[default]
    SevenPoint,
    /// Caller-supplied barycentric weights
    Custom(Vec<[f64; 3]>),
}

impl SampleStencil {
    /// Barycentric weights `(wa, wb, wc)` of each sample.
    pub fn weights(&self) -> &[[f64; 3]] {
        match self {
            SampleStencil::FourPoint => &FOUR_POINT,
            SampleStencil::SevenPoint => &SEVEN_POINT,
            SampleStencil::Custom(weights) => weights,
        }
    }

    /// Every sample must be a non-empty set of non-negative weights summing to 1.
    pub fn validate(&self) -> Result<()> {
        let weights = self.weights();
        if weights.is_empty() {
            return Err(MappingError::invalid_stencil("no sample points"));
        }
        for (i, w) in weights.iter().enumerate() {
            if w.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(MappingError::invalid_stencil(format!(
                    "sample {} has a negative or non-finite weight: {:?}",
                    i, w
                )));
            }
            let sum: f64 = w.iter().sum();
            if (sum - 1.0).abs() > 1e-6 {
                return Err(MappingError::invalid_stencil(format!(
                    "sample {} weights sum to {}, expected 1",
                    i, sum
                )));
            }
        }
        Ok(())
    }
}

/// One value per triangle: the mean of the finite bilinear samples taken at
/// the stencil's points. `NaN` when no sample is finite.
pub fn multisample_triangles(
    field: &GridField,
    grid: &GridDescriptor,
    mesh: &Mesh,
    stencil: &SampleStencil,
    nodata: Option<f64>,
) -> Result<Vec<f64>> {
    stencil.validate()?;
    let weights = stencil.weights();

    let values = (0..mesh.triangle_count())
        .into_par_iter()
        .map(|id| {
            let [a, b, c] = mesh.triangle_xy(id);
            let (sum, count) = weights
                .iter()
                .map(|[wa, wb, wc]| {
                    let x = wa * a.0 + wb * b.0 + wc * c.0;
                    let y = wa * a.1 + wb * b.1 + wc * c.1;
                    sample_bilinear(field, grid, x, y, nodata)
                })
                .filter(|v| v.is_finite())
                .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
            if count == 0 {
                f64::NAN
            } else {
                sum / count as f64
            }
        })
        .collect();

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_common::Point3;

    fn grid() -> GridDescriptor {
        GridDescriptor::new(0.0, 4.0, 1.0, -1.0, 4, 4).unwrap()
    }

    fn tri(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> [Point3; 3] {
        [
            Point3::new(a.0, a.1, 0.0),
            Point3::new(b.0, b.1, 0.0),
            Point3::new(c.0, c.1, 0.0),
        ]
    }

    #[test]
    fn test_builtin_stencils_are_valid() {
        assert!(SampleStencil::FourPoint.validate().is_ok());
        assert!(SampleStencil::SevenPoint.validate().is_ok());
        assert_eq!(SampleStencil::FourPoint.weights().len(), 4);
        assert_eq!(SampleStencil::default().weights().len(), 7);
    }

    #[test]
    fn test_custom_stencil_validation() {
        assert!(SampleStencil::Custom(vec![]).validate().is_err());
        assert!(SampleStencil::Custom(vec![[0.5, 0.5, 0.5]]).validate().is_err());
        assert!(SampleStencil::Custom(vec![[1.5, -0.5, 0.0]]).validate().is_err());
        assert!(SampleStencil::Custom(vec![[1.0, 0.0, 0.0]]).validate().is_ok());
    }

    #[test]
    fn test_uniform_field_is_reproduced() {
        let field = GridField::filled(4, 4, 7.5);
        let mesh = Mesh::from_triangle_soup([tri((0.5, 0.5), (2.5, 0.5), (0.5, 2.5))]);
        for stencil in [SampleStencil::FourPoint, SampleStencil::SevenPoint] {
            let values = multisample_triangles(&field, &grid(), &mesh, &stencil, None).unwrap();
            assert!((values[0] - 7.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_partially_outside_uses_finite_samples() {
        // Column 0 holds 1.0, every other column 3.0.
        let data = (0..16).map(|i| if i % 4 == 0 { 1.0 } else { 3.0 }).collect();
        let field = GridField::new(4, 4, data).unwrap();
        // Only the sample at vertex a lands outside the grid.
        let mesh = Mesh::from_triangle_soup([tri((10.0, 2.0), (1.0, 2.0), (1.0, 3.0))]);
        let stencil = SampleStencil::Custom(vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        let values = multisample_triangles(&field, &grid(), &mesh, &stencil, None).unwrap();
        assert_eq!(values[0], 3.0);
    }

    #[test]
    fn test_fully_outside_is_nan() {
        let field = GridField::filled(4, 4, 1.0);
        let mesh = Mesh::from_triangle_soup([tri((10.0, 10.0), (11.0, 10.0), (10.0, 11.0))]);
        let values =
            multisample_triangles(&field, &grid(), &mesh, &SampleStencil::FourPoint, None).unwrap();
        assert!(values[0].is_nan());
    }

    #[test]
    fn test_stencil_from_yaml() {
        let stencil: SampleStencil = serde_yaml::from_str("four_point").unwrap();
        assert_eq!(stencil, SampleStencil::FourPoint);
        let stencil: SampleStencil = serde_yaml::from_str("custom: [[1.0, 0.0, 0.0]]").unwrap();
        assert_eq!(stencil, SampleStencil::Custom(vec![[1.0, 0.0, 0.0]]));
    }
}
