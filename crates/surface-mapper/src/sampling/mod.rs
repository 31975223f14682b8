//! Approximate alternatives to exact overlap mapping.
//!
//! - [`barycenter`]: one cell per triangle through its centroid
//! - [`interpolation`]: bilinear point sampling of a grid field
//! - [`multisample`]: averaged bilinear samples at a barycentric stencil

pub mod barycenter;
pub mod interpolation;
pub mod multisample;

pub use barycenter::{
    cells_to_triangles_direct, map_barycenters, project_to_cells, BarycenterMap, CellReducer,
};
pub use interpolation::{barycenters_bilinear, sample_bilinear, sample_points};
pub use multisample::{multisample_triangles, SampleStencil};
