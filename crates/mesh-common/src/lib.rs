//! Common types shared by the mapping engine, the file collaborators and the
//! converter service.
//!
//! Everything here is a plain in-memory entity: a [`GridDescriptor`] placing a
//! north-up raster in world space, a [`GridField`] holding one value per cell,
//! a [`Mesh`] of triangles over 3D points and the [`FacetGrouping`] that fixes
//! the canonical triangle order. Missing values are always `f64::NAN`.

pub mod bbox;
pub mod error;
pub mod grid;
pub mod mesh;

pub use bbox::BoundingBox;
pub use error::{MeshError, MeshResult};
pub use grid::{CellIndex, GridDescriptor, GridField};
pub use mesh::{FacetGrouping, Mesh, Point3};

/// Sentinel used by the exchange formats for cells without data.
pub const DEFAULT_NODATA: f64 = 9999.0;
