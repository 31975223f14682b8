//! Raster/Mesh Scalar Field Exchange
//!
//! This crate moves scalar fields between a regular grid and an unstructured
//! triangle mesh covering the same domain. It provides:
//!
//! - **Exact mapping**: per triangle, the cells it overlaps and the area of
//!   each overlap
//! - **Two-way aggregation**: cell values onto triangles and back, plain or
//!   area-weighted, with missing data carried as `NaN`
//! - **Approximate mappers**: barycenter lookup, bilinear sampling and
//!   multi-sample integration for previews
//!
//! # Architecture
//!
//! ```text
//! Mesh + GridDescriptor
//!      │
//!      ▼
//! SurfaceMapper::map()
//!      │
//!      ├─► Skip degenerate triangles
//!      │
//!      ├─► GridIndexer::candidate_range(triangle bbox)
//!      │
//!      └─► Clip triangle against each candidate cell
//!               │
//!               ▼
//!        PixelTriangleMap ──invert()──► TrianglePixelMap
//!               │                              │
//!               ▼                              ▼
//!     triangles_to_cells()            cells_to_triangles()
//!               │                              │
//!               ▼                              ▼
//!          GridField                    per-triangle values
//! ```
//!
//! # Example
//!
//! ```ignore
//! use surface_mapper::{cells_to_triangles, AggregationMode, SurfaceMapper};
//!
//! let mapper = SurfaceMapper::new(MapperConfig::default())?;
//! let pixels = mapper.map(&mesh, &grid);
//! let triangles = pixels.invert(mesh.triangle_count())?;
//! let values = cells_to_triangles(&field, &triangles, AggregationMode::AreaWeighted)?;
//! ```

pub mod aggregate;
pub mod alignment;
pub mod compare;
pub mod config;
pub mod correspondence;
pub mod error;
pub mod geometry;
pub mod indexer;
pub mod mapper;
pub mod sampling;

// Re-export commonly used types at crate root
pub use aggregate::{cells_to_triangles, ensure_value_count, triangles_to_cells, AggregationMode};
pub use alignment::{bbox_translation, rigid_align, rotate_xy, RigidTransform};
pub use compare::{compare_fields, Comparison, ComparisonStats};
pub use config::MapperConfig;
pub use correspondence::{invert, CellOverlap, PixelTriangleMap, TriangleOverlap, TrianglePixelMap};
pub use error::{MappingError, Result};
pub use geometry::{triangle_cell_overlap, Point2, Polygon};
pub use indexer::{CellRange, GridIndexer};
pub use mapper::{MappingStats, SurfaceMapper};
pub use sampling::{BarycenterMap, CellReducer, SampleStencil};
