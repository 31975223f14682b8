//! Grid/mesh scalar field converter.
//!
//! Library half of the `converter` binary: configuration loading and the
//! four file pipelines (grid to mesh, mesh to grid, verify, compare).

pub mod config;
pub mod pipeline;

pub use config::{ConverterConfig, GridToMeshMethod};
pub use pipeline::{compare, grid_to_mesh, mesh_to_grid, verify, GridToMeshSummary, MeshToGridSummary};
