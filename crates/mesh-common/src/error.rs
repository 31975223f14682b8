//! Error types for grid and mesh construction.

use thiserror::Error;

/// Result type alias using MeshError.
pub type MeshResult<T> = Result<T, MeshError>;

/// Structural errors raised while building or combining grids and meshes.
#[derive(Debug, Error)]
pub enum MeshError {
    // === Grid Errors ===
    #[error("Invalid cell size: {0}")]
    InvalidCellSize(String),

    #[error("Invalid grid origin: {0}")]
    InvalidOrigin(String),

    #[error("Rotated grids are not supported (rotation terms {row_rotation}, {col_rotation})")]
    RotatedGrid {
        row_rotation: f64,
        col_rotation: f64,
    },

    #[error("Field has {len} values but grid is {rows}x{cols}")]
    DataLength { len: usize, rows: usize, cols: usize },

    #[error("Field shape mismatch: expected {expected_rows}x{expected_cols}, got {rows}x{cols}")]
    ShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },

    // === Mesh Errors ===
    #[error("Triangle {triangle} references vertex {vertex} but mesh has {points} points")]
    VertexOutOfRange {
        triangle: usize,
        vertex: usize,
        points: usize,
    },

    #[error("Facet grouping mismatch: {0}")]
    FacetMismatch(String),

    #[error("Expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}
