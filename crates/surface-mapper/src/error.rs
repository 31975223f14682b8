//! Error types for mapping and aggregation.

use mesh_common::MeshError;
use thiserror::Error;

/// Errors that can occur while mapping or aggregating fields.
///
/// Degenerate triangles and missing data are not errors; they are skipped or
/// carried as `NaN`. Only structural problems end up here.
#[derive(Error, Debug)]
pub enum MappingError {
    /// Grid or mesh construction failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// A correspondence refers to a triangle beyond the value array.
    #[error("triangle {triangle} is out of range for {count} triangles")]
    TriangleOutOfRange { triangle: usize, count: usize },

    /// A correspondence refers to a cell outside the field.
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} field")]
    CellOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Invalid sampling stencil.
    #[error("invalid sampling stencil: {0}")]
    InvalidStencil(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl MappingError {
    /// Create an InvalidStencil error.
    pub fn invalid_stencil(msg: impl Into<String>) -> Self {
        Self::InvalidStencil(msg.into())
    }

    /// Create a ConfigError.
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// Result type for mapping operations.
pub type Result<T> = std::result::Result<T, MappingError>;
