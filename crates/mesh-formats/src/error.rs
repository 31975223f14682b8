//! Error types for file format readers and writers.

use mesh_common::MeshError;
use thiserror::Error;

/// Result type for format operations.
pub type FormatResult<T> = Result<T, FormatError>;

/// Error types for reading and writing grid, mesh and value files.
#[derive(Error, Debug)]
pub enum FormatError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A required header key is absent
    #[error("Missing required header: {0}")]
    MissingHeader(String),

    /// A token that should be a number is not
    #[error("Invalid number '{token}' on line {line}")]
    InvalidNumber { line: usize, token: String },

    /// The file ends before a declared block is complete
    #[error("Truncated input: {0}")]
    Truncated(String),

    /// Structurally invalid content
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// The grid cannot be represented in this format
    #[error("Unsupported grid: {0}")]
    UnsupportedGrid(String),

    /// Rendering into an in-memory buffer failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// The decoded entities are inconsistent
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

impl FormatError {
    pub(crate) fn invalid_number(line: usize, token: &str) -> Self {
        Self::InvalidNumber {
            line,
            token: token.to_string(),
        }
    }
}

/// Parse a float token, reporting its 1-based line on failure.
pub(crate) fn parse_f64(token: &str, line: usize) -> FormatResult<f64> {
    token
        .parse::<f64>()
        .map_err(|_| FormatError::invalid_number(line, token))
}

/// Parse a non-negative integer token, also accepting forms like `3.0`.
///
/// Float forms must fit in `usize`; `1e30` is rejected rather than saturated.
pub(crate) fn parse_count(token: &str, line: usize) -> FormatResult<usize> {
    if let Ok(n) = token.parse::<usize>() {
        return Ok(n);
    }
    let value = parse_f64(token, line)?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value < usize::MAX as f64 {
        Ok(value as usize)
    } else {
        Err(FormatError::invalid_number(line, token))
    }
}
