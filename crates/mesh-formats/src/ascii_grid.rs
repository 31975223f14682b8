//! ESRI ASCII grid reader and writer.
//!
//! The header holds `ncols`, `nrows`, the lower-left origin (`xllcorner` /
//! `yllcorner`, or the `*center` variants), `cellsize` and an optional
//! `nodata_value`. Keys are case-insensitive. Data follows row by row, the
//! first row being the northernmost.

use crate::error::{parse_count, parse_f64, FormatError, FormatResult};
use mesh_common::{GridDescriptor, GridField, DEFAULT_NODATA};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const HEADER_KEYS: [&str; 8] = [
    "ncols",
    "nrows",
    "xllcorner",
    "xllcenter",
    "yllcorner",
    "yllcenter",
    "cellsize",
    "nodata_value",
];

/// A decoded ASCII grid.
#[derive(Debug, Clone, PartialEq)]
pub struct AsciiGrid {
    pub descriptor: GridDescriptor,
    /// Values with both the file's nodata value and 9999 replaced by `NaN`
    pub field: GridField,
    /// The nodata value declared by the file, 9999 when absent
    pub nodata: f64,
}

/// Parse ASCII grid text.
pub fn parse_ascii_grid(text: &str) -> FormatResult<AsciiGrid> {
    let mut header: HashMap<&'static str, (f64, &str, usize)> = HashMap::new();
    let mut values = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let first = tokens.next().unwrap_or_default();
        let lower = first.to_ascii_lowercase();

        if let Some(key) = HEADER_KEYS.iter().find(|k| **k == lower) {
            let token = tokens
                .next()
                .ok_or_else(|| FormatError::InvalidFormat(format!("header '{}' has no value on line {}", first, line_no)))?;
            header.insert(*key, (parse_f64(token, line_no)?, token, line_no));
            continue;
        }

        for token in line.split_whitespace() {
            values.push(parse_f64(token, line_no)?);
        }
    }

    let require = |key: &str| -> FormatResult<(f64, &str, usize)> {
        header
            .get(key)
            .copied()
            .ok_or_else(|| FormatError::MissingHeader(key.to_string()))
    };
    let count = |key: &str| -> FormatResult<usize> {
        let (_, token, line) = require(key)?;
        parse_count(token, line)
    };

    let cols = count("ncols")?;
    let rows = count("nrows")?;
    let cellsize = require("cellsize")?.0;

    let half = 0.5 * cellsize;
    let x_ll = match (header.get("xllcorner"), header.get("xllcenter")) {
        (Some(v), _) => v.0,
        (None, Some(v)) => v.0 - half,
        (None, None) => return Err(FormatError::MissingHeader("xllcorner".to_string())),
    };
    let y_ll = match (header.get("yllcorner"), header.get("yllcenter")) {
        (Some(v), _) => v.0,
        (None, Some(v)) => v.0 - half,
        (None, None) => return Err(FormatError::MissingHeader("yllcorner".to_string())),
    };
    let nodata = header.get("nodata_value").map_or(DEFAULT_NODATA, |v| v.0);

    let expected = rows.checked_mul(cols).ok_or_else(|| {
        FormatError::InvalidFormat(format!("grid of {}x{} cells is too large", rows, cols))
    })?;
    if values.len() < expected {
        return Err(FormatError::Truncated(format!(
            "expected {} values for {}x{} grid, found {}",
            expected,
            rows,
            cols,
            values.len()
        )));
    }
    if values.len() > expected {
        return Err(FormatError::InvalidFormat(format!(
            "expected {} values for {}x{} grid, found {}",
            expected,
            rows,
            cols,
            values.len()
        )));
    }

    let descriptor = GridDescriptor::from_lower_left(x_ll, y_ll, cellsize, rows, cols)?;
    let field = GridField::from_raw(rows, cols, values, &[nodata, DEFAULT_NODATA])?;

    debug!(
        rows,
        cols,
        cellsize,
        nodata,
        missing = field.len() - field.finite_count(),
        "Parsed ASCII grid"
    );

    Ok(AsciiGrid {
        descriptor,
        field,
        nodata,
    })
}

/// Read an ASCII grid file.
pub fn read_ascii_grid(path: impl AsRef<Path>) -> FormatResult<AsciiGrid> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let grid = parse_ascii_grid(&text)?;
    info!(
        path = %path.display(),
        rows = grid.descriptor.rows,
        cols = grid.descriptor.cols,
        "Loaded ASCII grid"
    );
    Ok(grid)
}

/// Render a field as ASCII grid text, writing `NaN` cells as `nodata`.
///
/// The format only stores square cells; anything else is rejected.
pub fn format_ascii_grid(grid: &GridDescriptor, field: &GridField, nodata: f64) -> FormatResult<String> {
    field.ensure_shape(grid)?;

    let cellsize = grid.dx;
    if (grid.dx + grid.dy).abs() > f64::EPSILON * grid.dx.abs().max(1.0) {
        return Err(FormatError::UnsupportedGrid(format!(
            "cells must be square, got dx={} dy={}",
            grid.dx, grid.dy
        )));
    }

    let mut out = String::new();
    writeln!(out, "ncols         {}", grid.cols)?;
    writeln!(out, "nrows         {}", grid.rows)?;
    writeln!(out, "xllcorner     {}", grid.x_min)?;
    writeln!(out, "yllcorner     {}", grid.y_min())?;
    writeln!(out, "cellsize      {}", cellsize)?;
    writeln!(out, "NODATA_value  {}", nodata)?;

    let raw = field.to_raw(nodata);
    for row in raw.chunks(grid.cols.max(1)).take(grid.rows) {
        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writeln!(out, "{}", line.join(" "))?;
    }

    Ok(out)
}

/// Write a field to an ASCII grid file.
pub fn write_ascii_grid(
    path: impl AsRef<Path>,
    grid: &GridDescriptor,
    field: &GridField,
    nodata: f64,
) -> FormatResult<()> {
    let path = path.as_ref();
    let text = format_ascii_grid(grid, field, nodata)?;
    fs::write(path, text)?;
    info!(path = %path.display(), rows = grid.rows, cols = grid.cols, "Wrote ASCII grid");
    Ok(())
}
