//! Per-triangle scalar value (`.val`) reader and writer.
//!
//! ```text
//! 2 2\t 1.50 3.25
//! f1 2
//! \t1.50
//! \t2.00
//! f2 1
//! \t3.25
//! ```
//!
//! The header repeats the facet count and gives the range of finite values.
//! Values follow in facet order, one per line. `NaN` cannot be stored and is
//! written as `0`.
//!
//! Without a precision every value is written in its shortest form that
//! parses back to the same `f64`. A fixed number of decimals reproduces the
//! two-decimal layout above.

use crate::error::{parse_count, parse_f64, FormatError, FormatResult};
use mesh_common::FacetGrouping;
use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Decimals of the fixed two-decimal layout.
pub const FIXED_PRECISION: usize = 2;

fn write_value(out: &mut String, value: f64, precision: Option<usize>) -> fmt::Result {
    match precision {
        Some(decimals) => write!(out, "{:.*}", decimals, value),
        None => write!(out, "{}", value),
    }
}

/// Render values in facet order.
///
/// `values` must hold exactly one entry per triangle of `facets`. `None`
/// keeps every finite value exact; `Some(n)` rounds to `n` decimals.
pub fn format_scalar_values(
    facets: &FacetGrouping,
    values: &[f64],
    precision: Option<usize>,
) -> FormatResult<String> {
    facets.ensure_len(values.len())?;

    let (min, max) = finite_range(values).unwrap_or((0.0, 0.0));
    let count = facets.facet_count();

    let mut out = String::new();
    write!(out, "{} {}\t ", count, count)?;
    write_value(&mut out, min, precision)?;
    out.push(' ');
    write_value(&mut out, max, precision)?;
    out.push('\n');

    for (i, range) in facets.ranges().enumerate() {
        writeln!(out, "f{} {}", i + 1, range.len())?;
        for &v in &values[range] {
            let v = if v.is_finite() { v } else { 0.0 };
            out.push('\t');
            write_value(&mut out, v, precision)?;
            out.push('\n');
        }
    }

    Ok(out)
}

/// Write a `.val` file.
pub fn write_scalar_values(
    path: impl AsRef<Path>,
    facets: &FacetGrouping,
    values: &[f64],
    precision: Option<usize>,
) -> FormatResult<()> {
    let path = path.as_ref();
    let text = format_scalar_values(facets, values, precision)?;
    fs::write(path, text)?;

    let missing = values.iter().filter(|v| !v.is_finite()).count();
    info!(
        path = %path.display(),
        facets = facets.facet_count(),
        values = values.len(),
        zero_filled = missing,
        "Wrote scalar values"
    );
    Ok(())
}

/// Parse `.val` text into its facet grouping and values.
pub fn parse_scalar_values(text: &str) -> FormatResult<(FacetGrouping, Vec<f64>)> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    // Header: only the facet layout below is authoritative.
    if lines.next().is_none() {
        return Ok((FacetGrouping::default(), Vec::new()));
    }

    let mut sizes = Vec::new();
    let mut values = Vec::new();

    while let Some((line_no, line)) = lines.next() {
        let mut tokens = line.split_whitespace();
        let tag = tokens.next().unwrap_or_default();
        if !tag.starts_with('f') {
            return Err(FormatError::InvalidFormat(format!(
                "expected a facet header on line {}, found '{}'",
                line_no, line
            )));
        }
        let count_token = tokens.next().ok_or_else(|| {
            FormatError::InvalidFormat(format!("facet {} has no value count on line {}", tag, line_no))
        })?;
        let count = parse_count(count_token, line_no)?;

        for read in 0..count {
            let (value_line, text) = lines.next().ok_or_else(|| {
                FormatError::Truncated(format!("facet {} declares {} values, found {}", tag, count, read))
            })?;
            let token = text.split_whitespace().next().unwrap_or_default();
            values.push(parse_f64(token, value_line)?);
        }
        sizes.push(count);
    }

    let facets = FacetGrouping::new(sizes);
    debug!(facets = facets.facet_count(), values = values.len(), "Parsed scalar values");
    Ok((facets, values))
}

/// Read a `.val` file.
pub fn read_scalar_values(path: impl AsRef<Path>) -> FormatResult<(FacetGrouping, Vec<f64>)> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let (facets, values) = parse_scalar_values(&text)?;
    info!(
        path = %path.display(),
        facets = facets.facet_count(),
        values = values.len(),
        "Loaded scalar values"
    );
    Ok((facets, values))
}

/// Read a `.val` file whose facets must match `expected` exactly.
pub fn read_aligned(path: impl AsRef<Path>, expected: &FacetGrouping) -> FormatResult<Vec<f64>> {
    let (facets, values) = read_scalar_values(path)?;
    expected.ensure_matches(&facets)?;
    Ok(values)
}

fn finite_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
