//! Triangle-listing (`.cir`) reader.
//!
//! A facet opens with `f<k> <n>`, optionally followed by a line holding the
//! facet normal. Each of its `n` triangles is a block:
//!
//! ```text
//! c12
//! 4
//! x0 y0 z0
//! x1 y1 z1
//! x2 y2 z2
//! x0 y0 z0
//! ```
//!
//! Only the first three points of a block are used. Vertices are not shared
//! between triangles, so the decoded mesh is a triangle soup whose order is
//! the canonical facet order.

use crate::error::{parse_count, parse_f64, FormatError, FormatResult};
use mesh_common::{FacetGrouping, Mesh, Point3};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// A decoded triangle listing.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleList {
    pub mesh: Mesh,
    pub facets: FacetGrouping,
}

/// Non-empty trimmed lines paired with their 1-based line numbers.
struct Lines<'a> {
    lines: Vec<(usize, &'a str)>,
    pos: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        let lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty())
            .collect();
        Self { lines, pos: 0 }
    }

    fn next(&mut self) -> Option<(usize, &'a str)> {
        let line = self.lines.get(self.pos).copied();
        if line.is_some() {
            self.pos += 1;
        }
        line
    }

    fn peek(&self) -> Option<(usize, &'a str)> {
        self.lines.get(self.pos).copied()
    }
}

/// Match a facet header `f<k> <n>`, returning `(k, n)`.
fn facet_header(line: &str, line_no: usize) -> FormatResult<Option<(usize, usize)>> {
    let mut tokens = line.split_whitespace();
    let Some(tag) = tokens.next().and_then(|t| t.strip_prefix('f')) else {
        return Ok(None);
    };
    if tag.is_empty() || !tag.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }
    let Ok(id) = tag.parse::<usize>() else {
        return Ok(None);
    };
    let count = tokens
        .next()
        .ok_or_else(|| FormatError::InvalidFormat(format!("facet f{} has no triangle count on line {}", id, line_no)))?;
    Ok(Some((id, parse_count(count, line_no)?)))
}

fn is_normal_line(line: &str) -> bool {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    tokens.len() == 3 && tokens.iter().all(|t| t.parse::<f64>().is_ok())
}

fn parse_point(line: &str, line_no: usize) -> FormatResult<Point3> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(FormatError::InvalidFormat(format!(
            "expected 'x y z' on line {}, found '{}'",
            line_no, line
        )));
    }
    Ok(Point3::new(
        parse_f64(tokens[0], line_no)?,
        parse_f64(tokens[1], line_no)?,
        parse_f64(tokens[2], line_no)?,
    ))
}

/// Read one triangle block after its `c…` line.
fn triangle_block(lines: &mut Lines<'_>, tag_line: usize) -> FormatResult<[Point3; 3]> {
    let (count_line, count_text) = lines
        .next()
        .ok_or_else(|| FormatError::Truncated(format!("block on line {} has no point count", tag_line)))?;
    let count = parse_count(count_text, count_line)?;
    if count < 3 {
        return Err(FormatError::InvalidFormat(format!(
            "block on line {} has {} points, a triangle needs 3",
            tag_line, count
        )));
    }

    let mut points = Vec::with_capacity(3);
    for _ in 0..count {
        let (line_no, text) = lines.next().ok_or_else(|| {
            FormatError::Truncated(format!("block on line {} declares {} points", tag_line, count))
        })?;
        let point = parse_point(text, line_no)?;
        if points.len() < 3 {
            points.push(point);
        }
    }

    Ok([points[0], points[1], points[2]])
}

struct OpenFacet {
    id: usize,
    expected: usize,
    read: usize,
}

impl OpenFacet {
    fn close(self) -> FormatResult<usize> {
        if self.read < self.expected {
            return Err(FormatError::Truncated(format!(
                "facet f{} declares {} triangles, found {}",
                self.id, self.expected, self.read
            )));
        }
        Ok(self.expected)
    }
}

/// Parse triangle-listing text.
pub fn parse_triangle_list(text: &str) -> FormatResult<TriangleList> {
    let mut lines = Lines::new(text);
    let mut sizes = Vec::new();
    let mut triangles = Vec::new();
    let mut open: Option<OpenFacet> = None;
    let mut stray = 0usize;

    while let Some((line_no, line)) = lines.next() {
        if let Some((id, expected)) = facet_header(line, line_no)? {
            if let Some(facet) = open.take() {
                sizes.push(facet.close()?);
            }
            if lines.peek().is_some_and(|(_, next)| is_normal_line(next)) {
                lines.next();
            }
            if expected == 0 {
                sizes.push(0);
            } else {
                open = Some(OpenFacet {
                    id,
                    expected,
                    read: 0,
                });
            }
            continue;
        }

        if line.starts_with('c') {
            let triangle = triangle_block(&mut lines, line_no)?;
            match open.as_mut() {
                Some(facet) => {
                    triangles.push(triangle);
                    facet.read += 1;
                }
                None => {
                    warn!(line = line_no, "Triangle block outside any facet, skipping");
                    stray += 1;
                }
            }
            if open.as_ref().is_some_and(|f| f.read == f.expected) {
                if let Some(done) = open.take() {
                    sizes.push(done.close()?);
                }
            }
        }
    }

    if let Some(facet) = open.take() {
        sizes.push(facet.close()?);
    }

    let facets = FacetGrouping::new(sizes);
    let mesh = Mesh::from_triangle_soup(triangles);
    facets.ensure_len(mesh.triangle_count())?;

    debug!(
        facets = facets.facet_count(),
        triangles = mesh.triangle_count(),
        skipped = stray,
        "Parsed triangle list"
    );

    Ok(TriangleList { mesh, facets })
}

/// Read a `.cir` file.
pub fn read_triangle_list(path: impl AsRef<Path>) -> FormatResult<TriangleList> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let list = parse_triangle_list(&text)?;
    info!(
        path = %path.display(),
        facets = list.facets.facet_count(),
        triangles = list.mesh.triangle_count(),
        "Loaded triangle list"
    );
    Ok(list)
}

/// Facet sizes from the `f<k> <n>` headers alone, without decoding triangles.
pub fn parse_facet_sizes(text: &str) -> FormatResult<FacetGrouping> {
    let mut sizes = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if let Some((_, n)) = facet_header(line.trim(), idx + 1)? {
            sizes.push(n);
        }
    }
    Ok(FacetGrouping::new(sizes))
}

/// Read only the facet sizes of a `.cir` file.
pub fn read_facet_sizes(path: impl AsRef<Path>) -> FormatResult<FacetGrouping> {
    let text = fs::read_to_string(path)?;
    parse_facet_sizes(&text)
}
