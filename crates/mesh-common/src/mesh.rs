//! Triangle meshes and their facet ordering.

use crate::error::{MeshError, MeshResult};
use crate::BoundingBox;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A mesh vertex. Only X and Y take part in mapping; Z is carried through.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn xy(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// Points plus triangles indexing into them.
///
/// Vertices need not be shared between triangles; files in the triangle-list
/// format duplicate them per triangle. Every triangle index is in range of
/// `points`, so per-triangle lookups cannot fail once a mesh exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    points: Vec<Point3>,
    triangles: Vec<[usize; 3]>,
}

impl Mesh {
    /// Create a mesh, checking that every vertex index is in range.
    pub fn new(points: Vec<Point3>, triangles: Vec<[usize; 3]>) -> MeshResult<Self> {
        for (triangle, tri) in triangles.iter().enumerate() {
            if let Some(&vertex) = tri.iter().find(|&&v| v >= points.len()) {
                return Err(MeshError::VertexOutOfRange {
                    triangle,
                    vertex,
                    points: points.len(),
                });
            }
        }
        Ok(Self { points, triangles })
    }

    /// Build a mesh where each triangle owns its three vertices.
    pub fn from_triangle_soup<I>(triangles: I) -> Self
    where
        I: IntoIterator<Item = [Point3; 3]>,
    {
        let mut mesh = Mesh::default();
        for [a, b, c] in triangles {
            let base = mesh.points.len();
            mesh.points.extend([a, b, c]);
            mesh.triangles.push([base, base + 1, base + 2]);
        }
        mesh
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// The three vertices of triangle `id`.
    pub fn triangle_vertices(&self, id: usize) -> [Point3; 3] {
        let [a, b, c] = self.triangles[id];
        [self.points[a], self.points[b], self.points[c]]
    }

    /// The XY projection of triangle `id`.
    pub fn triangle_xy(&self, id: usize) -> [(f64, f64); 3] {
        let [a, b, c] = self.triangle_vertices(id);
        [a.xy(), b.xy(), c.xy()]
    }

    /// Unsigned XY area of triangle `id`; NaN if any coordinate is non-finite.
    pub fn triangle_area(&self, id: usize) -> f64 {
        let [(ax, ay), (bx, by), (cx, cy)] = self.triangle_xy(id);
        0.5 * ((bx - ax) * (cy - ay) - (cx - ax) * (by - ay)).abs()
    }

    /// Arithmetic mean of the three vertices.
    pub fn barycenter(&self, id: usize) -> Point3 {
        let [a, b, c] = self.triangle_vertices(id);
        Point3::new(
            (a.x + b.x + c.x) / 3.0,
            (a.y + b.y + c.y) / 3.0,
            (a.z + b.z + c.z) / 3.0,
        )
    }

    /// XY bounds of triangle `id`.
    pub fn triangle_bbox(&self, id: usize) -> BoundingBox {
        let [a, b, c] = self.triangle_xy(id);
        BoundingBox::new(
            a.0.min(b.0).min(c.0),
            a.1.min(b.1).min(c.1),
            a.0.max(b.0).max(c.0),
            a.1.max(b.1).max(c.1),
        )
    }

    /// XY bounds of every point, `None` for a mesh without points.
    pub fn bbox(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.points.iter().map(Point3::xy))
    }

    /// Mean XY of all points.
    pub fn mean_xy(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        let n = self.points.len() as f64;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some((sx / n, sy / n))
    }

    /// True when the triangle's area is not finite or not above `epsilon`.
    pub fn is_degenerate(&self, id: usize, epsilon: f64) -> bool {
        let area = self.triangle_area(id);
        !area.is_finite() || area <= epsilon
    }

    /// Copy of this mesh with every point's XY passed through `f`.
    pub fn map_xy<F>(&self, f: F) -> Mesh
    where
        F: Fn(f64, f64) -> (f64, f64),
    {
        let points = self
            .points
            .iter()
            .map(|p| {
                let (x, y) = f(p.x, p.y);
                Point3::new(x, y, p.z)
            })
            .collect();
        Mesh {
            points,
            triangles: self.triangles.clone(),
        }
    }
}

/// Triangle counts per facet, in file order.
///
/// Concatenating the facets gives the canonical global triangle index used by
/// the per-triangle value format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetGrouping {
    sizes: Vec<usize>,
}

impl FacetGrouping {
    pub fn new(sizes: Vec<usize>) -> Self {
        Self { sizes }
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn facet_count(&self) -> usize {
        self.sizes.len()
    }

    /// Total triangles across all facets.
    pub fn triangle_count(&self) -> usize {
        self.sizes.iter().sum()
    }

    /// Global triangle index range of each facet.
    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.sizes.iter().scan(0usize, |start, &n| {
            let range = *start..*start + n;
            *start += n;
            Some(range)
        })
    }

    /// Fail unless `other` has the same facets with the same sizes, in order.
    pub fn ensure_matches(&self, other: &FacetGrouping) -> MeshResult<()> {
        if self.sizes.len() != other.sizes.len() {
            return Err(MeshError::FacetMismatch(format!(
                "{} facets vs {} facets",
                self.sizes.len(),
                other.sizes.len()
            )));
        }
        if let Some(i) = (0..self.sizes.len()).find(|&i| self.sizes[i] != other.sizes[i]) {
            return Err(MeshError::FacetMismatch(format!(
                "facet {} has {} triangles vs {}",
                i + 1,
                self.sizes[i],
                other.sizes[i]
            )));
        }
        Ok(())
    }

    /// Fail unless a value array of length `len` covers exactly every triangle.
    pub fn ensure_len(&self, len: usize) -> MeshResult<()> {
        let expected = self.triangle_count();
        if len != expected {
            return Err(MeshError::LengthMismatch {
                expected,
                actual: len,
            });
        }
        Ok(())
    }
}
