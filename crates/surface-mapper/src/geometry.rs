//! Planar polygons and convex clipping.
//!
//! Triangle/cell overlap is computed by clipping the triangle against the four
//! half-planes of the cell (Sutherland-Hodgman). Both inputs are convex, so
//! the result is the exact intersection polygon up to floating-point error.

use mesh_common::BoundingBox;

/// A point in the XY plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn lerp(self, other: Point2, t: f64) -> Point2 {
        Point2::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Point2::new(x, y)
    }
}

/// Twice the signed area of `(a, b, c)`; positive when `c` is left of `a -> b`.
#[inline]
fn cross(a: Point2, b: Point2, c: Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// A simple polygon given by its vertex ring (not repeated at the end).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    vertices: Vec<Point2>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point2>) -> Self {
        Self { vertices }
    }

    pub fn triangle(a: Point2, b: Point2, c: Point2) -> Self {
        Self::new(vec![a, b, c])
    }

    /// Axis-aligned rectangle from two opposite corners, counter-clockwise.
    pub fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        let (min_x, max_x) = (x0.min(x1), x0.max(x1));
        let (min_y, max_y) = (y0.min(y1), y0.max(y1));
        Self::new(vec![
            Point2::new(min_x, min_y),
            Point2::new(max_x, min_y),
            Point2::new(max_x, max_y),
            Point2::new(min_x, max_y),
        ])
    }

    pub fn from_bbox(bbox: &BoundingBox) -> Self {
        Self::rectangle(bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y)
    }

    pub fn vertices(&self) -> &[Point2] {
        &self.vertices
    }

    /// Fewer than three vertices enclose nothing.
    pub fn is_empty(&self) -> bool {
        self.vertices.len() < 3
    }

    /// Shoelace area, positive for counter-clockwise rings.
    pub fn signed_area(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let n = self.vertices.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let p = self.vertices[i];
                let q = self.vertices[(i + 1) % n];
                p.x * q.y - q.x * p.y
            })
            .sum();
        0.5 * twice
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Same ring, reversed if needed so that it winds counter-clockwise.
    pub fn to_ccw(mut self) -> Self {
        if self.signed_area() < 0.0 {
            self.vertices.reverse();
        }
        self
    }

    /// Intersection of two convex polygons.
    ///
    /// Returns an empty polygon when they are disjoint. Polygons touching only
    /// along an edge or at a vertex produce a zero-area result.
    pub fn intersection(&self, clip: &Polygon) -> Polygon {
        if self.is_empty() || clip.is_empty() {
            return Polygon::default();
        }

        let clip = clip.clone().to_ccw();
        let mut output = self.clone().to_ccw().vertices;

        let n = clip.vertices.len();
        for i in 0..n {
            if output.is_empty() {
                break;
            }
            let p = clip.vertices[i];
            let q = clip.vertices[(i + 1) % n];
            output = clip_half_plane(&output, p, q);
        }

        Polygon::new(output)
    }
}

/// Keep the part of `input` on the left of the directed line `p -> q`.
fn clip_half_plane(input: &[Point2], p: Point2, q: Point2) -> Vec<Point2> {
    let mut output = Vec::with_capacity(input.len() + 2);
    let n = input.len();

    for i in 0..n {
        let current = input[i];
        let previous = input[(i + n - 1) % n];
        let d_cur = cross(p, q, current);
        let d_prev = cross(p, q, previous);

        if d_cur >= 0.0 {
            if d_prev < 0.0 {
                output.push(previous.lerp(current, d_prev / (d_prev - d_cur)));
            }
            output.push(current);
        } else if d_prev >= 0.0 {
            output.push(previous.lerp(current, d_prev / (d_prev - d_cur)));
        }
    }

    output
}

/// Area of the intersection of a triangle with an axis-aligned cell.
pub fn triangle_cell_overlap(triangle: &[(f64, f64); 3], cell: &BoundingBox) -> f64 {
    let tri = Polygon::triangle(triangle[0].into(), triangle[1].into(), triangle[2].into());
    tri.intersection(&Polygon::from_bbox(cell)).area()
}
