// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Planar geometry primitives in micrometers
//!
//! Coordinates are `f64` micrometers. Polygons are stored open: the closing
//! edge from the last vertex back to the first is implicit.

pub mod clip;
pub mod ribbon;
pub mod union;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tolerance used for coincidence and on-boundary checks (micrometers)
pub const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Z component of `(b - self) x (c - self)`
    pub fn cross(&self, b: &Point, c: &Point) -> f64 {
        (b.x - self.x) * (c.y - self.y) - (b.y - self.y) * (c.x - self.x)
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn approx_eq(&self, other: &Point) -> bool {
        (self.x - other.x).abs() <= EPSILON && (self.y - other.y).abs() <= EPSILON
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.min.x <= other.max.x + EPSILON
            && other.min.x <= self.max.x + EPSILON
            && self.min.y <= other.max.y + EPSILON
            && other.min.y <= self.max.y + EPSILON
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} - {}]", self.min, self.max)
    }
}

/// Distance from `point` to the segment `a`-`b`, and the clamped parameter of
/// the closest point along it.
pub fn project_on_segment(point: &Point, a: &Point, b: &Point) -> (f64, f64) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_sq = dx * dx + dy * dy;

    if length_sq < EPSILON * EPSILON {
        return (point.distance(a), 0.0);
    }

    let t = (((point.x - a.x) * dx + (point.y - a.y) * dy) / length_sq).clamp(0.0, 1.0);
    (point.distance(&a.lerp(b, t)), t)
}

/// Closed polygon stored as an open vertex ring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub points: Vec<Point>,
}

impl Polygon {
    /// Build a polygon, dropping a duplicated closing vertex if present.
    pub fn new(mut points: Vec<Point>) -> Self {
        if points.len() > 1 && points[0].approx_eq(&points[points.len() - 1]) {
            points.pop();
        }
        Self { points }
    }

    /// Axis-aligned rectangle from two opposite corners
    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        let (xl, xh) = (x0.min(x1), x0.max(x1));
        let (yl, yh) = (y0.min(y1), y0.max(y1));
        Self {
            points: vec![
                Point::new(xl, yl),
                Point::new(xh, yl),
                Point::new(xh, yh),
                Point::new(xl, yh),
            ],
        }
    }

    /// Outline of a wire drawn along `centerline` with the given width.
    ///
    /// Ends are extended by `begin_extension` / `end_extension` along the
    /// first and last segments; interior vertices get miter joins. Returns
    /// `None` when the centerline has fewer than two distinct points.
    pub fn from_path(
        centerline: &[Point],
        width: f64,
        begin_extension: f64,
        end_extension: f64,
    ) -> Option<Self> {
        let mut points = deduplicate_vertices(centerline);
        // A closed centerline is still an open wire
        if centerline.len() > 1 && centerline[0].approx_eq(&centerline[centerline.len() - 1]) {
            points.push(points[0]);
        }
        if points.len() < 2 || width <= 0.0 {
            return None;
        }

        let unit = |a: &Point, b: &Point| {
            let length = a.distance(b);
            ((b.x - a.x) / length, (b.y - a.y) / length)
        };

        let last = points.len() - 1;
        let (dx, dy) = unit(&points[0], &points[1]);
        points[0] = Point::new(points[0].x - dx * begin_extension, points[0].y - dy * begin_extension);
        let (dx, dy) = unit(&points[last - 1], &points[last]);
        points[last] = Point::new(
            points[last].x + dx * end_extension,
            points[last].y + dy * end_extension,
        );

        let half = width * 0.5;
        let mut left = Vec::with_capacity(points.len());
        let mut right = Vec::with_capacity(points.len());

        for i in 0..points.len() {
            let incoming = (i > 0).then(|| unit(&points[i - 1], &points[i]));
            let outgoing = (i < last).then(|| unit(&points[i], &points[i + 1]));
            let normal_of = |(dx, dy): (f64, f64)| (-dy, dx);

            let (nx, ny, scale) = match (incoming, outgoing) {
                (Some(d1), Some(d2)) => {
                    let n1 = normal_of(d1);
                    let n2 = normal_of(d2);
                    let (sx, sy) = (n1.0 + n2.0, n1.1 + n2.1);
                    let norm = sx.hypot(sy);
                    if norm < 1e-12 {
                        // Full reversal, no meaningful miter
                        (n1.0, n1.1, half)
                    } else {
                        let (mx, my) = (sx / norm, sy / norm);
                        (mx, my, half / (mx * n1.0 + my * n1.1))
                    }
                }
                (Some(d), None) | (None, Some(d)) => {
                    let n = normal_of(d);
                    (n.0, n.1, half)
                }
                (None, None) => return None,
            };

            let p = points[i];
            left.push(Point::new(p.x + nx * scale, p.y + ny * scale));
            right.push(Point::new(p.x - nx * scale, p.y - ny * scale));
        }

        right.reverse();
        let mut outline = right;
        outline.extend(left);
        Some(Polygon::new(outline))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over the edges, including the closing one
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Shoelace area, positive for counter-clockwise rings
    pub fn signed_area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        self.edges()
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum::<f64>()
            * 0.5
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn perimeter(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        self.edges().map(|(a, b)| a.distance(&b)).sum()
    }

    pub fn is_counter_clockwise(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Area-weighted centroid, `None` for degenerate (zero-area) rings
    pub fn centroid(&self) -> Option<Point> {
        let area = self.signed_area();
        if area.abs() < EPSILON * EPSILON {
            return None;
        }

        let (mut cx, mut cy) = (0.0, 0.0);
        for (a, b) in self.edges() {
            let w = a.x * b.y - b.x * a.y;
            cx += (a.x + b.x) * w;
            cy += (a.y + b.y) * w;
        }
        Some(Point::new(cx / (6.0 * area), cy / (6.0 * area)))
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = self.points.first()?;
        let mut bbox = BoundingBox {
            min: *first,
            max: *first,
        };
        for p in &self.points[1..] {
            bbox.min.x = bbox.min.x.min(p.x);
            bbox.min.y = bbox.min.y.min(p.y);
            bbox.max.x = bbox.max.x.max(p.x);
            bbox.max.y = bbox.max.y.max(p.y);
        }
        Some(bbox)
    }

    /// Point-in-polygon test where the boundary counts as inside.
    ///
    /// Uses the even-odd rule so self-overlapping rings do not panic or loop.
    pub fn contains(&self, point: &Point) -> bool {
        if self.points.len() < 3 {
            return false;
        }

        if self
            .edges()
            .any(|(a, b)| project_on_segment(point, &a, &b).0 <= EPSILON)
        {
            return true;
        }

        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > point.y) != (b.y > point.y) {
                let x_cross = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if point.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// True when every turn has the same direction (collinear runs ignored)
    pub fn is_convex(&self) -> bool {
        let n = self.points.len();
        if n < 3 {
            return true;
        }

        let mut sign = 0;
        for i in 0..n {
            let cross = self.points[i].cross(&self.points[(i + 1) % n], &self.points[(i + 2) % n]);
            if cross.abs() > EPSILON {
                let current = if cross > 0.0 { 1 } else { -1 };
                if sign == 0 {
                    sign = current;
                } else if sign != current {
                    return false;
                }
            }
        }
        true
    }

    /// Copy with consecutive duplicate and collinear vertices removed
    pub fn simplified(&self) -> Polygon {
        let mut points = deduplicate_vertices(&self.points);

        // Collinear removal can expose new collinear triples, so iterate
        loop {
            let n = points.len();
            if n < 3 {
                break;
            }
            let keep: Vec<Point> = (0..n)
                .filter(|&i| {
                    let prev = points[(i + n - 1) % n];
                    let next = points[(i + 1) % n];
                    let cur = points[i];
                    let scale = prev.distance(&cur).max(cur.distance(&next)).max(1.0);
                    prev.cross(&cur, &next).abs() > EPSILON * scale
                        || (cur.x - prev.x) * (next.x - cur.x) + (cur.y - prev.y) * (next.y - cur.y)
                            < 0.0
                })
                .map(|i| points[i])
                .collect();
            if keep.len() == n {
                break;
            }
            points = keep;
        }

        Polygon { points }
    }

    /// Copy wound counter-clockwise
    pub fn to_counter_clockwise(&self) -> Polygon {
        let mut points = self.points.clone();
        if self.signed_area() < 0.0 {
            points.reverse();
        }
        Polygon { points }
    }
}

/// Remove duplicate consecutive vertices, including a duplicated closing vertex
fn deduplicate_vertices(points: &[Point]) -> Vec<Point> {
    let mut result: Vec<Point> = Vec::with_capacity(points.len());
    for &point in points {
        if result.last().map_or(true, |last| !last.approx_eq(&point)) {
            result.push(point);
        }
    }
    while result.len() > 1 && result[0].approx_eq(&result[result.len() - 1]) {
        result.pop();
    }
    result
}
