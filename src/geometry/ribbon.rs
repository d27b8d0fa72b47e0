// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Ribbon decomposition of routed-path polygons
//!
//! A routed path is a constant- or near-constant-width ribbon. Its boundary
//! splits into two end caps and two rails running alongside each other. The
//! centerline length between two points is the mean of the distances walked
//! along each rail.

use super::{project_on_segment, Point, Polygon, EPSILON};
use crate::error::GeometryError;

/// Caps within this fraction of the ribbon width count as path ends when
/// looking for branches.
const CAP_TOLERANCE: f64 = 0.25;

/// The rails on either side of an end cap run back against each other. The
/// cosine between their directions must fall below this value, which rejects
/// the short convex edges of a polygonal arc.
const FLANK_COSINE: f64 = -0.5;

/// One side of a ribbon, as a polyline with cumulative arc lengths
#[derive(Debug, Clone, PartialEq)]
pub struct Rail {
    points: Vec<Point>,
    cumulative: Vec<f64>,
}

impl Rail {
    fn new(points: Vec<Point>) -> Self {
        let mut cumulative = Vec::with_capacity(points.len());
        let mut total = 0.0;
        cumulative.push(0.0);
        for pair in points.windows(2) {
            total += pair[0].distance(&pair[1]);
            cumulative.push(total);
        }
        Self { points, cumulative }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Arc-length coordinate of the rail point closest to `point`
    pub fn project(&self, point: &Point) -> f64 {
        let mut best_distance = f64::INFINITY;
        let mut best_offset = 0.0;

        for (k, pair) in self.points.windows(2).enumerate() {
            let (distance, t) = project_on_segment(point, &pair[0], &pair[1]);
            // Strictly closer only, so ties resolve to the earlier segment
            if distance < best_distance - EPSILON {
                best_distance = distance;
                best_offset = self.cumulative[k] + t * (self.cumulative[k + 1] - self.cumulative[k]);
            }
        }

        best_offset
    }
}

/// A path polygon decomposed into two rails between its end caps
#[derive(Debug, Clone, PartialEq)]
pub struct Ribbon {
    rails: [Rail; 2],
    width: f64,
}

impl Ribbon {
    /// Decompose `polygon` into a ribbon.
    ///
    /// Fails with [`GeometryError`] for degenerate polygons, shapes whose
    /// area and perimeter admit no ribbon length, shapes without two end caps
    /// and branching shapes with more than two ends.
    pub fn from_polygon(polygon: &Polygon) -> Result<Self, GeometryError> {
        let poly = polygon.simplified().to_counter_clockwise();
        let points = &poly.points;
        let n = points.len();
        if n < 4 {
            return Err(GeometryError::TooFewVertices(n));
        }

        let width = estimate_width(&poly)?;

        let convex: Vec<bool> = (0..n)
            .map(|i| points[(i + n - 1) % n].cross(&points[i], &points[(i + 1) % n]) > 0.0)
            .collect();

        // Edge i runs from points[i] to points[i + 1]; an end cap turns the
        // same way at both of its corners and reverses the walking direction.
        let mut candidates: Vec<(usize, f64)> = (0..n)
            .filter(|&i| convex[i] && convex[(i + 1) % n])
            .filter(|&i| {
                let before = &points[(i + n - 1) % n];
                let after = &points[(i + 2) % n];
                direction_cosine(before, &points[i], &points[(i + 1) % n], after) < FLANK_COSINE
            })
            .map(|i| {
                let length = points[i].distance(&points[(i + 1) % n]);
                (i, (length - width).abs())
            })
            .collect();

        let adjacent = |a: usize, b: usize| (a + 1) % n == b || (b + 1) % n == a;

        let ends = count_separate_ends(&candidates, width, &adjacent);
        if ends > 2 {
            return Err(GeometryError::Branching(ends));
        }

        candidates.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        let first = candidates
            .first()
            .map(|c| c.0)
            .ok_or_else(|| GeometryError::NotARibbon("no end cap found".to_string()))?;
        let second = candidates
            .iter()
            .map(|c| c.0)
            .find(|&c| c != first && !adjacent(first, c))
            .ok_or_else(|| {
                GeometryError::NotARibbon("only one end cap found".to_string())
            })?;

        let (i, j) = (first.min(second), first.max(second));

        let mut rail_a: Vec<Point> = points[i + 1..=j].to_vec();
        let mut rail_b: Vec<Point> = points[j + 1..]
            .iter()
            .chain(points[..=i].iter())
            .copied()
            .collect();
        rail_b.reverse();

        // Walk from the end cap that sits lowest-left in the layout
        let cap_i = points[i].midpoint(&points[i + 1]);
        let cap_j = points[j].midpoint(&points[(j + 1) % n]);
        let j_first = cap_j.x < cap_i.x - EPSILON
            || ((cap_j.x - cap_i.x).abs() <= EPSILON && cap_j.y < cap_i.y);
        // The first rail is the right-hand side when walking from the start cap
        let rails = if j_first {
            rail_a.reverse();
            rail_b.reverse();
            [Rail::new(rail_b), Rail::new(rail_a)]
        } else {
            [Rail::new(rail_a), Rail::new(rail_b)]
        };

        Ok(Self { rails, width })
    }

    /// Estimated ribbon width
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn rails(&self) -> &[Rail; 2] {
        &self.rails
    }

    /// Ordering coordinate of `point` along the ribbon (first rail)
    pub fn offset(&self, point: &Point) -> f64 {
        self.rails[0].project(point)
    }

    /// Centerline length between two points on the ribbon
    pub fn length_between(&self, a: &Point, b: &Point) -> f64 {
        let total: f64 = self
            .rails
            .iter()
            .map(|rail| (rail.project(a) - rail.project(b)).abs())
            .sum();
        total * 0.5
    }

    /// Centerline length from cap to cap
    pub fn centerline_length(&self) -> f64 {
        (self.rails[0].length() + self.rails[1].length()) * 0.5
    }
}

/// Solve `A = L * w` and `P = 2 (L + w)` for the width of a ribbon.
fn estimate_width(poly: &Polygon) -> Result<f64, GeometryError> {
    let area = poly.area();
    let perimeter = poly.perimeter();
    let quarter = perimeter / 4.0;
    let discriminant = quarter * quarter - area;

    // Rounding can push a square-ish shape just below zero
    let tolerance = 1e-9 * quarter * quarter;
    if discriminant < -tolerance {
        log::debug!(
            "area = {area}, perimeter = {perimeter}, negative value {discriminant} in sqrt"
        );
        return Err(GeometryError::NotARibbon(format!(
            "area {area:.6} and perimeter {perimeter:.6} admit no real length"
        )));
    }

    let length = quarter + discriminant.max(0.0).sqrt();
    let width = area / length;
    if !width.is_finite() || width <= EPSILON {
        return Err(GeometryError::NotARibbon("zero width".to_string()));
    }
    Ok(width)
}

/// Cosine of the angle between edge `a0 -> a1` and edge `b0 -> b1`
fn direction_cosine(a0: &Point, a1: &Point, b0: &Point, b1: &Point) -> f64 {
    let (ax, ay) = (a1.x - a0.x, a1.y - a0.y);
    let (bx, by) = (b1.x - b0.x, b1.y - b0.y);
    let norm = ax.hypot(ay) * bx.hypot(by);
    if norm <= EPSILON * EPSILON {
        return 0.0;
    }
    (ax * bx + ay * by) / norm
}

/// Count cap-sized candidate edges that are not next to one another.
fn count_separate_ends(
    candidates: &[(usize, f64)],
    width: f64,
    adjacent: impl Fn(usize, usize) -> bool,
) -> usize {
    let mut counted: Vec<usize> = Vec::new();
    for &(index, deviation) in candidates {
        if deviation <= CAP_TOLERANCE * width && !counted.iter().any(|&c| adjacent(c, index)) {
            counted.push(index);
        }
    }
    counted.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_ribbon_rails() {
        let ribbon = Ribbon::from_polygon(&Polygon::rect(0.0, 0.0, 100.0, 2.0)).unwrap();
        assert!((ribbon.width() - 2.0).abs() < 1e-9);
        assert!((ribbon.rails()[0].length() - 100.0).abs() < 1e-9);
        assert!((ribbon.rails()[1].length() - 100.0).abs() < 1e-9);
        // Rails start at the left cap
        assert_eq!(ribbon.rails()[0].points()[0].x, 0.0);
        assert_eq!(ribbon.rails()[1].points()[0].x, 0.0);
    }

    #[test]
    fn test_clockwise_input_is_accepted() {
        let mut rect = Polygon::rect(0.0, 0.0, 50.0, 1.0);
        rect.points.reverse();
        let ribbon = Ribbon::from_polygon(&rect).unwrap();
        assert!((ribbon.centerline_length() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_triangle_is_rejected() {
        let triangle = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        ]);
        assert_eq!(
            Ribbon::from_polygon(&triangle),
            Err(GeometryError::TooFewVertices(3))
        );
    }

    #[test]
    fn test_arc_edges_are_not_caps() {
        // Quarter annulus: only the two radial edges are ends
        let mut outline = Vec::new();
        for k in 0..=16 {
            let angle = std::f64::consts::FRAC_PI_2 * k as f64 / 16.0;
            outline.push(Point::new(5.25 * angle.cos(), 5.25 * angle.sin()));
        }
        for k in (0..=16).rev() {
            let angle = std::f64::consts::FRAC_PI_2 * k as f64 / 16.0;
            outline.push(Point::new(4.75 * angle.cos(), 4.75 * angle.sin()));
        }
        let ribbon = Ribbon::from_polygon(&Polygon::new(outline)).unwrap();
        assert!((ribbon.width() - 0.5).abs() < 1e-2);
        // Both rails start on the cap lying on the y axis
        assert!(ribbon.rails()[0].points()[0].x.abs() < 1e-9);
        assert!(ribbon.rails()[1].points()[0].x.abs() < 1e-9);
    }

    #[test]
    fn test_rail_projection() {
        let rail = Rail::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ]);
        assert!((rail.project(&Point::new(4.0, 1.0)) - 4.0).abs() < 1e-12);
        assert!((rail.project(&Point::new(11.0, 6.0)) - 16.0).abs() < 1e-12);
        assert!((rail.length() - 20.0).abs() < 1e-12);
    }
}
