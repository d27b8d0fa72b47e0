// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Polygon overlap: area and centroid of the intersection of two polygons

use super::{Point, Polygon, EPSILON};

/// Minimum overlap area (square micrometers) that counts as a real overlap
pub const MIN_OVERLAP_AREA: f64 = 1e-9;

/// Summary of the region shared by two polygons
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    pub area: f64,
    pub centroid: Point,
}

/// Compute the overlap of `subject` (any simple ring, concave allowed) with
/// `clip`.
///
/// Convex clip rings are handled directly with Sutherland-Hodgman. Concave
/// clip rings are ear-clipped into triangles first and the per-triangle
/// results are accumulated. Returns `None` when the shared area is below
/// [`MIN_OVERLAP_AREA`], so touching edges do not count.
pub fn overlap(subject: &Polygon, clip: &Polygon) -> Option<Overlap> {
    let subject = subject.simplified();
    let clip = clip.simplified().to_counter_clockwise();
    if subject.len() < 3 || clip.len() < 3 {
        return None;
    }

    match (subject.bounding_box(), clip.bounding_box()) {
        (Some(a), Some(b)) if a.overlaps(&b) => {}
        _ => return None,
    }

    let pieces = if clip.is_convex() {
        vec![clip]
    } else {
        triangulate(&clip)
    };

    let mut area = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for piece in &pieces {
        let clipped = clip_convex(&subject, piece);
        // Sutherland-Hodgman keeps the orientation of the subject ring
        let piece_area = clipped.signed_area().abs();
        if piece_area < EPSILON * EPSILON {
            continue;
        }
        if let Some(c) = clipped.centroid() {
            area += piece_area;
            cx += c.x * piece_area;
            cy += c.y * piece_area;
        }
    }

    if area < MIN_OVERLAP_AREA {
        return None;
    }

    Some(Overlap {
        area,
        centroid: Point::new(cx / area, cy / area),
    })
}

/// Sutherland-Hodgman clipping of `subject` by the convex CCW ring `clip`.
///
/// A concave subject split into several pieces comes back as one ring joined
/// by zero-area bridges; area and centroid stay exact.
fn clip_convex(subject: &Polygon, clip: &Polygon) -> Polygon {
    let mut output = subject.points.clone();

    for (a, b) in clip.edges() {
        if output.is_empty() {
            break;
        }
        let input = std::mem::take(&mut output);
        let n = input.len();
        for i in 0..n {
            let current = input[i];
            let previous = input[(i + n - 1) % n];
            let current_in = a.cross(&b, &current) >= -EPSILON;
            let previous_in = a.cross(&b, &previous) >= -EPSILON;

            if current_in {
                if !previous_in {
                    output.push(line_intersection(&previous, &current, &a, &b));
                }
                output.push(current);
            } else if previous_in {
                output.push(line_intersection(&previous, &current, &a, &b));
            }
        }
    }

    Polygon { points: output }
}

/// Intersection of segment `p`-`q` with the infinite line through `a`-`b`
fn line_intersection(p: &Point, q: &Point, a: &Point, b: &Point) -> Point {
    let dp = a.cross(b, p);
    let dq = a.cross(b, q);
    let denom = dp - dq;
    if denom.abs() < f64::EPSILON {
        return *q;
    }
    p.lerp(q, dp / denom)
}

/// Ear-clipping triangulation of a simple CCW ring
fn triangulate(polygon: &Polygon) -> Vec<Polygon> {
    let mut indices: Vec<usize> = (0..polygon.len()).collect();
    let points = &polygon.points;
    let mut triangles = Vec::with_capacity(polygon.len().saturating_sub(2));

    // Each pass removes one ear; bail out on rings with no ear (self-crossing)
    while indices.len() > 3 {
        let n = indices.len();
        let ear = (0..n).find(|&i| {
            let a = points[indices[(i + n - 1) % n]];
            let b = points[indices[i]];
            let c = points[indices[(i + 1) % n]];
            if a.cross(&b, &c) <= EPSILON {
                return false;
            }
            let triangle = Polygon {
                points: vec![a, b, c],
            };
            !indices.iter().any(|&k| {
                let p = points[k];
                !p.approx_eq(&a)
                    && !p.approx_eq(&b)
                    && !p.approx_eq(&c)
                    && triangle.contains(&p)
            })
        });

        match ear {
            Some(i) => {
                let a = points[indices[(i + n - 1) % n]];
                let b = points[indices[i]];
                let c = points[indices[(i + 1) % n]];
                triangles.push(Polygon {
                    points: vec![a, b, c],
                });
                indices.remove(i);
            }
            None => {
                log::debug!(
                    "Ear clipping stalled with {} vertices left, using the remaining fan",
                    indices.len()
                );
                break;
            }
        }
    }

    // Whatever remains is fanned from its first vertex
    for i in 1..indices.len().saturating_sub(1) {
        triangles.push(Polygon {
            points: vec![
                points[indices[0]],
                points[indices[i]],
                points[indices[i + 1]],
            ],
        });
    }

    triangles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_rectangles() {
        let path = Polygon::rect(0.0, 0.0, 100.0, 0.5);
        let cut = Polygon::rect(49.0, -1.0, 51.0, 1.0);
        let overlap = overlap(&path, &cut).unwrap();
        assert!((overlap.area - 1.0).abs() < 1e-9);
        assert!((overlap.centroid.x - 50.0).abs() < 1e-9);
        assert!((overlap.centroid.y - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Polygon::rect(0.0, 0.0, 1.0, 1.0);
        let b = Polygon::rect(1.0, 0.0, 2.0, 1.0);
        assert!(overlap(&a, &b).is_none());
    }

    #[test]
    fn test_disjoint() {
        let a = Polygon::rect(0.0, 0.0, 1.0, 1.0);
        let b = Polygon::rect(5.0, 5.0, 6.0, 6.0);
        assert!(overlap(&a, &b).is_none());
    }

    #[test]
    fn test_concave_subject() {
        // L-shaped path, cut box over the vertical leg
        let path = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(9.0, 10.0),
            Point::new(9.0, 1.0),
            Point::new(0.0, 1.0),
        ]);
        let cut = Polygon::rect(8.0, 5.0, 11.0, 6.0);
        let overlap = overlap(&path, &cut).unwrap();
        assert!((overlap.area - 1.0).abs() < 1e-9);
        assert!((overlap.centroid.x - 9.5).abs() < 1e-9);
        assert!((overlap.centroid.y - 5.5).abs() < 1e-9);
    }

    #[test]
    fn test_concave_clip() {
        // U-shaped marker straddling a thin horizontal path
        let cut = Polygon::new(vec![
            Point::new(0.0, -2.0),
            Point::new(3.0, -2.0),
            Point::new(3.0, 2.0),
            Point::new(2.0, 2.0),
            Point::new(2.0, -1.0),
            Point::new(1.0, -1.0),
            Point::new(1.0, 2.0),
            Point::new(0.0, 2.0),
        ]);
        let path = Polygon::rect(-5.0, 0.0, 5.0, 1.0);
        let overlap = overlap(&path, &cut).unwrap();
        assert!((overlap.area - 2.0).abs() < 1e-9);
        assert!((overlap.centroid.x - 1.5).abs() < 1e-9);
    }
}
