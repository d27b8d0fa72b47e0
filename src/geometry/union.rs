// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Merging of overlapping polygons into single outlines

use geo::{BooleanOps, Coord, LineString, MultiPolygon, Polygon as GeoPolygon};
use indexmap::IndexMap;

use super::clip::overlap;
use super::{Point, Polygon};

/// Partition `polygons` into groups joined by positive-area overlap.
///
/// Overlap is transitive: a chain of pairwise overlapping polygons forms one
/// group. Groups come out ordered by their first member and list members in
/// input order. Touching edges do not join groups.
pub fn overlap_groups(polygons: &[Polygon]) -> Vec<Vec<usize>> {
    let boxes: Vec<_> = polygons.iter().map(Polygon::bounding_box).collect();
    let mut parent: Vec<usize> = (0..polygons.len()).collect();

    for i in 0..polygons.len() {
        for j in i + 1..polygons.len() {
            let near = matches!((&boxes[i], &boxes[j]), (Some(a), Some(b)) if a.overlaps(b));
            if !near || overlap(&polygons[i], &polygons[j]).is_none() {
                continue;
            }
            let (a, b) = (find_root(&mut parent, i), find_root(&mut parent, j));
            // The lower index stays the root, so roots are first members
            parent[a.max(b)] = a.min(b);
        }
    }

    let mut groups: IndexMap<usize, Vec<usize>> = IndexMap::new();
    for i in 0..polygons.len() {
        let root = find_root(&mut parent, i);
        groups.entry(root).or_default().push(i);
    }
    groups.into_values().collect()
}

fn find_root(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

/// Outer outlines of the union of `polygons`.
///
/// Holes are dropped: a routed path has none, and a ring-shaped union is not
/// measurable either way.
pub fn union(polygons: &[&Polygon]) -> Vec<Polygon> {
    let mut result: Option<MultiPolygon<f64>> = None;

    for polygon in polygons.iter().filter(|polygon| polygon.len() >= 3) {
        let coords: Vec<Coord<f64>> = polygon
            .points
            .iter()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect();
        let geo_polygon: MultiPolygon<f64> =
            GeoPolygon::new(LineString::from(coords), vec![]).into();

        result = Some(match result {
            Some(existing) => existing.union(&geo_polygon),
            None => geo_polygon,
        });
    }

    let Some(merged) = result else {
        return Vec::new();
    };

    merged
        .into_iter()
        .filter_map(|polygon| {
            if !polygon.interiors().is_empty() {
                log::debug!(
                    "Dropping {} holes from a merged outline",
                    polygon.interiors().len()
                );
            }
            let outline = Polygon::new(
                polygon
                    .exterior()
                    .coords()
                    .map(|c| Point::new(c.x, c.y))
                    .collect(),
            )
            .simplified();
            (outline.len() >= 3).then_some(outline)
        })
        .collect()
}
