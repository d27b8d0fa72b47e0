// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Path merger: joins overlapping path polygons into one outline each

use crate::geometry::union::{overlap_groups, union};
use crate::geometry::Polygon;
use crate::layout::Shape;

/// Union every group of overlapping path polygons.
///
/// A wire drawn as several overlapping rectangles becomes one ribbon. Lone
/// polygons pass through untouched. Merged outlines take the cell and layer
/// of the group's first polygon and sit at its position in the output.
pub fn merge_paths(paths: &[Shape]) -> Vec<Shape> {
    let polygons: Vec<Polygon> = paths.iter().map(|shape| shape.polygon.clone()).collect();
    let mut merged = Vec::with_capacity(paths.len());

    for group in overlap_groups(&polygons) {
        let first = &paths[group[0]];
        if group.len() == 1 {
            merged.push(first.clone());
            continue;
        }

        let members: Vec<&Polygon> = group.iter().map(|&i| &polygons[i]).collect();
        let outlines = union(&members);
        log::debug!(
            "Merged path polygons {:?} in cell '{}' into {} outline(s)",
            group,
            first.cell,
            outlines.len()
        );
        merged.extend(outlines.into_iter().map(|polygon| Shape {
            cell: first.cell.clone(),
            layer: first.layer,
            polygon,
        }));
    }

    if merged.len() != paths.len() {
        log::info!(
            "[INFO] Merged {} overlapping path polygons into {} outlines",
            paths.len(),
            merged.len()
        );
    }
    merged
}
