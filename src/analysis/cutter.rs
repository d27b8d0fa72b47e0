// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Path cutter: finds where ports cross path polygons

use std::collections::HashMap;

use indexmap::IndexMap;

use super::{CutPoint, Diagnostics, PathCuts, Port};
use crate::error::{GeometryWarning, PathFailure};
use crate::geometry::clip::{overlap, Overlap};
use crate::geometry::ribbon::Ribbon;
use crate::layout::Shape;

/// Cut points of every measurable path polygon, in path discovery order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CutMap {
    paths: IndexMap<usize, PathCuts>,
}

impl CutMap {
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn get(&self, path: usize) -> Option<&PathCuts> {
        self.paths.get(&path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathCuts> {
        self.paths.values()
    }
}

/// Intersect every path polygon with every port's cutting polygon.
///
/// A path needs at least two cut points to be measured. Cut points are
/// sorted by their position along the path; ports sharing one cutting
/// polygon keep their label order.
pub fn cut_paths(paths: &[Shape], ports: &[Port], diagnostics: &mut Diagnostics) -> CutMap {
    let mut map = CutMap::default();

    for (index, shape) in paths.iter().enumerate() {
        let mut overlaps: HashMap<usize, Option<Overlap>> = HashMap::new();
        let crossing: Vec<(&Port, Overlap)> = ports
            .iter()
            .filter_map(|port| {
                let hit = *overlaps
                    .entry(port.cut)
                    .or_insert_with(|| overlap(&shape.polygon, &port.polygon));
                hit.map(|ov| (port, ov))
            })
            .collect();

        let bbox = shape.polygon.bounding_box().unwrap_or_default();
        if crossing.len() < 2 {
            diagnostics.warn(GeometryWarning::UnterminatedPath {
                path: index,
                cell: shape.cell.clone(),
                bbox,
                cut_count: crossing.len(),
            });
            continue;
        }

        let ribbon = match Ribbon::from_polygon(&shape.polygon) {
            Ok(ribbon) => ribbon,
            Err(error) => {
                diagnostics.fail(PathFailure {
                    path: index,
                    cell: shape.cell.clone(),
                    bbox,
                    ports: crossing.iter().map(|(port, _)| port.name.clone()).collect(),
                    error,
                });
                continue;
            }
        };

        let mut cuts: Vec<CutPoint> = crossing
            .iter()
            .map(|(port, ov)| CutPoint {
                path: index,
                port: port.name.clone(),
                position: ov.centroid,
                offset: ribbon.offset(&ov.centroid),
            })
            .collect();
        cuts.sort_by(|a, b| a.offset.total_cmp(&b.offset));

        log::debug!(
            "[CUT] path #{} in '{}': {} cut points, {:.3} um cap to cap, width {:.3} um",
            index,
            shape.cell,
            cuts.len(),
            ribbon.centerline_length(),
            ribbon.width()
        );

        map.paths.insert(
            index,
            PathCuts {
                path: index,
                cell: shape.cell.clone(),
                ribbon,
                cuts,
            },
        );
    }

    map
}
