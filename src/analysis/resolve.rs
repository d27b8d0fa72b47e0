// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Path-pair resolver: consecutive cut points become report records

use super::{CutMap, NodeFilter, PathRecord, PathSegment};

/// Every consecutive pair of cut points, path by path in traversal order
pub fn segments(cut_map: &CutMap) -> Vec<PathSegment> {
    let mut segments = Vec::new();
    for path in cut_map.iter() {
        for pair in path.cuts.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let length = path.ribbon.length_between(&a.position, &b.position);
            log::debug!(
                "[SEG] path #{}: {} -> {} = {:.6} um",
                path.path,
                a.port,
                b.port,
                length
            );
            segments.push(PathSegment {
                path: path.path,
                port1: a.port.clone(),
                port2: b.port.clone(),
                length,
            });
        }
    }
    segments
}

/// Keep the segments whose two ports both pass `filter`
pub fn filter_segments(segments: &[PathSegment], filter: &NodeFilter) -> Vec<PathRecord> {
    segments
        .iter()
        .filter(|segment| filter.allows_pair(&segment.port1, &segment.port2))
        .map(PathRecord::from)
        .collect()
}

pub fn resolve(cut_map: &CutMap, node_filter: &NodeFilter) -> Vec<PathRecord> {
    filter_segments(&segments(cut_map), node_filter)
}
