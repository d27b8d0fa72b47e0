// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Route report: shortest connected length between any two ports
//!
//! Ports are joined by name, so a port reached by several paths links them
//! into one network.

use indexmap::IndexMap;
use petgraph::algo::dijkstra;
use petgraph::graph::{NodeIndex, UnGraph};

use super::{NodeFilter, PathRecord, PathSegment};

/// Shortest distance for every pair of connected ports.
///
/// Pairs follow the order in which port names first appear in `segments`.
/// Unreachable pairs and pairs at zero distance are left out. The filter is
/// applied after the search, so hidden ports still connect visible ones.
pub fn resolve_routes(segments: &[PathSegment], node_filter: &NodeFilter) -> Vec<PathRecord> {
    let mut graph: UnGraph<String, f64> = UnGraph::new_undirected();
    let mut nodes: IndexMap<String, NodeIndex> = IndexMap::new();

    for segment in segments {
        let a = *nodes
            .entry(segment.port1.clone())
            .or_insert_with(|| graph.add_node(segment.port1.clone()));
        let b = *nodes
            .entry(segment.port2.clone())
            .or_insert_with(|| graph.add_node(segment.port2.clone()));
        graph.add_edge(a, b, segment.length);
    }
    log::debug!(
        "[ROUTE] graph with {} ports and {} segments",
        graph.node_count(),
        graph.edge_count()
    );

    let mut records = Vec::new();
    for (i, (name, &start)) in nodes.iter().enumerate() {
        let distances = dijkstra(&graph, start, None, |edge| *edge.weight());
        for (other, end) in nodes.iter().skip(i + 1) {
            let Some(&length) = distances.get(end) else {
                continue;
            };
            if length > 0.0 && node_filter.allows_pair(name, other) {
                records.push(PathRecord {
                    port1: name.clone(),
                    port2: other.clone(),
                    length,
                });
            }
        }
    }
    records
}
