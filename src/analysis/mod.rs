// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Path length measurement pipeline
//!
//! Geometry source -> port locator -> path merger -> path cutter ->
//! centerline lengths -> path-pair resolver. Everything here is pure: the same layout always gives
//! the same records in the same order.

pub mod cutter;
pub mod length;
pub mod merge;
pub mod ports;
pub mod resolve;
pub mod routes;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::{GeometryWarning, PathFailure};
use crate::geometry::ribbon::Ribbon;
use crate::geometry::{Point, Polygon};
use crate::layout::{GeometrySource, LayerSpec};

pub use cutter::{cut_paths, CutMap};
pub use length::segment_length;
pub use merge::merge_paths;
pub use ports::locate_ports;
pub use resolve::{resolve, segments};
pub use routes::resolve_routes;

/// A named endpoint: a cutting polygon plus one label inside it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    pub anchor: Point,
    /// Index of the cutting polygon in discovery order
    pub cut: usize,
    pub cell: String,
    pub polygon: Polygon,
}

/// Where a port's cutting polygon crosses one path polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutPoint {
    pub path: usize,
    pub port: String,
    /// Centroid of the overlap between the path and the cutting polygon
    pub position: Point,
    /// Arc-length coordinate along the path's first rail
    pub offset: f64,
}

/// Path polygon with its ribbon and ordered cut points
#[derive(Debug, Clone, PartialEq)]
pub struct PathCuts {
    /// Index among the path outlines left after merging overlaps
    pub path: usize,
    pub cell: String,
    pub ribbon: Ribbon,
    pub cuts: Vec<CutPoint>,
}

/// Centerline stretch between two consecutive cut points of one path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    pub path: usize,
    pub port1: String,
    pub port2: String,
    pub length: f64,
}

/// One row of the result table, length in micrometers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRecord {
    pub port1: String,
    pub port2: String,
    pub length: f64,
}

impl From<&PathSegment> for PathRecord {
    fn from(segment: &PathSegment) -> Self {
        Self {
            port1: segment.port1.clone(),
            port2: segment.port2.clone(),
            length: segment.length,
        }
    }
}

/// Port names to report; empty means report everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeFilter {
    nodes: IndexSet<String>,
}

impl NodeFilter {
    pub fn new<I, S>(nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            nodes: nodes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allows(&self, name: &str) -> bool {
        self.nodes.is_empty() || self.nodes.contains(name)
    }

    /// Both ends must pass for a record to be kept
    pub fn allows_pair(&self, port1: &str, port2: &str) -> bool {
        self.allows(port1) && self.allows(port2)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }
}

/// Which table to produce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// Consecutive ports along each path polygon
    #[default]
    Segments,
    /// Shortest connected distance between every pair of ports
    Routes,
}

/// Plain-value inputs of the core
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    pub path_layer: LayerSpec,
    pub cutting_layer: LayerSpec,
    pub nodes: NodeFilter,
    pub report: ReportKind,
}

impl AnalysisOptions {
    pub fn new(path_layer: LayerSpec, cutting_layer: LayerSpec) -> Self {
        Self {
            path_layer,
            cutting_layer,
            nodes: NodeFilter::default(),
            report: ReportKind::default(),
        }
    }
}

/// Warnings and per-path failures gathered during a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    pub warnings: Vec<GeometryWarning>,
    pub failures: Vec<PathFailure>,
}

impl Diagnostics {
    pub fn warn(&mut self, warning: GeometryWarning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    pub fn fail(&mut self, failure: PathFailure) {
        log::warn!("{failure}");
        self.failures.push(failure);
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.failures.is_empty()
    }
}

/// Everything a run produces
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub ports: Vec<Port>,
    pub cut_map: CutMap,
    pub segments: Vec<PathSegment>,
    pub records: Vec<PathRecord>,
    pub diagnostics: Diagnostics,
}

/// Run the whole pipeline against `source`
pub fn analyze<S>(source: &S, options: &AnalysisOptions) -> Analysis
where
    S: GeometrySource + ?Sized,
{
    let cutting = source.polygons(options.cutting_layer);
    let labels = source.labels(options.cutting_layer);
    let paths = source.polygons(options.path_layer);
    log::info!(
        "[INFO] {} path polygons on {}, {} cutting polygons and {} labels on {}",
        paths.len(),
        options.path_layer,
        cutting.len(),
        labels.len(),
        options.cutting_layer
    );

    let mut diagnostics = Diagnostics::default();
    let ports = locate_ports(&cutting, &labels, &mut diagnostics);

    for node in options.nodes.iter() {
        if !ports.iter().any(|port| port.name == node) {
            log::warn!("Node '{node}' from the filter matches no port");
        }
    }

    let paths = merge_paths(&paths);
    let cut_map = cut_paths(&paths, &ports, &mut diagnostics);
    let segments = segments(&cut_map);
    let records = match options.report {
        ReportKind::Segments => resolve::filter_segments(&segments, &options.nodes),
        ReportKind::Routes => resolve_routes(&segments, &options.nodes),
    };

    log::info!(
        "[INFO] {} ports, {} measured paths, {} segments, {} records, {} warnings, {} failures",
        ports.len(),
        cut_map.len(),
        segments.len(),
        records.len(),
        diagnostics.warnings.len(),
        diagnostics.failures.len()
    );

    Analysis {
        ports,
        cut_map,
        segments,
        records,
        diagnostics,
    }
}
