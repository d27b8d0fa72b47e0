// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Error and warning types
//!
//! Configuration errors are fatal and stop a run before any geometry is
//! examined. Geometry warnings and errors are collected per element and
//! returned next to the measurements.

use std::path::PathBuf;

use thiserror::Error;

use crate::geometry::BoundingBox;

/// Problems detected before the measurement core runs
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} file can't be found")]
    FileNotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {message}")]
    Yaml { path: PathBuf, message: String },
    #[error("invalid layer specification '{0}', expected LAYER/DATATYPE")]
    InvalidLayerSpec(String),
    #[error("layer number {0} is outside the GDS range 0..=32767")]
    LayerOutOfRange(i64),
    #[error("failed to read GDS data: {0}")]
    Gds(String),
    #[error("no cells available")]
    NoTopCell,
    #[error("multiple top-level cells exist ({}), please specify a cell name", .0.join(", "))]
    AmbiguousTopCell(Vec<String>),
    #[error("invalid cell name '{0}'")]
    UnknownCell(String),
}

/// A path polygon that cannot be measured
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("polygon has {0} distinct vertices, a ribbon needs at least 4")]
    TooFewVertices(usize),
    #[error("polygon is not a ribbon: {0}")]
    NotARibbon(String),
    #[error("polygon branches into {0} ends, only single-inlet single-outlet paths are measurable")]
    Branching(usize),
}

/// Recoverable findings; the offending element is skipped
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryWarning {
    #[error("cutting polygon #{cut} in cell '{cell}' at {bbox} contains no label, ignored")]
    UnlabeledCut {
        cut: usize,
        cell: String,
        bbox: BoundingBox,
    },
    #[error(
        "cutting polygon #{cut} in cell '{cell}' at {bbox} contains several labels ({}), all kept as co-located ports",
        .names.join(", ")
    )]
    AmbiguousCut {
        cut: usize,
        cell: String,
        bbox: BoundingBox,
        names: Vec<String>,
    },
    #[error("port name '{name}' is used by {count} cutting polygons, instances are kept apart")]
    DuplicatePortName { name: String, count: usize },
    #[error(
        "path polygon #{path} in cell '{cell}' at {bbox} has {cut_count} cut point(s), at least 2 are needed"
    )]
    UnterminatedPath {
        path: usize,
        cell: String,
        bbox: BoundingBox,
        cut_count: usize,
    },
}

/// A [`GeometryError`] tied to the path polygon it came from
#[derive(Debug, Clone, PartialEq, Error)]
#[error("path polygon #{path} in cell '{cell}' at {bbox} skipped: {error} (ports: {})", .ports.join(", "))]
pub struct PathFailure {
    pub path: usize,
    pub cell: String,
    pub bbox: BoundingBox,
    pub ports: Vec<String>,
    #[source]
    pub error: GeometryError,
}
