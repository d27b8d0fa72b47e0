//! Path Length Library
//!
//! This library measures the centerline length of routed paths in GDS layouts.
//! Ports are marked by labelled cutting polygons placed on top of the paths.

pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod run;

// Re-export commonly used types
pub use analysis::{analyze, Analysis, AnalysisOptions, NodeFilter, PathRecord, ReportKind};
pub use config::Config;
pub use error::{ConfigError, GeometryError, GeometryWarning, PathFailure};
pub use geometry::{Point, Polygon};
pub use layout::gds::GdsReader;
pub use layout::{GeometrySource, LayerSpec, Layout};
