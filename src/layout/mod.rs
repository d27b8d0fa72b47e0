// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Flattened layout data handed to the measurement core

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Polygon};

pub mod gds;
pub mod layer;

pub use layer::LayerSpec;

/// A polygon on one layer/datatype pair, owned by one cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub cell: String,
    pub layer: LayerSpec,
    pub polygon: Polygon,
}

/// A text label with its anchor point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub position: Point,
    pub cell: String,
    pub layer: LayerSpec,
}

/// Read-only access to layout geometry, queried by layer/datatype pair.
///
/// Results keep the order the source discovered them in; the core relies on
/// that for deterministic output.
pub trait GeometrySource {
    fn polygons(&self, layer: LayerSpec) -> Vec<Shape>;
    fn labels(&self, layer: LayerSpec) -> Vec<Label>;
}

/// In-memory flattened layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub top_cell: String,
    pub shapes: Vec<Shape>,
    pub labels: Vec<Label>,
}

impl Layout {
    pub fn new(top_cell: &str) -> Self {
        Self {
            top_cell: top_cell.to_string(),
            ..Default::default()
        }
    }

    pub fn add_polygon(&mut self, layer: LayerSpec, polygon: Polygon) -> &mut Self {
        let cell = self.top_cell.clone();
        self.shapes.push(Shape {
            cell,
            layer,
            polygon,
        });
        self
    }

    pub fn add_label(&mut self, layer: LayerSpec, text: &str, position: Point) -> &mut Self {
        let cell = self.top_cell.clone();
        self.labels.push(Label {
            text: text.to_string(),
            position,
            cell,
            layer,
        });
        self
    }
}

impl GeometrySource for Layout {
    fn polygons(&self, layer: LayerSpec) -> Vec<Shape> {
        self.shapes
            .iter()
            .filter(|shape| shape.layer == layer)
            .cloned()
            .collect()
    }

    fn labels(&self, layer: LayerSpec) -> Vec<Label> {
        self.labels
            .iter()
            .filter(|label| label.layer == layer)
            .cloned()
            .collect()
    }
}
