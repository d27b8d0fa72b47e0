// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Port locator: pairs cutting polygons with the labels inside them

use indexmap::IndexMap;

use super::{Diagnostics, Port};
use crate::error::GeometryWarning;
use crate::layout::{Label, Shape};

/// Match every cutting polygon with the labels whose anchor lies inside it.
///
/// Unlabelled polygons are dropped with a warning. Polygons holding several
/// labels yield one co-located port per distinct name, also with a warning.
/// Ports come out in cutting-polygon order, then label order.
pub fn locate_ports(cutting: &[Shape], labels: &[Label], diagnostics: &mut Diagnostics) -> Vec<Port> {
    let mut ports = Vec::new();

    for (cut, shape) in cutting.iter().enumerate() {
        let mut names: Vec<&str> = Vec::new();
        let mut inside: Vec<&Label> = Vec::new();
        for label in labels {
            if shape.polygon.contains(&label.position) && !names.contains(&label.text.as_str()) {
                names.push(&label.text);
                inside.push(label);
            }
        }

        let bbox = shape.polygon.bounding_box().unwrap_or_default();
        match inside.len() {
            0 => {
                diagnostics.warn(GeometryWarning::UnlabeledCut {
                    cut,
                    cell: shape.cell.clone(),
                    bbox,
                });
                continue;
            }
            1 => {}
            _ => diagnostics.warn(GeometryWarning::AmbiguousCut {
                cut,
                cell: shape.cell.clone(),
                bbox,
                names: names.iter().map(|name| name.to_string()).collect(),
            }),
        }

        ports.extend(inside.into_iter().map(|label| Port {
            name: label.text.clone(),
            anchor: label.position,
            cut,
            cell: shape.cell.clone(),
            polygon: shape.polygon.clone(),
        }));
    }

    let mut uses: IndexMap<&str, usize> = IndexMap::new();
    for port in &ports {
        *uses.entry(port.name.as_str()).or_insert(0) += 1;
    }
    for (name, count) in uses {
        if count > 1 {
            diagnostics.warn(GeometryWarning::DuplicatePortName {
                name: name.to_string(),
                count,
            });
        }
    }

    ports
}
