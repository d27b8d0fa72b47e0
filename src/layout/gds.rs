// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! GDSII adapter: flattens a [`gds21::GdsLibrary`] into a [`Layout`]
//!
//! The hierarchy below the selected top cell is expanded to full depth.
//! Coordinates are converted from database units to micrometers.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use gds21::{GdsElement, GdsLibrary, GdsPoint, GdsStrans, GdsStruct};

use super::{Label, LayerSpec, Layout, Shape};
use crate::error::ConfigError;
use crate::geometry::{Point, Polygon};

/// Placement of a cell inside the top cell: `p' = M p + t`
#[derive(Debug, Clone, Copy, PartialEq)]
struct Transform {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    tx: f64,
    ty: f64,
}

impl Transform {
    fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Reflection about x, then magnification, then rotation, then translation
    fn from_reference(origin: Point, strans: Option<&GdsStrans>) -> Self {
        let Some(strans) = strans else {
            return Self {
                tx: origin.x,
                ty: origin.y,
                ..Self::identity()
            };
        };

        let reflect = if strans.reflected { -1.0 } else { 1.0 };
        let mag = strans.mag.unwrap_or(1.0);
        let (sin, cos) = exact_sin_cos(strans.angle.unwrap_or(0.0));

        Self {
            a: mag * cos,
            b: -mag * sin * reflect,
            c: mag * sin,
            d: mag * cos * reflect,
            tx: origin.x,
            ty: origin.y,
        }
    }

    /// `self` applied after `inner`
    fn compose(&self, inner: &Transform) -> Transform {
        Transform {
            a: self.a * inner.a + self.b * inner.c,
            b: self.a * inner.b + self.b * inner.d,
            c: self.c * inner.a + self.d * inner.c,
            d: self.c * inner.b + self.d * inner.d,
            tx: self.a * inner.tx + self.b * inner.ty + self.tx,
            ty: self.c * inner.tx + self.d * inner.ty + self.ty,
        }
    }

    fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.b * p.y + self.tx,
            self.c * p.x + self.d * p.y + self.ty,
        )
    }

    /// Linear scale factor, used for path widths
    fn scale(&self) -> f64 {
        (self.a * self.d - self.b * self.c).abs().sqrt()
    }
}

/// Sine and cosine with exact values on multiples of 90 degrees
fn exact_sin_cos(degrees: f64) -> (f64, f64) {
    let normalized = degrees.rem_euclid(360.0);
    if normalized == 0.0 {
        (0.0, 1.0)
    } else if normalized == 90.0 {
        (1.0, 0.0)
    } else if normalized == 180.0 {
        (0.0, -1.0)
    } else if normalized == 270.0 {
        (-1.0, 0.0)
    } else {
        normalized.to_radians().sin_cos()
    }
}

/// Names of the cells no other cell references, in library order
pub fn top_cells(lib: &GdsLibrary) -> Vec<String> {
    let mut referenced = HashSet::new();
    for strukt in &lib.structs {
        for elem in &strukt.elems {
            match elem {
                GdsElement::GdsStructRef(sref) => {
                    referenced.insert(sref.name.to_string());
                }
                GdsElement::GdsArrayRef(aref) => {
                    referenced.insert(aref.name.to_string());
                }
                _ => {}
            }
        }
    }

    lib.structs
        .iter()
        .map(|s| s.name.to_string())
        .filter(|name| !referenced.contains(name))
        .collect()
}

/// Pick the cell to measure.
///
/// Without a name there must be exactly one top-level cell. A name may refer
/// to any cell defined in the library.
pub fn select_cell<'a>(
    lib: &'a GdsLibrary,
    cell_name: Option<&str>,
) -> Result<&'a GdsStruct, ConfigError> {
    let name = match cell_name {
        Some(name) => name.to_string(),
        None => {
            let tops = top_cells(lib);
            match tops.len() {
                0 => return Err(ConfigError::NoTopCell),
                1 => tops[0].clone(),
                _ => return Err(ConfigError::AmbiguousTopCell(tops)),
            }
        }
    };

    lib.structs
        .iter()
        .find(|s| s.name.to_string() == name)
        .ok_or(ConfigError::UnknownCell(name))
}

/// Flatten `cell_name` (or the single top cell) into a [`Layout`]
pub fn flatten(lib: &GdsLibrary, cell_name: Option<&str>) -> Result<Layout, ConfigError> {
    let top = select_cell(lib, cell_name)?;
    let structs: HashMap<String, &GdsStruct> = lib
        .structs
        .iter()
        .map(|s| (s.name.to_string(), s))
        .collect();

    let mut flattener = Flattener {
        structs,
        scale: lib.units.db_unit() / 1e-6,
        stack: Vec::new(),
        layout: Layout::new(&top.name.to_string()),
    };
    flattener.walk(top, &Transform::identity())?;

    Ok(flattener.layout)
}

struct Flattener<'a> {
    structs: HashMap<String, &'a GdsStruct>,
    /// Micrometers per database unit
    scale: f64,
    stack: Vec<String>,
    layout: Layout,
}

impl<'a> Flattener<'a> {
    fn point(&self, p: &GdsPoint) -> Point {
        Point::new(f64::from(p.x) * self.scale, f64::from(p.y) * self.scale)
    }

    fn lookup(&self, name: &str) -> Result<&'a GdsStruct, ConfigError> {
        self.structs
            .get(name)
            .copied()
            .ok_or_else(|| ConfigError::Gds(format!("reference to undefined cell '{name}'")))
    }

    fn walk(&mut self, strukt: &'a GdsStruct, transform: &Transform) -> Result<(), ConfigError> {
        let cell = strukt.name.to_string();
        if self.stack.contains(&cell) {
            return Err(ConfigError::Gds(format!(
                "cell '{cell}' references itself through {}",
                self.stack.join(" -> ")
            )));
        }
        self.stack.push(cell.clone());

        for elem in &strukt.elems {
            match elem {
                GdsElement::GdsBoundary(boundary) => {
                    let points = boundary
                        .xy
                        .iter()
                        .map(|p| transform.apply(self.point(p)))
                        .collect();
                    self.push_shape(&cell, boundary.layer, boundary.datatype, Polygon::new(points));
                }
                GdsElement::GdsBox(gds_box) => {
                    let points = gds_box
                        .xy
                        .iter()
                        .map(|p| transform.apply(self.point(p)))
                        .collect();
                    self.push_shape(&cell, gds_box.layer, gds_box.boxtype, Polygon::new(points));
                }
                GdsElement::GdsPath(path) => {
                    let centerline: Vec<Point> = path
                        .xy
                        .iter()
                        .map(|p| transform.apply(self.point(p)))
                        .collect();
                    let width =
                        f64::from(path.width.unwrap_or(0)).abs() * self.scale * transform.scale();
                    let (begin, end) = match path.path_type.unwrap_or(0) {
                        1 => {
                            log::warn!(
                                "[WARN] Round-ended path on layer {}/{} in cell '{cell}' drawn with flush ends",
                                path.layer,
                                path.datatype
                            );
                            (0.0, 0.0)
                        }
                        2 => (width * 0.5, width * 0.5),
                        4 => (
                            f64::from(path.begin_extn.unwrap_or(0)) * self.scale * transform.scale(),
                            f64::from(path.end_extn.unwrap_or(0)) * self.scale * transform.scale(),
                        ),
                        _ => (0.0, 0.0),
                    };
                    match Polygon::from_path(&centerline, width, begin, end) {
                        Some(polygon) => {
                            self.push_shape(&cell, path.layer, path.datatype, polygon)
                        }
                        None => log::warn!(
                            "[WARN] Skipping degenerate path on layer {}/{} in cell '{cell}'",
                            path.layer,
                            path.datatype
                        ),
                    }
                }
                GdsElement::GdsTextElem(text) => {
                    self.layout.labels.push(Label {
                        text: text.string.to_string(),
                        position: transform.apply(self.point(&text.xy)),
                        cell: cell.clone(),
                        layer: LayerSpec::new(text.layer, text.texttype),
                    });
                }
                GdsElement::GdsStructRef(sref) => {
                    let child = self.lookup(&sref.name.to_string())?;
                    let placement =
                        Transform::from_reference(self.point(&sref.xy), sref.strans.as_ref());
                    self.walk(child, &transform.compose(&placement))?;
                }
                GdsElement::GdsArrayRef(aref) => {
                    let child = self.lookup(&aref.name.to_string())?;
                    let origin = self.point(&aref.xy[0]);
                    let col_end = self.point(&aref.xy[1]);
                    let row_end = self.point(&aref.xy[2]);
                    let cols = f64::from(aref.cols.max(1));
                    let rows = f64::from(aref.rows.max(1));
                    let col_step = ((col_end.x - origin.x) / cols, (col_end.y - origin.y) / cols);
                    let row_step = ((row_end.x - origin.x) / rows, (row_end.y - origin.y) / rows);

                    for col in 0..aref.cols.max(1) {
                        for row in 0..aref.rows.max(1) {
                            let (c, r) = (f64::from(col), f64::from(row));
                            let at = Point::new(
                                origin.x + c * col_step.0 + r * row_step.0,
                                origin.y + c * col_step.1 + r * row_step.1,
                            );
                            let placement = Transform::from_reference(at, aref.strans.as_ref());
                            self.walk(child, &transform.compose(&placement))?;
                        }
                    }
                }
                _ => {}
            }
        }

        self.stack.pop();
        Ok(())
    }

    fn push_shape(&mut self, cell: &str, layer: i16, datatype: i16, polygon: Polygon) {
        if polygon.len() < 3 {
            log::warn!(
                "[WARN] Skipping polygon with {} vertices on layer {layer}/{datatype} in cell '{cell}'",
                polygon.len()
            );
            return;
        }
        self.layout.shapes.push(Shape {
            cell: cell.to_string(),
            layer: LayerSpec::new(layer, datatype),
            polygon,
        });
    }
}

/// Loads GDS files and flattens the selected cell
pub struct GdsReader;

impl GdsReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read<P: AsRef<Path>>(
        &self,
        path: P,
        cell_name: Option<&str>,
    ) -> Result<Layout, ConfigError> {
        let path = path.as_ref();
        log::info!("[LOAD] Loading GDS file: {}", path.display());

        if !path.is_file() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let lib = GdsLibrary::load(path).map_err(|e| ConfigError::Gds(e.to_string()))?;
        log::info!(
            "[INFO] Library '{}' with {} cells, database unit {:e} m",
            lib.name,
            lib.structs.len(),
            lib.units.db_unit()
        );

        let layout = flatten(&lib, cell_name)?;
        log::info!(
            "[PASS] Flattened cell '{}': {} polygons, {} labels",
            layout.top_cell,
            layout.shapes.len(),
            layout.labels.len()
        );
        Ok(layout)
    }
}

impl Default for GdsReader {
    fn default() -> Self {
        Self::new()
    }
}
