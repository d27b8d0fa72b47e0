// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use approx::assert_abs_diff_eq;
use gds21::{
    GdsBoundary, GdsLibrary, GdsPath, GdsPoint, GdsStrans, GdsStruct, GdsStructRef, GdsTextElem,
    GdsUnits,
};
use path_length::layout::gds::{flatten, top_cells};
use path_length::{
    analyze, AnalysisOptions, ConfigError, GdsReader, GeometrySource, LayerSpec, Point,
};

const PATH: LayerSpec = LayerSpec::new(41, 0);
const CUT: LayerSpec = LayerSpec::new(66, 0);

fn create_library() -> GdsLibrary {
    let mut lib = GdsLibrary::new("paths");
    lib.units = GdsUnits::new(1e-3, 1e-9);
    lib
}

fn create_boundary(layer: LayerSpec, corners: &[(i32, i32)]) -> GdsBoundary {
    let mut xy: Vec<GdsPoint> = corners.iter().map(|&(x, y)| GdsPoint::new(x, y)).collect();
    xy.push(xy[0].clone());
    GdsBoundary {
        layer: layer.layer,
        datatype: layer.datatype,
        xy,
        ..Default::default()
    }
}

fn create_box(layer: LayerSpec, x0: i32, y0: i32, x1: i32, y1: i32) -> GdsBoundary {
    create_boundary(layer, &[(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
}

fn create_label(text: &str, x: i32, y: i32) -> GdsTextElem {
    GdsTextElem {
        string: text.into(),
        layer: CUT.layer,
        texttype: CUT.datatype,
        xy: GdsPoint::new(x, y),
        ..Default::default()
    }
}

fn create_reference(name: &str, x: i32, y: i32, strans: Option<GdsStrans>) -> GdsStructRef {
    GdsStructRef {
        name: name.into(),
        xy: GdsPoint::new(x, y),
        strans,
        ..Default::default()
    }
}

/// A 100 um long, 0.5 um wide waveguide drawn as a GDS path, with one
/// labelled marker at each end
fn create_waveguide_cell() -> GdsStruct {
    let mut cell = GdsStruct::new("WG");
    cell.elems.push(
        GdsPath {
            layer: PATH.layer,
            datatype: PATH.datatype,
            xy: vec![GdsPoint::new(0, 0), GdsPoint::new(100_000, 0)],
            width: Some(500),
            ..Default::default()
        }
        .into(),
    );
    cell.elems.push(create_box(CUT, -100, -1000, 100, 1000).into());
    cell.elems.push(create_label("in", 0, 0).into());
    cell.elems.push(create_box(CUT, 99_900, -1000, 100_100, 1000).into());
    cell.elems.push(create_label("out", 100_000, 0).into());
    cell
}

#[test]
fn test_flatten_converts_units_and_elements() {
    let mut lib = create_library();
    lib.structs.push(create_waveguide_cell());

    let layout = flatten(&lib, None).unwrap();
    assert_eq!(layout.top_cell, "WG");

    let paths = layout.polygons(PATH);
    assert_eq!(paths.len(), 1);
    let bbox = paths[0].polygon.bounding_box().unwrap();
    assert_abs_diff_eq!(bbox.min.x, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(bbox.max.x, 100.0, epsilon = 1e-9);
    assert_abs_diff_eq!(bbox.min.y, -0.25, epsilon = 1e-9);
    assert_abs_diff_eq!(bbox.max.y, 0.25, epsilon = 1e-9);

    assert_eq!(layout.polygons(CUT).len(), 2);
    let labels = layout.labels(CUT);
    assert_eq!(labels.len(), 2);
    assert_eq!(labels[1].text, "out");
    assert_abs_diff_eq!(labels[1].position.x, 100.0, epsilon = 1e-9);
}

#[test]
fn test_square_ended_path() {
    let mut lib = create_library();
    let mut cell = GdsStruct::new("TOP");
    cell.elems.push(
        GdsPath {
            layer: PATH.layer,
            datatype: PATH.datatype,
            xy: vec![GdsPoint::new(0, 0), GdsPoint::new(10_000, 0)],
            width: Some(1000),
            path_type: Some(2),
            ..Default::default()
        }
        .into(),
    );
    lib.structs.push(cell);

    let layout = flatten(&lib, None).unwrap();
    let bbox = layout.polygons(PATH)[0].polygon.bounding_box().unwrap();
    assert_abs_diff_eq!(bbox.min.x, -0.5, epsilon = 1e-9);
    assert_abs_diff_eq!(bbox.max.x, 10.5, epsilon = 1e-9);
}

#[test]
fn test_round_ended_path_is_kept_with_flush_ends() {
    let mut lib = create_library();
    let mut cell = GdsStruct::new("TOP");
    cell.elems.push(
        GdsPath {
            layer: PATH.layer,
            datatype: PATH.datatype,
            xy: vec![GdsPoint::new(0, 0), GdsPoint::new(10_000, 0)],
            width: Some(1000),
            path_type: Some(1),
            ..Default::default()
        }
        .into(),
    );
    lib.structs.push(cell);

    let layout = flatten(&lib, None).unwrap();
    let paths = layout.polygons(PATH);
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].polygon.len(), 4);
    let bbox = paths[0].polygon.bounding_box().unwrap();
    assert_abs_diff_eq!(bbox.min.x, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(bbox.max.x, 10.0, epsilon = 1e-9);
    assert_abs_diff_eq!(bbox.max.y, 0.5, epsilon = 1e-9);
}

#[test]
fn test_references_are_placed_and_measured() {
    let mut lib = create_library();
    lib.structs.push(create_waveguide_cell());
    let mut top = GdsStruct::new("TOP");
    top.elems.push(create_reference("WG", 0, 0, None).into());
    top.elems.push(
        create_reference(
            "WG",
            50_000,
            20_000,
            Some(GdsStrans {
                angle: Some(90.0),
                ..Default::default()
            }),
        )
        .into(),
    );
    lib.structs.push(top);

    assert_eq!(top_cells(&lib), vec!["TOP".to_string()]);
    let layout = flatten(&lib, None).unwrap();
    assert_eq!(layout.top_cell, "TOP");
    assert_eq!(layout.polygons(PATH).len(), 2);

    // The rotated copy runs upwards from (50, 20)
    let rotated = layout.polygons(PATH)[1].polygon.bounding_box().unwrap();
    assert_abs_diff_eq!(rotated.min.y, 20.0, epsilon = 1e-9);
    assert_abs_diff_eq!(rotated.max.y, 120.0, epsilon = 1e-9);
    assert_abs_diff_eq!(rotated.min.x, 49.75, epsilon = 1e-9);
    assert_eq!(layout.polygons(PATH)[1].cell, "WG");

    let analysis = analyze(&layout, &AnalysisOptions::new(PATH, CUT));
    assert_eq!(analysis.records.len(), 2);
    for record in &analysis.records {
        assert_eq!(record.port1, "in");
        assert_eq!(record.port2, "out");
        assert_abs_diff_eq!(record.length, 99.9, epsilon = 1e-6);
    }
}

#[test]
fn test_top_cell_selection_errors() {
    let lib = create_library();
    assert!(matches!(flatten(&lib, None), Err(ConfigError::NoTopCell)));

    let mut lib = create_library();
    lib.structs.push(GdsStruct::new("A"));
    lib.structs.push(GdsStruct::new("B"));
    match flatten(&lib, None) {
        Err(ConfigError::AmbiguousTopCell(names)) => assert_eq!(names, vec!["A", "B"]),
        other => panic!("expected AmbiguousTopCell, got {other:?}"),
    }

    assert!(matches!(
        flatten(&lib, Some("C")),
        Err(ConfigError::UnknownCell(name)) if name == "C"
    ));
    assert_eq!(flatten(&lib, Some("B")).unwrap().top_cell, "B");
}

#[test]
fn test_reference_cycle_is_rejected() {
    let mut lib = create_library();
    let mut a = GdsStruct::new("A");
    a.elems.push(create_reference("B", 0, 0, None).into());
    let mut b = GdsStruct::new("B");
    b.elems.push(create_reference("A", 0, 0, None).into());
    lib.structs.push(a);
    lib.structs.push(b);

    assert!(matches!(flatten(&lib, Some("A")), Err(ConfigError::Gds(_))));
}

#[test]
fn test_reader_loads_saved_library() {
    let tmp = tempfile::tempdir().unwrap();
    let gds_path = tmp.path().join("waveguide.gds");

    let mut lib = create_library();
    lib.structs.push(create_waveguide_cell());
    lib.save(&gds_path).unwrap();

    let layout = GdsReader::new().read(&gds_path, Some("WG")).unwrap();
    assert_eq!(layout.polygons(PATH).len(), 1);
    assert_eq!(layout.labels(CUT).len(), 2);
    assert!(layout
        .labels(CUT)
        .iter()
        .any(|label| label.position == Point::new(0.0, 0.0)));
}

#[test]
fn test_reader_missing_file() {
    let result = GdsReader::new().read("/nonexistent/path/layout.gds", None);
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}
