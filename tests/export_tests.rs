// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use path_length::export::export_report_to_csv;
use path_length::PathRecord;
use std::fs;

fn create_test_record(port1: &str, port2: &str, length: f64) -> PathRecord {
    PathRecord {
        port1: port1.to_string(),
        port2: port2.to_string(),
        length,
    }
}

#[test]
fn test_csv_export_rows() {
    let tmp = tempfile::tempdir().unwrap();
    let csv_path = tmp.path().join("path_length.csv");

    let records = vec![
        create_test_record("start", "end", 510.400000000012),
        create_test_record("end", "drop", 0.1234567),
    ];
    export_report_to_csv(&records, &csv_path).unwrap();

    let content = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "port1,port2,length (um)");
    assert_eq!(lines[1], "start,end,510.4");
    assert_eq!(lines[2], "end,drop,0.123457");
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_csv_export_empty_report_keeps_header() {
    let tmp = tempfile::tempdir().unwrap();
    let csv_path = tmp.path().join("empty.csv");

    export_report_to_csv(&[], &csv_path).unwrap();

    let content = fs::read_to_string(&csv_path).unwrap();
    assert_eq!(content.trim_end(), "port1,port2,length (um)");
}

#[test]
fn test_csv_export_quotes_awkward_names() {
    let tmp = tempfile::tempdir().unwrap();
    let csv_path = tmp.path().join("quoted.csv");

    let records = vec![create_test_record("a,1", "b", 2.0)];
    export_report_to_csv(&records, &csv_path).unwrap();

    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let row = reader.records().next().unwrap().unwrap();
    assert_eq!(&row[0], "a,1");
    assert_eq!(&row[2], "2.0");
}

#[test]
fn test_csv_export_to_missing_directory_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let csv_path = tmp.path().join("missing").join("out.csv");
    assert!(export_report_to_csv(&[], &csv_path).is_err());
}
