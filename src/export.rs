// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::path::Path;

use crate::analysis::PathRecord;

pub const CSV_HEADER: [&str; 3] = ["port1", "port2", "length (um)"];

#[derive(Debug, Serialize)]
pub struct LengthCsvRecord {
    #[serde(rename = "port1")]
    pub port1: String,
    #[serde(rename = "port2")]
    pub port2: String,
    #[serde(rename = "length (um)")]
    pub length: f64,
}

/// Round to the 1 pm resolution used in reports
fn round_length(length: f64) -> f64 {
    (length * 1e6).round() / 1e6
}

/// Convert a PathRecord to a LengthCsvRecord
fn record_to_csv_record(record: &PathRecord) -> LengthCsvRecord {
    LengthCsvRecord {
        port1: record.port1.clone(),
        port2: record.port2.clone(),
        length: round_length(record.length),
    }
}

/// Export the length report to a CSV file; the header is written even when
/// there are no records
pub fn export_report_to_csv<P: AsRef<Path>>(
    records: &[PathRecord],
    file_path: P,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(file_path)?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.serialize(record_to_csv_record(record))?;
    }

    writer.flush()?;
    Ok(())
}

/// Render the report as an aligned text table for the log
pub fn format_report_table(records: &[PathRecord]) -> String {
    let width1 = records
        .iter()
        .map(|r| r.port1.len())
        .chain([CSV_HEADER[0].len()])
        .max()
        .unwrap_or_default();
    let width2 = records
        .iter()
        .map(|r| r.port2.len())
        .chain([CSV_HEADER[1].len()])
        .max()
        .unwrap_or_default();

    let mut table = format!(
        "{:<width1$}  {:<width2$}  {:>14}",
        CSV_HEADER[0], CSV_HEADER[1], CSV_HEADER[2]
    );
    for record in records {
        table.push('\n');
        table.push_str(&format!(
            "{:<width1$}  {:<width2$}  {:>14.6}",
            record.port1, record.port2, record.length
        ));
    }
    table
}
