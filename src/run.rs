// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Timestamped output directory of one run

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

pub const CSV_FILE_NAME: &str = "path_length.csv";
pub const LOG_FILE_NAME: &str = "path_length.log";

/// `<gds stem>_<YYYY_MM_DD_HH_MM_SS>` in UTC
pub fn run_dir_name(gds_file: &Path, started: DateTime<Utc>) -> String {
    let stem = gds_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "layout".to_string());
    format!("{}_{}", stem, started.format("%Y_%m_%d_%H_%M_%S"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDir {
    pub root: PathBuf,
}

impl RunDir {
    /// Create `<output_dir>/<run_dir_name>` and any missing parents
    pub fn create(output_dir: &Path, gds_file: &Path, started: DateTime<Utc>) -> io::Result<Self> {
        let root = output_dir.join(run_dir_name(gds_file, started));
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn csv_path(&self) -> PathBuf {
        self.root.join(CSV_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join(LOG_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_run_dir_name() {
        let started = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(
            run_dir_name(Path::new("/data/route_path.gds"), started),
            "route_path_2024_03_07_09_05_01"
        );
    }

    #[test]
    fn test_create_run_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let started = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let run = RunDir::create(&tmp.path().join("out"), Path::new("chip.gds"), started).unwrap();
        assert!(run.root.is_dir());
        assert_eq!(run.csv_path(), tmp.path().join("out/chip_2024_01_02_03_04_05/path_length.csv"));
    }
}
