// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! env_logger setup that mirrors every line into the run's log file

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use env_logger::{Builder, Env, Target};

pub const TIME_FORMAT: &str = "%d-%b-%Y %H:%M:%S";

/// Log line timestamp, in UTC like the run directory name
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.format(TIME_FORMAT).to_string()
}

/// Shared slot for the log file, filled once the run directory exists
#[derive(Debug, Clone, Default)]
pub struct LogFile {
    file: Arc<Mutex<Option<File>>>,
}

impl LogFile {
    /// Start copying log lines into `path`
    pub fn attach<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let file = File::create(path)?;
        *self.lock() = Some(file);
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Option<File>> {
        // A panic while logging leaves the file usable
        self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

struct Tee {
    file: LogFile,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        if let Some(file) = self.file.lock().as_mut() {
            file.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        if let Some(file) = self.file.lock().as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

/// Install the global logger. Level defaults to `info`, `RUST_LOG` overrides.
pub fn init() -> Result<LogFile, log::SetLoggerError> {
    let file = LogFile::default();
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} | {:<5} | {}",
                timestamp(Utc::now()),
                record.level(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(Tee { file: file.clone() })))
        .try_init()?;
    Ok(file)
}
