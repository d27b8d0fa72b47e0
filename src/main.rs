// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use path_length::export::{export_report_to_csv, format_report_table};
use path_length::logging::{self, LogFile};
use path_length::run::RunDir;
use path_length::{analyze, Config, GdsReader, LayerSpec, NodeFilter, ReportKind};

/// Measure centerline lengths between labelled ports on routed GDS paths
#[derive(Debug, Parser)]
#[command(name = "path-length", version, about)]
struct Cli {
    /// YAML configuration file
    config: PathBuf,

    /// Directory that receives the timestamped run folder
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Path layer as LAYER/DATATYPE, overrides the config
    #[arg(long, value_name = "L/D")]
    path_layer: Option<LayerSpec>,

    /// Cutting layer as LAYER/DATATYPE, overrides the config
    #[arg(long, value_name = "L/D")]
    cutting_layer: Option<LayerSpec>,

    /// Top cell to measure, overrides the config
    #[arg(long)]
    cell: Option<String>,

    /// Report only these ports (repeatable), overrides the config
    #[arg(long = "node", value_name = "NAME")]
    nodes: Vec<String>,

    /// Report shortest routes between all connected ports
    #[arg(long)]
    routes: bool,
}

fn run(cli: Cli, log_file: &LogFile) -> Result<(), Box<dyn std::error::Error>> {
    let started = chrono::Utc::now();
    let config = Config::load(&cli.config)?;

    let mut options = config.options()?;
    if let Some(layer) = cli.path_layer {
        options.path_layer = layer;
    }
    if let Some(layer) = cli.cutting_layer {
        options.cutting_layer = layer;
    }
    if !cli.nodes.is_empty() {
        options.nodes = NodeFilter::new(cli.nodes);
    }
    if cli.routes {
        options.report = ReportKind::Routes;
    }
    let cell = cli.cell.or(config.cell_name);

    let run_dir = RunDir::create(&cli.output_dir, &config.gds_file, started)?;
    log_file.attach(run_dir.log_path())?;
    log::info!("[INFO] Run directory: {}", run_dir.root.display());
    log::info!(
        "[INFO] Path layer {}, cutting layer {}, report {:?}",
        options.path_layer,
        options.cutting_layer,
        options.report
    );

    let layout = GdsReader::new().read(&config.gds_file, cell.as_deref())?;
    let analysis = analyze(&layout, &options);

    log::info!("Path lengths:\n{}", format_report_table(&analysis.records));
    export_report_to_csv(&analysis.records, run_dir.csv_path())?;
    log::info!("[PASS] Wrote {}", run_dir.csv_path().display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let log_file = match logging::init() {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli, &log_file) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("[FAIL] {e}");
            ExitCode::FAILURE
        }
    }
}
