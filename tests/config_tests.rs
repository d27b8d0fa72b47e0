// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use path_length::{Config, ConfigError, LayerSpec, ReportKind};
use std::fs;

const CONFIG: &str = "\
gds_file: layouts/route_path.gds
path_layer: { layer_no: 41, layer_dtype: 0 }
cutting_layer: { layer_no: 66, layer_dtype: 0 }
nodes:
  - start
  - end
";

#[test]
fn test_load_resolves_gds_file_next_to_config() {
    let tmp = tempfile::tempdir().unwrap();
    let config_path = tmp.path().join("config.yaml");
    fs::write(&config_path, CONFIG).unwrap();

    let config = Config::load(&config_path).unwrap();
    assert_eq!(config.gds_file, tmp.path().join("layouts/route_path.gds"));
    assert_eq!(config.cell_name, None);

    let options = config.options().unwrap();
    assert_eq!(options.path_layer, LayerSpec::new(41, 0));
    assert_eq!(options.report, ReportKind::Segments);
    assert_eq!(options.nodes.iter().collect::<Vec<_>>(), vec!["start", "end"]);
}

#[test]
fn test_load_keeps_absolute_gds_file() {
    let tmp = tempfile::tempdir().unwrap();
    let gds_path = tmp.path().join("abs.gds");
    let config_path = tmp.path().join("nested").join("config.yaml");
    fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    fs::write(
        &config_path,
        CONFIG.replace("layouts/route_path.gds", &gds_path.display().to_string()),
    )
    .unwrap();

    let config = Config::load(&config_path).unwrap();
    assert_eq!(config.gds_file, gds_path);
}

#[test]
fn test_load_missing_file() {
    let tmp = tempfile::tempdir().unwrap();
    let result = Config::load(tmp.path().join("nope.yaml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn test_load_malformed_yaml() {
    let tmp = tempfile::tempdir().unwrap();
    let config_path = tmp.path().join("broken.yaml");
    fs::write(&config_path, "gds_file: [unterminated\n").unwrap();

    let result = Config::load(&config_path);
    assert!(matches!(result, Err(ConfigError::Yaml { .. })));
}

#[test]
fn test_layer_with_wrong_type() {
    let tmp = tempfile::tempdir().unwrap();
    let config_path = tmp.path().join("typed.yaml");
    fs::write(&config_path, CONFIG.replace("layer_no: 41", "layer_no: metal")).unwrap();

    assert!(matches!(
        Config::load(&config_path),
        Err(ConfigError::Yaml { .. })
    ));
}
