// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! YAML run configuration

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisOptions, NodeFilter, ReportKind};
use crate::error::ConfigError;
use crate::layout::LayerSpec;

/// `{ layer_no: 41, layer_dtype: 0 }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerEntry {
    pub layer_no: i64,
    pub layer_dtype: i64,
}

impl LayerEntry {
    pub fn to_spec(self) -> Result<LayerSpec, ConfigError> {
        LayerSpec::try_new(self.layer_no, self.layer_dtype)
    }
}

impl From<LayerSpec> for LayerEntry {
    fn from(spec: LayerSpec) -> Self {
        Self {
            layer_no: spec.layer.into(),
            layer_dtype: spec.datatype.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub gds_file: PathBuf,
    pub path_layer: LayerEntry,
    pub cutting_layer: LayerEntry,
    pub cell_name: Option<String>,
    pub nodes: Option<Vec<String>>,
    #[serde(default)]
    pub report: ReportKind,
}

impl Config {
    /// Read a config file. A relative `gds_file` is taken relative to the
    /// directory holding the config.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::parse(&text, path)?;
        if config.gds_file.is_relative() {
            if let Some(dir) = path.parent() {
                config.gds_file = dir.join(&config.gds_file);
            }
        }
        log::info!("[LOAD] Loaded config file: {}", path.display());
        Ok(config)
    }

    /// Parse YAML text; `origin` only names the source in errors
    pub fn parse(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(text).map_err(|e| ConfigError::Yaml {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;
        // Range problems surface here rather than halfway through a run
        config.path_layer.to_spec()?;
        config.cutting_layer.to_spec()?;
        Ok(config)
    }

    pub fn node_filter(&self) -> NodeFilter {
        NodeFilter::new(self.nodes.iter().flatten().cloned())
    }

    pub fn options(&self) -> Result<AnalysisOptions, ConfigError> {
        Ok(AnalysisOptions {
            path_layer: self.path_layer.to_spec()?,
            cutting_layer: self.cutting_layer.to_spec()?,
            nodes: self.node_filter(),
            report: self.report,
        })
    }
}
