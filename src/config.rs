use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::filter::DefaultSelection;
use crate::data::loader::SourceOptions;

/// Looked up in the working directory at startup.
pub const CONFIG_FILE: &str = "dashboard.json";

/// Startup settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Data file opened at startup.
    pub source: PathBuf,
    #[serde(flatten)]
    pub source_options: SourceOptions,
    pub default_selection: DefaultSelection,
    pub window_title: String,
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("ML_Testing.xlsx"),
            source_options: SourceOptions::default(),
            default_selection: DefaultSelection::default(),
            window_title: "Customer Intelligence Dashboard".to_string(),
            window_size: [1400.0, 900.0],
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Read `path` if it exists; otherwise, or on error, use the defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Using config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config: {e:#}");
                Self::default()
            }
        }
    }
}
