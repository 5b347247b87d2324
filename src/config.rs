//! Configuration loaded from `tenure.toml` in the working directory.
//!
//! Values missing from the file use sensible defaults. The
//! `TENURE_DATA_FILE` environment variable takes precedence over the file
//! for the data-file path.

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration loaded from `tenure.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct TenureConfig {
    /// Path to the JSON data file holding employees, catalog and audit.
    #[serde(default = "default_data_file")]
    pub data_file: String,

    /// Interval between scheduled sweep cycles, in seconds.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Window for the expiry report, in days. When unset, each contract
    /// type's own notice window applies.
    #[serde(default)]
    pub expiry_window_days: Option<i64>,
}

fn default_data_file() -> String {
    "employees.json".to_string()
}

// Hourly, matching the surrounding application's job runner.
fn default_sweep_interval_secs() -> u64 {
    3600
}

impl Default for TenureConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            sweep_interval_secs: default_sweep_interval_secs(),
            expiry_window_days: None,
        }
    }
}

impl TenureConfig {
    /// Load the configuration from `tenure.toml` in the current directory.
    /// Falls back to defaults if the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("tenure.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<TenureConfig>(&contents)?
        } else {
            Self::default()
        };

        // Environment variable takes precedence over the file.
        if let Ok(data_file) = std::env::var("TENURE_DATA_FILE")
            && !data_file.is_empty()
        {
            config.data_file = data_file;
        }

        Ok(config)
    }
}
