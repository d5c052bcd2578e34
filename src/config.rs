use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Full listings file; probed first.
pub const FULL_DATASET_FILE: &str = "vehicles_us.csv";
/// Lightweight sample shipped with the project; probed second.
pub const SAMPLE_DATASET_FILE: &str = "vehicles_us_sample.csv";

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "vehicle-explorer.json";
/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "VEHICLE_EXPLORER_CONFIG";
/// Overrides `data_dir`.
pub const DATA_DIR_ENV: &str = "VEHICLE_EXPLORER_DATA_DIR";

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory probed for the bundled dataset.
    pub data_dir: PathBuf,
    /// Bundled file names, in probe order.
    pub candidate_files: Vec<String>,
    /// Maximum rows drawn by the scatter when sampling is on.
    pub sample_limit: usize,
    pub sample_seed: u64,
    /// Rows shown by the raw-table toggle.
    pub raw_row_limit: usize,
    pub export_file_name: String,
    pub window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            candidate_files: vec![FULL_DATASET_FILE.to_string(), SAMPLE_DATASET_FILE.to_string()],
            sample_limit: 5000,
            sample_seed: 42,
            raw_row_limit: 100,
            export_file_name: "vehicles_filtered.csv".to_string(),
            window_size: [1280.0, 860.0],
        }
    }
}

impl AppConfig {
    /// Defaults, then the optional JSON config file, then environment overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

        let config = if path.is_file() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_json_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Apply environment overrides through `lookup` (normally `std::env::var`).
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        self
    }
}
