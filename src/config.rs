//! Shared config utilities for loading/saving JSON config files,
//! plus the tuning configuration itself.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::store::write_atomic;
use crate::tuning::ThresholdGrid;

/// File name of the tuning config inside the data directory.
pub const CONFIG_FILE: &str = "sentitune.json";

/// Read a JSON config, falling back to `T::default()`.
///
/// A missing file is the normal first-run case and is only logged at debug
/// level. An unreadable or malformed file is warned about, since the user
/// probably expects their settings to apply.
pub fn load_json_config<T: DeserializeOwned + Default>(path: &Path, label: &str) -> T {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("[{}] {} not found, using defaults", label, path.display());
            return T::default();
        }
        Err(e) => {
            warn!("[{}] Cannot read {}: {}; using defaults", label, path.display(), e);
            return T::default();
        }
    };

    serde_json::from_str(&content)
        .map(|config| {
            info!("[{}] Loaded {}", label, path.display());
            config
        })
        .unwrap_or_else(|e| {
            warn!("[{}] Ignoring malformed {}: {}", label, path.display(), e);
            T::default()
        })
}

/// Generic save for any Serde config type. The file is replaced atomically.
pub fn save_json_config<T: Serialize>(path: &Path, config: &T, label: &str) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(config).map_err(|e| StoreError::json(path, e))?;
    write_atomic(path, json.as_bytes())?;
    info!("[{}] Saved config to {}", label, path.display());
    Ok(())
}

/// Default data directory: the platform data dir, or `./sentitune` if there is none.
pub fn default_data_dir() -> PathBuf {
    dirs_next::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sentitune")
}

// ── Tuning Config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TuneConfig {
    /// Samples generated per sentiment class.
    pub count_per_class: usize,
    /// Share of the shuffled corpus used for training; the rest is held out.
    pub train_ratio: f64,
    /// Fixed RNG seed for reproducible corpora. `None` = fresh entropy each run.
    pub seed: Option<u64>,
    pub grid: ThresholdGrid,
}

impl Default for TuneConfig {
    fn default() -> Self {
        Self {
            count_per_class: 100,
            train_ratio: 0.8,
            seed: None,
            grid: ThresholdGrid::default(),
        }
    }
}

impl TuneConfig {
    pub fn load(data_dir: &Path) -> Self {
        load_json_config(&data_dir.join(CONFIG_FILE), "Config")
    }

    pub fn save(&self, data_dir: &Path) -> Result<(), StoreError> {
        save_json_config(&data_dir.join(CONFIG_FILE), self, "Config")
    }
}
