// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{RawWorkerConfig, WorkerConfig};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// `RawWorkerConfig`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] to also
/// check the values.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawWorkerConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawWorkerConfig = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it into a `WorkerConfig`.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<WorkerConfig> {
    let raw_config = load_from_path(&path)?;
    let config = WorkerConfig::try_from(raw_config)?;
    Ok(config)
}

/// `Workerctl.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Workerctl.toml")
}
