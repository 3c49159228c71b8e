// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{RawWorkerConfig, WorkerConfig};
use crate::errors::{Result, WorkerError};

impl TryFrom<RawWorkerConfig> for WorkerConfig {
    type Error = crate::errors::WorkerError;

    fn try_from(raw: RawWorkerConfig) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        let section = raw.worker;
        Ok(WorkerConfig::new_unchecked(
            section.name.trim().to_string(),
            section.strategy,
            Duration::from_millis(section.stop_timeout_ms),
        ))
    }
}

fn validate_raw_config(cfg: &RawWorkerConfig) -> Result<()> {
    validate_name(cfg)?;
    validate_stop_timeout(cfg)?;
    Ok(())
}

fn validate_name(cfg: &RawWorkerConfig) -> Result<()> {
    let name = cfg.worker.name.trim();
    if name.is_empty() {
        return Err(WorkerError::ConfigError(
            "[worker].name must not be empty".to_string(),
        ));
    }
    // Thread names may not contain interior NULs.
    if name.contains('\0') {
        return Err(WorkerError::ConfigError(format!(
            "[worker].name '{}' contains a NUL byte",
            name.escape_debug()
        )));
    }
    Ok(())
}

fn validate_stop_timeout(cfg: &RawWorkerConfig) -> Result<()> {
    if cfg.worker.stop_timeout_ms == 0 {
        return Err(WorkerError::ConfigError(
            "[worker].stop_timeout_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LaunchStrategy;

    #[test]
    fn empty_document_yields_defaults() {
        let raw: RawWorkerConfig = toml::from_str("").unwrap();
        let cfg = WorkerConfig::try_from(raw).unwrap();
        assert_eq!(cfg, WorkerConfig::default());
        assert_eq!(cfg.strategy(), LaunchStrategy::Pooled);
        assert_eq!(cfg.stop_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn blank_name_is_rejected() {
        let raw: RawWorkerConfig = toml::from_str("[worker]\nname = \"  \"\n").unwrap();
        match WorkerConfig::try_from(raw) {
            Err(WorkerError::ConfigError(msg)) => assert!(msg.contains("name")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }
}
