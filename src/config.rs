//! Engine configuration.
//!
//! Loaded once at engine construction from an optional JSON file; a
//! missing source falls back to the documented defaults. A config path
//! that was explicitly given but cannot be read or parsed is an error.

use crate::errors::{DvdError, DvdResult};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_TARGET_IP: &str = "10.13.0.2";
pub const DEFAULT_DELAY_BETWEEN: f64 = 2.0;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub attacks: AttacksConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// IP or identifier attacks run against
    #[serde(default = "default_target_ip")]
    pub ip: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttacksConfig {
    /// Seconds slept between attacks in a batch run
    #[serde(default = "default_delay_between")]
    pub delay_between: f64,
    /// Optional fixed RNG seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            ip: default_target_ip(),
        }
    }
}

impl Default for AttacksConfig {
    fn default() -> Self {
        Self {
            delay_between: default_delay_between(),
            seed: None,
        }
    }
}

fn default_target_ip() -> String {
    DEFAULT_TARGET_IP.to_string()
}

fn default_delay_between() -> f64 {
    DEFAULT_DELAY_BETWEEN
}

impl EngineConfig {
    /// Load from a JSON file, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> DvdResult<Self> {
        let Some(path) = path else {
            log::debug!("no config source, using defaults");
            return Ok(Self::default());
        };

        let body = std::fs::read_to_string(path)
            .map_err(|e| DvdError::config(path, e.to_string()))?;
        let config: EngineConfig = serde_json::from_str(&body)
            .map_err(|e| DvdError::config(path, e.to_string()))?;
        log::info!("loaded configuration from {path:?}");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::load(None).unwrap();
        assert_eq!(config.target.ip, "10.13.0.2");
        assert_eq!(config.attacks.delay_between, 2.0);
        assert!(config.attacks.seed.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"target": {{"ip": "192.168.13.1"}}}}"#).unwrap();

        let config = EngineConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.target.ip, "192.168.13.1");
        assert_eq!(config.attacks.delay_between, 2.0);
    }

    #[test]
    fn test_explicit_bad_path_is_error() {
        let err = EngineConfig::load(Some(Path::new("/missing/config.json"))).unwrap_err();
        assert!(matches!(err, DvdError::Config { .. }));
    }

    #[test]
    fn test_invalid_json_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = EngineConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, DvdError::Config { .. }));
    }
}
