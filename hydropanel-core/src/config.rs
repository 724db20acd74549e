use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use telemetry::DEFAULT_CONTROLLER_URL;

/// Panel settings, loadable from a TOML file. Every field has a default so a
/// partial file is fine; a missing or unreadable file falls back to
/// `PanelConfig::default()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub controller_url: String,
    pub poll_interval_ms: u64,
    pub chart_max_points: usize,
    pub toast_duration_ms: u64,
    pub request_timeout_ms: u64,
    pub l1_threshold: f64,
    pub l2_threshold: f64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            controller_url: DEFAULT_CONTROLLER_URL.to_string(),
            poll_interval_ms: 2000,
            chart_max_points: 50,
            toast_duration_ms: 3000,
            request_timeout_ms: 5000,
            l1_threshold: 30.0,
            l2_threshold: 50.0,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("toml serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl PanelConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Load from `path`, falling back to defaults when the file is missing or
    /// malformed. Non-fatal, as with the remote threshold config.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(err) => {
                if path.exists() {
                    log::warn!("ignoring panel config {}: {err}", path.display());
                }
                Self::default()
            }
        }
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}
