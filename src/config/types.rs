//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structure that is
//! deserialized from the YAML configuration file.

use serde::Deserialize;
use std::path::PathBuf;

/// File the engine persists its state to when none is configured.
pub const DEFAULT_STORAGE_PATH: &str = "payroll-state.json";

/// Engine settings.
///
/// Every field has a default, so an empty YAML document is a valid
/// configuration.
///
/// # Example
///
/// ```
/// use payroll_engine::config::PayrollConfig;
///
/// let config: PayrollConfig = serde_yaml::from_str("storage_path: /tmp/folha.json").unwrap();
/// assert_eq!(config.storage_path.to_str(), Some("/tmp/folha.json"));
/// assert!(config.load_on_start);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PayrollConfig {
    /// Where the directory and custom schedules are saved on shutdown.
    pub storage_path: PathBuf,
    /// Whether to load the saved state when the engine starts.
    pub load_on_start: bool,
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            load_on_start: true,
        }
    }
}

impl PayrollConfig {
    /// Default settings with a different storage file.
    pub fn with_storage_path(storage_path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: storage_path.into(),
            ..Self::default()
        }
    }
}
