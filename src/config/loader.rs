//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{PayrollError, PayrollResult};

use super::types::PayrollConfig;

/// Loads and provides access to the engine configuration.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/payroll.yaml").unwrap();
/// println!("State file: {}", loader.config().storage_path.display());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - The file is missing or unreadable ([`PayrollError::ConfigNotFound`])
    /// - The file contains invalid YAML ([`PayrollError::ConfigParseError`])
    pub fn load<P: AsRef<Path>>(path: P) -> PayrollResult<Self> {
        let path = path.as_ref();
        let config = Self::load_yaml::<PayrollConfig>(path)?;
        debug!(
            path = %path.display(),
            storage_path = %config.storage_path.display(),
            load_on_start = config.load_on_start,
            "Loaded configuration"
        );
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> PayrollResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PayrollError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        // An empty file deserializes as null, which means "all defaults".
        if content.trim().is_empty() {
            return serde_yaml::from_str("{}").map_err(|e| PayrollError::ConfigParseError {
                path: path_str,
                message: e.to_string(),
            });
        }

        serde_yaml::from_str(&content).map_err(|e| PayrollError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> PayrollConfig {
        self.config
    }
}
