//! Configuration loading for the payroll engine.
//!
//! This module loads the engine settings (where state is persisted and
//! whether to load it at startup) from a YAML file.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/payroll.yaml").unwrap();
//! println!("State file: {}", config.config().storage_path.display());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{DEFAULT_STORAGE_PATH, PayrollConfig};
