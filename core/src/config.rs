//! Configuration loading and validation for the fleet controller
//!
//! Every field has a default, so an empty TOML document is a valid config.

use crate::{CoreError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Program launched by `start` when nothing else is configured
pub const DEFAULT_CHILD_EXECUTABLE: &str = "fleet-worker";

/// Interpreter used by the indirect invocation plan
pub const DEFAULT_LAUNCHER: &str = "powershell";

/// Controller configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FleetConfig {
    /// Name of the child program, resolved inside `base_dir`
    pub child_executable: String,
    /// Directory the child is resolved against and runs in.
    /// Defaults to the directory of the controller executable.
    pub base_dir: Option<PathBuf>,
    /// Interpreter for platforms that do not execute the child directly
    pub launcher: String,
    /// Fallback tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            child_executable: DEFAULT_CHILD_EXECUTABLE.to_string(),
            base_dir: None,
            launcher: DEFAULT_LAUNCHER.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl FleetConfig {
    /// Validate the configuration and return `Result<()>` with field-named errors
    pub fn validate(&self) -> Result<()> {
        if self.child_executable.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "childExecutable: cannot be empty".to_string(),
            ));
        }
        if self.launcher.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "launcher: cannot be empty".to_string(),
            ));
        }
        if self.log_level.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "logLevel: cannot be empty".to_string(),
            ));
        }
        if let Some(dir) = &self.base_dir {
            if !dir.is_dir() {
                return Err(CoreError::ValidationError(format!(
                    "baseDir: {:?} is not a directory",
                    dir
                )));
            }
        }
        Ok(())
    }
}

/// Load controller config from TOML file path
pub fn load_config_from_toml_path(path: impl AsRef<Path>) -> Result<FleetConfig> {
    let data = fs::read_to_string(&path).map_err(|e| {
        CoreError::ConfigurationError(format!("Failed to read config {:?}: {}", path.as_ref(), e))
    })?;
    load_config_from_toml_str(&data)
}

/// Load controller config from a TOML string
pub fn load_config_from_toml_str(input: &str) -> Result<FleetConfig> {
    let cfg: FleetConfig = toml::from_str(input)
        .map_err(|e| CoreError::ConfigurationError(format!("TOML parse error: {}", e)))?;
    cfg.validate()?;
    Ok(cfg)
}
