//! Configuration file
//!
//! ```json
//! {
//!   "schema_dir": "./schemas",
//!   "encode_mode": "sparse",
//!   "clear": true,
//!   "log_level": "info"
//! }
//! ```
//!
//! A relative `schema_dir` is resolved against the config file's directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::observability::Severity;
use crate::schema::EncodeMode;

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory of schema files (required)
    pub schema_dir: String,

    /// Encode mode for every schema (optional, default: each schema's own)
    #[serde(default)]
    pub encode_mode: Option<EncodeMode>,

    /// Clear a base databag before encoding into it (optional, default true)
    #[serde(default = "default_clear")]
    pub clear: bool,

    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_clear() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        let schema_dir = Path::new(&config.schema_dir);
        if schema_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.schema_dir = parent.join(schema_dir).display().to_string();
            }
        }

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.schema_dir.trim().is_empty() {
            return Err(CliError::config_error("schema_dir must not be empty"));
        }

        self.min_severity()?;

        Ok(())
    }

    /// Schema directory as a path
    pub fn schema_path(&self) -> PathBuf {
        PathBuf::from(&self.schema_dir)
    }

    /// Parsed `log_level`
    pub fn min_severity(&self) -> CliResult<Severity> {
        self.log_level.parse().map_err(|e: String| {
            CliError::config_error(format!("Invalid log_level: {}", e))
        })
    }
}
