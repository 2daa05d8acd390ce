//! Configuration file for the CLI
//!
//! ```json
//! {"log_level": "warn", "schema_dir": "./schemas"}
//! ```
//!
//! Every key is optional. Unknown keys are rejected.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::observability::{log_event_with_fields, Event, Logger, Severity};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Minimum severity written to the log (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: Severity,

    /// Directory of schema files (optional, default "./schemas")
    #[serde(default = "default_schema_dir")]
    pub schema_dir: PathBuf,
}

fn default_log_level() -> Severity {
    Severity::Info
}

fn default_schema_dir() -> PathBuf {
    PathBuf::from("./schemas")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            schema_dir: default_schema_dir(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        let path = path.display().to_string();
        log_event_with_fields(
            Event::ConfigLoaded,
            &[("log_level", config.log_level.as_str()), ("path", path.as_str())],
        );

        Ok(config)
    }

    /// Loads `path` if given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> CliResult<()> {
        if self.schema_dir.as_os_str().is_empty() {
            return Err(CliError::config_error("schema_dir must not be empty"));
        }
        Ok(())
    }

    /// Installs the configured log level.
    pub fn apply(&self) {
        Logger::set_min_severity(self.log_level);
    }

    /// Schema directory, unless a command line flag overrides it.
    pub fn schema_dir_or<'a>(&'a self, flag: Option<&'a Path>) -> &'a Path {
        flag.unwrap_or(&self.schema_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_config(temp_dir: &TempDir, value: serde_json::Value) -> PathBuf {
        let path = temp_dir.path().join("recordkit.json");
        fs::write(&path, value.to_string()).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, json!({}));

        let config = Config::load(&path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.log_level, Severity::Info);
        assert_eq!(config.schema_dir, PathBuf::from("./schemas"));
    }

    #[test]
    fn test_explicit_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, json!({"log_level": "warn", "schema_dir": "/srv/schemas"}));

        let config = Config::load(&path).unwrap();
        assert_eq!(config.log_level, Severity::Warn);
        assert_eq!(config.schema_dir, PathBuf::from("/srv/schemas"));
    }

    #[test]
    fn test_unknown_level_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, json!({"log_level": "verbose"}));

        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code_str(), "CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, json!({"data_dir": "/tmp"}));
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_empty_schema_dir_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, json!({"schema_dir": ""}));
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = Config::load(&temp_dir.path().join("absent.json")).unwrap_err();
        assert!(err.message().contains("Failed to read config"));
    }

    #[test]
    fn test_flag_overrides_schema_dir() {
        let config = Config::default();
        assert_eq!(config.schema_dir_or(None), Path::new("./schemas"));
        assert_eq!(config.schema_dir_or(Some(Path::new("other"))), Path::new("other"));
    }
}
