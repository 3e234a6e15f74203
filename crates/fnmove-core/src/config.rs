//! Configuration handling for fnmove
//!
//! Settings live in an optional `.fnmove.toml` at the project root:
//!
//! ```toml
//! [relocate]
//! preview = true
//! confirm_attempts = 5
//! exclude = ["vendor/**", "testdata/**"]
//! include_tests = false
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = ".fnmove.toml";

/// Errors reading or parsing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid config value for {key}: {message}")]
    Invalid { key: String, message: String },
}

/// fnmove configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Relocation settings
    #[serde(default)]
    pub relocate: RelocateConfig,
}

/// Relocation settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelocateConfig {
    /// Show a diff and ask for confirmation before writing
    #[serde(default = "default_preview")]
    pub preview: bool,

    /// Maximum prompts before an unanswered confirmation declines
    #[serde(default = "default_confirm_attempts")]
    pub confirm_attempts: u32,

    /// Directory globs skipped while loading, relative to the project root
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Load `_test.go` files as part of their packages
    #[serde(default)]
    pub include_tests: bool,
}

fn default_preview() -> bool {
    true
}

fn default_confirm_attempts() -> u32 {
    5
}

fn default_exclude() -> Vec<String> {
    vec!["vendor/**".to_string(), "testdata/**".to_string()]
}

impl Default for RelocateConfig {
    fn default() -> Self {
        Self {
            preview: default_preview(),
            confirm_attempts: default_confirm_attempts(),
            exclude: default_exclude(),
            include_tests: false,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(path, &content)
    }

    /// Load `.fnmove.toml` from the project root, or defaults when absent
    pub fn load_from_project(project_root: &Path) -> Result<Self, ConfigError> {
        let config_path = project_root.join(CONFIG_FILE_NAME);
        if config_path.is_file() {
            Self::load(&config_path)
        } else {
            Ok(Config::default())
        }
    }

    fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.relocate.confirm_attempts == 0 {
            return Err(ConfigError::Invalid {
                key: "relocate.confirm_attempts".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_file_missing() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from_project(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.relocate.preview);
        assert_eq!(config.relocate.confirm_attempts, 5);
        assert!(!config.relocate.include_tests);
    }

    #[test]
    fn partial_table_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[relocate]\npreview = false\n",
        )
        .unwrap();
        let config = Config::load_from_project(dir.path()).unwrap();
        assert!(!config.relocate.preview);
        assert_eq!(config.relocate.confirm_attempts, 5);
        assert_eq!(config.relocate.exclude, default_exclude());
    }

    #[test]
    fn empty_file_is_default() {
        let config = Config::parse(Path::new("x.toml"), "").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = Config::parse(Path::new("x.toml"), "[relocate\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn zero_attempts_rejected() {
        let err = Config::parse(Path::new("x.toml"), "[relocate]\nconfirm_attempts = 0\n")
            .unwrap_err();
        assert!(err.to_string().contains("relocate.confirm_attempts"));
    }

    #[test]
    fn custom_excludes() {
        let config = Config::parse(
            Path::new("x.toml"),
            "[relocate]\nexclude = [\"gen/**\"]\ninclude_tests = true\n",
        )
        .unwrap();
        assert_eq!(config.relocate.exclude, vec!["gen/**".to_string()]);
        assert!(config.relocate.include_tests);
    }
}
