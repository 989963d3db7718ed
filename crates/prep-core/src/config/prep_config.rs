//! Top-level prep configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{OutputConfig, PackageConfig};
use crate::errors::ConfigError;

/// Project config file name, looked up in the search root.
pub const PROJECT_CONFIG_FILE: &str = "prep.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`PREP_*`)
/// 3. Project config (`prep.toml` in the search root)
/// 4. User config (`~/.prep/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PrepConfig {
    pub package: PackageConfig,
    pub output: OutputConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub include_tests: Option<bool>,
    pub output_file: Option<String>,
    pub dry_run: Option<bool>,
}

impl PrepConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &PrepConfig) -> Result<(), ConfigError> {
        if let Some(ref name) = config.output.file_name {
            let invalid = |message: &str| ConfigError::ValidationFailed {
                field: "output.file_name".to_string(),
                message: message.to_string(),
            };
            if name.is_empty() {
                return Err(invalid("must not be empty"));
            }
            if name.contains('/') || name.contains('\\') {
                return Err(invalid("must be a bare file name"));
            }
            if !name.ends_with(".go") {
                return Err(invalid("must end in .go"));
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.prep/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".prep").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut PrepConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: PrepConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; only `Some` values in `other` win.
    fn merge(base: &mut PrepConfig, other: &PrepConfig) {
        if other.package.include_tests.is_some() {
            base.package.include_tests = other.package.include_tests;
        }
        if other.package.gopath.is_some() {
            base.package.gopath = other.package.gopath.clone();
        }
        if other.output.file_name.is_some() {
            base.output.file_name = other.output.file_name.clone();
        }
        if other.output.dry_run.is_some() {
            base.output.dry_run = other.output.dry_run;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `PREP_OUTPUT_FILE`, `PREP_INCLUDE_TESTS`, etc.
    fn apply_env_overrides(config: &mut PrepConfig) {
        if let Ok(val) = std::env::var("PREP_INCLUDE_TESTS") {
            if let Ok(v) = val.parse::<bool>() {
                config.package.include_tests = Some(v);
            }
        }
        if let Ok(val) = std::env::var("PREP_GOPATH") {
            config.package.gopath = Some(val);
        }
        if let Ok(val) = std::env::var("PREP_OUTPUT_FILE") {
            config.output.file_name = Some(val);
        }
        if let Ok(val) = std::env::var("PREP_DRY_RUN") {
            if let Ok(v) = val.parse::<bool>() {
                config.output.dry_run = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut PrepConfig, cli: &CliOverrides) {
        if let Some(v) = cli.include_tests {
            config.package.include_tests = Some(v);
        }
        if let Some(ref v) = cli.output_file {
            config.output.file_name = Some(v.clone());
        }
        if let Some(v) = cli.dry_run {
            config.output.dry_run = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
pub(crate) fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
