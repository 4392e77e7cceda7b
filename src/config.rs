//! Configuration management for ECS Fleet Report.
//!
//! Configuration is read from a TOML file, by default
//! `~/.ecs-fleet-report/config.toml`. It covers AWS credential selection, the
//! container image exclusion policy and the failure mode of discovery.
//! Command-line flags take precedence over every value here.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::filter::{ImageFilter, DEFAULT_EXCLUDED_IMAGE};

/// Main configuration structure.
///
/// All options are optional and fall back to defaults when missing.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// AWS-specific configuration options
    #[serde(default)]
    pub aws: AwsConfig,

    /// Container image exclusion
    #[serde(default)]
    pub filter: FilterConfig,

    /// Discovery behavior
    #[serde(default)]
    pub behavior: BehaviorConfig,
}

/// AWS SDK configuration options.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AwsConfig {
    /// AWS region (e.g., "us-east-1")
    /// If not specified, the SDK's default resolution applies (env vars, profile, etc.)
    pub region: Option<String>,

    /// AWS profile name from ~/.aws/credentials
    pub profile: Option<String>,
}

/// Which container images are left out of reports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterConfig {
    /// Images whose reference contains any of these substrings are excluded
    #[serde(default = "default_exclude_images")]
    pub exclude_images: Vec<String>,

    /// Images whose reference matches any of these regular expressions are excluded
    #[serde(default)]
    pub exclude_image_patterns: Vec<String>,
}

/// Discovery behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BehaviorConfig {
    /// Continue with the remaining clusters when one cluster fails
    #[serde(default)]
    pub keep_going: bool,
}

fn default_exclude_images() -> Vec<String> {
    vec![DEFAULT_EXCLUDED_IMAGE.to_string()]
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            exclude_images: default_exclude_images(),
            exclude_image_patterns: Vec::new(),
        }
    }
}

impl FilterConfig {
    /// Compiles the exclusion settings into an [`ImageFilter`].
    ///
    /// # Errors
    /// Returns an error if an exclude pattern is not a valid regular expression.
    pub fn image_filter(&self) -> crate::Result<ImageFilter> {
        ImageFilter::new(
            self.exclude_images.iter().cloned(),
            self.exclude_image_patterns.iter(),
        )
    }
}

const DEFAULT_CONFIG_TOML: &str = r#"# ECS Fleet Report Configuration File
# This file is automatically generated with default values.

[aws]
# AWS region to query (optional)
# If not specified, uses AWS SDK's default resolution (env vars, ~/.aws/config, etc.)
# region = "us-east-1"

# AWS profile to use from ~/.aws/credentials (optional)
# profile = "default"

[filter]
# Container images containing any of these substrings are left out of both
# reports. The task listing tests the full image reference, the deployment
# table tests the image name without its registry path.
exclude_images = ["nginx"]

# Regular expressions, tested the same way as exclude_images
# exclude_image_patterns = ["^datadog-agent:"]

[behavior]
# When true, a failing cluster is reported with an error marker and the
# remaining clusters are still listed. When false, the first failure aborts.
keep_going = false
"#;

impl Config {
    /// Returns the path to the configuration directory (~/.ecs-fleet-report/)
    pub fn config_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(home_dir.join(".ecs-fleet-report"))
    }

    /// Returns the path to the configuration file (~/.ecs-fleet-report/config.toml)
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the default location, creating it if it doesn't exist.
    ///
    /// An undeterminable home directory falls back to the defaults.
    ///
    /// # Errors
    /// This function will return an error if an existing config file cannot
    /// be read or parsed.
    pub fn load() -> Result<Self> {
        match Self::config_file_path() {
            Ok(config_path) => Self::load_or_init(&config_path),
            Err(e) => {
                warn!(error = %e, "no config location, using defaults");
                Ok(Config::default())
            }
        }
    }

    /// Loads `path` if it exists, otherwise writes the default file there.
    ///
    /// Failing to write the default file (read-only or unusual home
    /// directories) is not fatal: a warning is logged and the defaults are
    /// returned.
    ///
    /// # Arguments
    /// * `path` - Location of the config file
    ///
    /// # Errors
    /// This function will return an error if the file exists but cannot be
    /// read or parsed.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from(path);
        }

        if let Err(e) = Self::create_default_config(path) {
            warn!(
                path = %path.display(),
                error = %format!("{e:#}"),
                "could not write default config, using defaults"
            );
        }
        Ok(Config::default())
    }

    /// Loads configuration from an explicit path. The file must exist.
    ///
    /// # Errors
    /// Returns an error naming `path` if it cannot be read or is not valid TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path:?}"))?;

        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path:?}"))
    }

    /// Parses configuration from TOML text. Missing sections take defaults.
    ///
    /// # Errors
    /// Returns an error if the text is not valid TOML or a value has the wrong type.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Writes the commented default configuration to `path`, creating parent
    /// directories as needed.
    ///
    /// # Errors
    /// Returns an error if the directory or the file cannot be written.
    pub fn create_default_config(path: &Path) -> Result<()> {
        if let Some(config_dir) = path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir).with_context(|| {
                    format!("Failed to create config directory: {config_dir:?}")
                })?;
            }
        }

        fs::write(path, DEFAULT_CONFIG_TOML)
            .with_context(|| format!("Failed to write config file: {path:?}"))?;

        Ok(())
    }
}
