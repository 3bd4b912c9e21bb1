//! Configuration management for the CLI
//!
//! This module handles loading and merging configuration from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - Environment variables
//! - Command-line arguments

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Definition file used when nothing else is configured
pub const DEFAULT_DEFINITIONS_FILE: &str = "converter.yml";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Conversion definition file
    pub definitions: Option<PathBuf>,

    /// Replaces the preferred units declared in the definition file
    pub preferred_units: Option<Vec<String>>,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Rewrite settings
    pub rewrite: RewriteConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: String,

    /// Use colored output by default
    pub color: bool,

    /// Show progress indicators
    pub progress: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no -v flag is given (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (compact, full, json)
    pub format: String,
}

/// Settings for the rewrite command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Maximum number of documents rewritten at the same time
    pub max_concurrency: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color: true,
            progress: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            max_concurrency: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
        }
    }
}

impl OutputConfig {
    /// The configured format as a CLI output format
    pub fn output_format(&self) -> Result<OutputFormat> {
        OutputFormat::from_str(&self.format, true).map_err(|_| {
            Error::config(format!(
                "Unknown output format '{}' (expected human, json, json-pretty or yaml)",
                self.format
            ))
        })
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;

        let config = if is_yaml(path) {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in &Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        // Return default config if no config file found
        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".unitconv.yaml"),
            PathBuf::from(".unitconv.json"),
            PathBuf::from("unitconv.yaml"),
        ];

        // User config directory
        if let Some(config_dir) = dirs::config_dir() {
            let unitconv_dir = config_dir.join("unitconv");
            paths.push(unitconv_dir.join("config.yaml"));
            paths.push(unitconv_dir.join("config.json"));
        }

        paths
    }

    /// Apply a definition file given on the command line
    pub fn with_definitions(mut self, definitions: Option<PathBuf>) -> Self {
        if definitions.is_some() {
            self.definitions = definitions;
        }
        self
    }

    /// Locate the definition file to load
    ///
    /// An explicitly configured file must exist; otherwise
    /// `converter.yml` in the working directory is used when present.
    pub fn definitions_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.definitions {
            if !path.exists() {
                return Err(Error::FileNotFound { path: path.clone() });
            }
            return Ok(path.clone());
        }

        let fallback = PathBuf::from(DEFAULT_DEFINITIONS_FILE);
        if fallback.exists() {
            return Ok(fallback);
        }

        warn!("No definition file configured and {} not found", DEFAULT_DEFINITIONS_FILE);
        Err(Error::DefinitionsNotFound {
            searched: vec![fallback],
        })
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}
