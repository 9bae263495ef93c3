// src/config/loader.rs
//! Layered configuration loader
//!
//! Sources are merged in order: built-in defaults, each TOML file that
//! exists, then `TOUCH__SECTION__KEY` environment variables.

use crate::config::{constants::paths, MonitorConfig};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Configuration loader
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    current_config: MonitorConfig,
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File passed for validation does not exist
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Merging or deserializing the layered sources failed
    #[error("Configuration source error: {0}")]
    Source(#[from] ::config::ConfigError),

    /// TOML content could not be parsed
    #[error("Configuration parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration could not be written as TOML
    #[error("Configuration serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Filesystem access failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Merged configuration failed consistency checks
    #[error("Configuration validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

impl ConfigLoader {
    /// Create new configuration loader
    pub fn new() -> Self {
        Self::with_paths(vec![PathBuf::from(paths::DEFAULT_CONFIG_FILE)])
    }

    /// Create loader with custom paths
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            config_paths: paths,
            current_config: MonitorConfig::default(),
        }
    }

    /// Load monitor configuration with validation
    pub fn load_monitor_config(&mut self) -> Result<MonitorConfig, ConfigError> {
        let config = self.load_and_merge_configs()?;
        self.current_config = config.clone();
        Ok(config)
    }

    /// Get current configuration
    pub fn get_current_config(&self) -> &MonitorConfig {
        &self.current_config
    }

    /// Validate a single configuration file without loading it
    pub fn validate_config_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let config: MonitorConfig = toml::from_str(&content)?;

        config
            .validate_consistency()
            .map_err(ConfigError::Validation)
    }

    /// Export current configuration to file
    pub fn export_config<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let toml_content = toml::to_string_pretty(&self.current_config)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    fn load_and_merge_configs(&self) -> Result<MonitorConfig, ConfigError> {
        let mut builder = ::config::Config::builder()
            .add_source(::config::Config::try_from(&MonitorConfig::default())?);

        for config_path in &self.config_paths {
            if config_path.exists() {
                debug!(path = %config_path.display(), "merging configuration file");
            }
            builder = builder.add_source(
                ::config::File::from(config_path.as_path())
                    .format(::config::FileFormat::Toml)
                    .required(false),
            );
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix(paths::ENV_PREFIX)
                .prefix_separator(paths::ENV_SEPARATOR)
                .separator(paths::ENV_SEPARATOR)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("thresholds.touch_relevant_states")
                .with_list_parse_key("channels.lickports"),
        );

        let config: MonitorConfig = builder.build()?.try_deserialize()?;

        if let Err(errors) = config.validate_consistency() {
            for error in &errors {
                warn!(%error, "invalid monitor configuration");
            }
            return Err(ConfigError::Validation(errors));
        }

        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
