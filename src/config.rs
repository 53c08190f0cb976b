//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the lcars-config.toml file.
//! It provides a centralized way to configure the simulated display surface, the tick
//! cadence and logging verbosity.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "lcars-config.toml";

/// Errors raised while reading or writing the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read
    #[error("config read: {0}")]
    Read(#[source] io::Error),

    /// The file is not valid TOML for [`Config`]
    #[error("config parse: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config serialize: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("config write: {0}")]
    Write(#[source] io::Error),
}

/// Application configuration loaded from lcars-config.toml
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Display surface configuration
    pub display: DisplayConfig,
    /// Face behaviour
    pub face: FaceConfig,
    pub logging: LoggingConfig,
}

/// Surface the face is laid out for
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FaceConfig {
    /// Tick period while active, in milliseconds
    pub tick_interval_ms: u64,
    /// Start in ambient mode instead of active
    pub start_ambient: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Enable debug logging and honour `RUST_LOG`
    pub debug: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 400,  // Typical round watch panel
            height: 400,
        }
    }
}

impl DisplayConfig {
    /// Replace zero dimensions with the defaults; a surface is never empty.
    fn sanitize(&mut self) {
        let defaults = Self::default();
        if self.width == 0 {
            tracing::warn!(default = defaults.width, "display width is zero, using default");
            self.width = defaults.width;
        }
        if self.height == 0 {
            tracing::warn!(default = defaults.height, "display height is zero, using default");
            self.height = defaults.height;
        }
    }
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: crate::scheduler::INTERACTIVE_UPDATE_RATE_MS,
            start_ambient: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            display: DisplayConfig::default(),
            face: FaceConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from lcars-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match Self::try_load_from_path(&path) {
            Ok(config) => {
                tracing::info!(
                    width = config.display.width,
                    height = config.display.height,
                    "loaded configuration"
                );
                config
            }
            Err(ConfigError::Read(_)) => {
                tracing::info!("no config file found, using default configuration");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "invalid config file, using default configuration");
                Self::default()
            }
        }
    }

    /// Load configuration, reporting every failure
    pub fn try_load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(ConfigError::Read)?;
        let mut config = toml::from_str::<Config>(&contents)?;
        config.display.sanitize();
        Ok(config)
    }

    /// Save current configuration to lcars-config.toml
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to_path(CONFIG_FILE)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(ConfigError::Write)?;
        tracing::info!("configuration saved");
        Ok(())
    }
}
