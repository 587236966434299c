//! Configuration file support for canvanim.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/canvanim/config.toml`, and the scene documents the
//! command-line tool renders.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod scene;
pub mod types;

// Re-export commonly used types at module level
pub use scene::{ItemSpec, SceneFile, ShapeSpec, SurfaceSpec};
pub use types::{ImageConfig, OutputConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure containing all user settings.
///
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [output]
/// file_name = "sketch"
/// directory = "/tmp/renders"
///
/// [images]
/// wait_timeout_ms = 5000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Default output location for rendered surfaces
    #[serde(default)]
    pub output: OutputConfig,

    /// Image loading behaviour
    #[serde(default)]
    pub images: ImageConfig,
}

impl Config {
    /// Upper bound for `images.wait_timeout_ms`.
    const MAX_WAIT_MS: u64 = 60_000;

    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are replaced by the nearest valid value and a warning is logged.
    fn validate_and_clamp(&mut self) {
        if self.images.wait_timeout_ms > Self::MAX_WAIT_MS {
            log::warn!(
                "Invalid wait_timeout_ms {}, clamping to 0-{} range",
                self.images.wait_timeout_ms,
                Self::MAX_WAIT_MS
            );
            self.images.wait_timeout_ms = Self::MAX_WAIT_MS;
        }

        let name = self.output.file_name.trim();
        if name.is_empty() || name.contains(['/', '\\']) {
            log::warn!(
                "Invalid output file_name '{}', falling back to '{}'",
                self.output.file_name,
                types::default_file_name()
            );
            self.output.file_name = types::default_file_name();
        }
    }

    /// How long `render` waits for images.
    pub fn image_wait(&self) -> Duration {
        Duration::from_millis(self.images.wait_timeout_ms)
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/canvanim/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("canvanim");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from file, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit path; a missing file yields defaults.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }
}
