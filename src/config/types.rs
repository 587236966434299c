//! Configuration type definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where rendered surfaces are written.
///
/// Used by `canvanim render` when no `--output` is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File name without the `.png` extension
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Directory for rendered files; the working directory when unset
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
            directory: None,
        }
    }
}

impl OutputConfig {
    /// Output path without extension, as accepted by `Surface::save`.
    pub fn stem(&self) -> PathBuf {
        match &self.directory {
            Some(dir) => dir.join(&self.file_name),
            None => PathBuf::from(&self.file_name),
        }
    }
}

/// Image loading settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageConfig {
    /// How long to wait for pending image loads before saving, in milliseconds
    /// (valid range: 0 - 60000)
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            wait_timeout_ms: default_wait_timeout_ms(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

pub(super) fn default_file_name() -> String {
    crate::scene::DEFAULT_SAVE_NAME.to_string()
}

fn default_wait_timeout_ms() -> u64 {
    2000
}
