/// Application configuration
///
/// Loaded once at start-up from a JSON file. Every field has a default so a
/// partial file (or none at all) is fine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gui::theme::AppTheme;

/// Environment variable that points at an explicit config file
pub const CONFIG_ENV_VAR: &str = "SIMVIEW_CONFIG";
/// File looked up in the working directory when the variable is unset
pub const DEFAULT_CONFIG_FILE: &str = "simview.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Keyboard modifier that turns the wheel into an x-axis zoom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WheelModifier {
    Shift,
    Ctrl,
    Alt,
}

/// Interaction constants for the chart core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Base of the wheel factor: one step scales by `wheel_base^steps`
    pub wheel_base: f64,
    /// Minimum zoom-box width/height in axis units
    pub zoom_epsilon: f64,
    /// Fractional padding added to the x extent on autoscale
    pub x_margin: f64,
    /// Fractional padding added to the y extent on autoscale
    pub y_margin: f64,
    /// Prefix shown in front of the selected series label
    pub selection_prefix: String,
    /// Opacity of legend glyphs of hidden series
    pub dimmed_alpha: f32,
    /// Decimals in crosshair and measurement readouts
    pub readout_precision: usize,
    pub x_scale_modifier: WheelModifier,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            wheel_base: 0.9,
            zoom_epsilon: 1e-12,
            x_margin: 0.0,
            y_margin: 0.05,
            selection_prefix: "*".to_string(),
            dimmed_alpha: 0.2,
            readout_precision: 2,
            x_scale_modifier: WheelModifier::Shift,
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimviewConfig {
    pub chart: ChartConfig,
    pub theme: AppTheme,
    /// Stroke width of data lines in points
    pub line_width: f32,
}

impl Default for SimviewConfig {
    fn default() -> Self {
        Self {
            chart: ChartConfig::default(),
            theme: AppTheme::Light,
            line_width: 1.0,
        }
    }
}

impl SimviewConfig {
    /// Parse a config from JSON text
    pub fn from_json(text: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, path)
    }

    /// Where to look for the config file
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load from the default location, falling back to defaults.
    /// A missing file is silent; a broken one is logged.
    pub fn load_or_default() -> Self {
        let path = Self::default_path();
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }
}
