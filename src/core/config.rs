//! User configuration
//!
//! Loaded from YAML in order, later sources overriding earlier ones:
//! 1. `config.yaml` in the platform config directory
//! 2. the file named by `--config` or `TENDO_CONFIG`
//!
//! Missing files are skipped. Keys left out of a file keep their previous
//! value.

use directories::ProjectDirs;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::core::frame::FramingConfig;
use crate::core::units::{AngleUnit, DisplayPolicy, LengthUnit};
use crate::yaml::{parse_yaml, YamlError};

/// Environment variable naming an extra config file
pub const CONFIG_ENV: &str = "TENDO_CONFIG";

/// Errors loading configuration
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Cannot read config file {path}")]
    #[diagnostic(code(tendo::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] YamlError),
}

/// How numbers are shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub angle_unit: AngleUnit,
    pub length_unit: LengthUnit,
    /// Decimal places in human-readable output
    pub precision: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            angle_unit: AngleUnit::Deg,
            length_unit: LengthUnit::Mm,
            precision: 3,
        }
    }
}

impl DisplayConfig {
    pub fn policy(&self) -> DisplayPolicy {
        DisplayPolicy::default().with_precision(self.precision)
    }
}

/// File watching behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Quiet period after the last change before re-rendering
    pub settle_ms: u64,
    /// How often the file is checked
    pub poll_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            settle_ms: 300,
            poll_ms: 100,
        }
    }
}

impl WatchConfig {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn poll(&self) -> Duration {
        Duration::from_millis(self.poll_ms.max(1))
    }
}

/// Merged configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub framing: FramingConfig,
    pub watch: WatchConfig,
}

/// Partial config as written in a file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigLayer {
    display: Option<DisplayLayer>,
    framing: Option<FramingLayer>,
    watch: Option<WatchLayer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FramingLayer {
    distance_factor: Option<f64>,
    min_factor: Option<f64>,
    max_factor: Option<f64>,
    fallback_distance: Option<f64>,
    fallback_min: Option<f64>,
    fallback_max: Option<f64>,
    default_size: Option<f64>,
}

impl FramingLayer {
    fn apply(self, framing: &mut FramingConfig) {
        let fields = [
            (self.distance_factor, &mut framing.distance_factor),
            (self.min_factor, &mut framing.min_factor),
            (self.max_factor, &mut framing.max_factor),
            (self.fallback_distance, &mut framing.fallback_distance),
            (self.fallback_min, &mut framing.fallback_min),
            (self.fallback_max, &mut framing.fallback_max),
            (self.default_size, &mut framing.default_size),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DisplayLayer {
    angle_unit: Option<AngleUnit>,
    length_unit: Option<LengthUnit>,
    precision: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WatchLayer {
    settle_ms: Option<u64>,
    poll_ms: Option<u64>,
}

impl Config {
    /// Load from the user config dir and an optional explicit path
    ///
    /// The explicit path falls back to `TENDO_CONFIG` when not given. An
    /// explicit path that does not exist is an error; the user config file
    /// is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(path) = Self::user_config_path() {
            if path.is_file() {
                config.apply_file(&path)?;
            }
        }

        let explicit = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        if let Some(path) = explicit {
            config.apply_file(&path)?;
        }

        Ok(config)
    }

    /// Path of the per-user config file
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "tendo").map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loading config from {}", path.display());
        self.apply_str(&content, &path.display().to_string())
    }

    /// Merge a YAML document over the current values
    pub fn apply_str(&mut self, content: &str, filename: &str) -> Result<(), ConfigError> {
        if content.trim().is_empty() {
            return Ok(());
        }
        let layer: ConfigLayer = parse_yaml(content, filename)?;

        if let Some(display) = layer.display {
            if let Some(unit) = display.angle_unit {
                self.display.angle_unit = unit;
            }
            if let Some(unit) = display.length_unit {
                self.display.length_unit = unit;
            }
            if let Some(precision) = display.precision {
                self.display.precision = precision;
            }
        }

        if let Some(framing) = layer.framing {
            framing.apply(&mut self.framing);
        }

        if let Some(watch) = layer.watch {
            if let Some(ms) = watch.settle_ms {
                self.watch.settle_ms = ms;
            }
            if let Some(ms) = watch.poll_ms {
                self.watch.poll_ms = ms;
            }
        }

        Ok(())
    }
}
