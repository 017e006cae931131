//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{GazeError, GazeResult};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Where and how often to read the producer's channel.
    pub channel: ChannelConfig,

    /// Tunables for the conditioning pipeline.
    pub conditioning: ConditioningConfig,

    /// Overlay geometry fed by stable gaze updates.
    pub overlay: OverlayConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Channel polling parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Path of the file the producer rewrites with its latest sample.
    pub path: PathBuf,

    /// Sample poll tick in milliseconds.
    pub poll_interval_ms: u64,

    /// Connectivity probe cadence in milliseconds.
    pub status_interval_ms: u64,

    /// Maximum channel age (seconds) still reported as connected.
    pub freshness_secs: f64,
}

/// Conditioning pipeline tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditioningConfig {
    /// Rolling history window `H`.
    pub window_size: usize,

    /// Exponential smoothing factor `α` in `(0, 1]`.
    pub smoothing_factor: f64,

    /// Movement gate threshold `T`; emission requires `distance >= T`.
    pub gate_threshold: f64,
}

/// Overlay geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Side length of the square focus-reveal region.
    pub focus_size: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "gazelens_session=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            path: default_channel_path(),
            poll_interval_ms: 20,
            status_interval_ms: 2000,
            freshness_secs: 5.0,
        }
    }
}

impl Default for ConditioningConfig {
    fn default() -> Self {
        Self {
            window_size: 5,
            smoothing_factor: 0.3,
            gate_threshold: 2.0,
        }
    }
}

impl ConditioningConfig {
    /// Reject tunables the pipeline cannot run with.
    pub fn validate(&self) -> GazeResult<()> {
        if self.window_size == 0 {
            return Err(GazeError::config("window_size must be at least 1"));
        }
        if !(self.smoothing_factor > 0.0 && self.smoothing_factor <= 1.0) {
            return Err(GazeError::config(format!(
                "smoothing_factor must be in (0, 1], got {}",
                self.smoothing_factor
            )));
        }
        if !self.gate_threshold.is_finite() || self.gate_threshold < 0.0 {
            return Err(GazeError::config(format!(
                "gate_threshold must be a finite non-negative number, got {}",
                self.gate_threshold
            )));
        }
        Ok(())
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self { focus_size: 100.0 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl ChannelConfig {
    /// Reject intervals that would spin or never fire.
    pub fn validate(&self) -> GazeResult<()> {
        if self.poll_interval_ms == 0 || self.status_interval_ms == 0 {
            return Err(GazeError::config("intervals must be greater than zero"));
        }
        if !self.freshness_secs.is_finite() || self.freshness_secs <= 0.0 {
            return Err(GazeError::config("freshness_secs must be positive"));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location, returning the path written.
    pub fn save(&self) -> GazeResult<PathBuf> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, json)?;
        Ok(config_path)
    }

    /// Validate every section the runtime depends on.
    pub fn validate(&self) -> GazeResult<()> {
        self.channel.validate()?;
        self.conditioning.validate()?;
        if !self.overlay.focus_size.is_finite() || self.overlay.focus_size < 0.0 {
            return Err(GazeError::config("focus_size must be non-negative"));
        }
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"));
    base.join("gazelens").join("config.json")
}

/// Default channel location written by the eye-tracking producer.
pub fn default_channel_path() -> PathBuf {
    home_dir().join("talon_gaze_data.json")
}

fn home_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home)
}
