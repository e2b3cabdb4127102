//! Analysis thresholds
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/fincoach/config/fincoach.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override keep their built-in values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/fincoach.toml");

/// Longest lookback window accepted from config (ten years)
pub const MAX_LOOKBACK_DAYS: i64 = 3650;
pub const MAX_WINDOW_HOURS: i64 = MAX_LOOKBACK_DAYS * 24;

/// Reject windows that are empty or too long to subtract from a timestamp
fn window(name: &str, value: i64, max: i64) -> Result<i64> {
    if !(1..=max).contains(&value) {
        return Err(Error::Config(format!(
            "{} must be between 1 and {}, got {}",
            name, max, value
        )));
    }
    Ok(value)
}

/// Thresholds for the anomaly checks
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionConfig {
    /// Days of same-category history behind the unusual-amount z-score
    pub unusual_lookback_days: i64,
    /// Minimum same-category samples before a z-score is trusted
    pub unusual_min_samples: usize,
    /// |z| above this is an anomaly
    pub unusual_z_threshold: f64,
    /// Days before the month start averaged into the spike baseline
    pub spike_lookback_days: i64,
    /// Percent increase over the baseline that counts as a spike
    pub spike_threshold_percent: f64,

    // Behavioural patterns
    pub pattern_lookback_days: i64,
    pub pattern_min_samples: usize,
    /// Amounts strictly below this count as small
    pub small_amount: f64,
    pub small_transaction_ratio: f64,
    pub late_night_ratio: f64,
    pub weekend_ratio: f64,

    /// Trailing window searched for duplicates
    pub duplicate_window_hours: i64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            unusual_lookback_days: 90,
            unusual_min_samples: 5,
            unusual_z_threshold: 2.0,
            spike_lookback_days: 90,
            spike_threshold_percent: 20.0, // 20% over the 3-month average
            pattern_lookback_days: 30,
            pattern_min_samples: 10,
            small_amount: 100.0,
            small_transaction_ratio: 0.7, // more than 70% small
            late_night_ratio: 0.3,        // more than 30% between 22:00 and 05:59
            weekend_ratio: 0.6,           // more than 60% on Sat/Sun
            duplicate_window_hours: 24,
        }
    }
}

/// Parameters for the forecasting reports
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    pub smoothing_alpha: f64,
    /// Per-month uplift cycle used by the moving-average projection
    pub seasonal_step: f64,
    pub lookback_days: i64,
    /// Expense records required before a forecast is attempted
    pub min_samples: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: 0.3,
            seasonal_step: 0.05,
            lookback_days: 180,
            min_samples: 20,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub detection: DetectionConfig,
    pub forecast: ForecastConfig,
}

impl Config {
    /// Load from `path`, the data-dir override, or the embedded default
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = read_layered(path, "fincoach.toml", DEFAULT_CONFIG)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

        let mut config = Config::default();

        if let Some(d) = raw.detection {
            let c = &mut config.detection;
            if let Some(v) = d.unusual_lookback_days {
                c.unusual_lookback_days = window("unusual_lookback_days", v, MAX_LOOKBACK_DAYS)?;
            }
            if let Some(v) = d.unusual_min_samples {
                c.unusual_min_samples = v;
            }
            if let Some(v) = d.unusual_z_threshold {
                c.unusual_z_threshold = v;
            }
            if let Some(v) = d.spike_lookback_days {
                c.spike_lookback_days = window("spike_lookback_days", v, MAX_LOOKBACK_DAYS)?;
            }
            if let Some(v) = d.spike_threshold_percent {
                c.spike_threshold_percent = v;
            }
            if let Some(v) = d.pattern_lookback_days {
                c.pattern_lookback_days = window("pattern_lookback_days", v, MAX_LOOKBACK_DAYS)?;
            }
            if let Some(v) = d.pattern_min_samples {
                c.pattern_min_samples = v;
            }
            if let Some(v) = d.small_amount {
                c.small_amount = v;
            }
            if let Some(v) = d.small_transaction_ratio {
                c.small_transaction_ratio = v;
            }
            if let Some(v) = d.late_night_ratio {
                c.late_night_ratio = v;
            }
            if let Some(v) = d.weekend_ratio {
                c.weekend_ratio = v;
            }
            if let Some(v) = d.duplicate_window_hours {
                c.duplicate_window_hours = window("duplicate_window_hours", v, MAX_WINDOW_HOURS)?;
            }
        }

        if let Some(f) = raw.forecast {
            let c = &mut config.forecast;
            if let Some(v) = f.smoothing_alpha {
                if !(0.0..=1.0).contains(&v) {
                    return Err(Error::Config(format!(
                        "smoothing_alpha must be between 0 and 1, got {}",
                        v
                    )));
                }
                c.smoothing_alpha = v;
            }
            if let Some(v) = f.seasonal_step {
                c.seasonal_step = v;
            }
            if let Some(v) = f.lookback_days {
                c.lookback_days = window("lookback_days", v, MAX_LOOKBACK_DAYS)?;
            }
            if let Some(v) = f.min_samples {
                c.min_samples = v;
            }
        }

        Ok(config)
    }
}

/// Override path for a config file in the user data dir
pub fn default_config_path(file_name: &str) -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("fincoach").join("config").join(file_name))
}

/// Read an explicit path if given, else the data-dir override, else `embedded`.
///
/// An explicit path that does not exist is an error; a missing data-dir
/// override silently falls back.
pub(crate) fn read_layered(path: Option<&Path>, file_name: &str, embedded: &str) -> Result<String> {
    if let Some(path) = path {
        debug!(path = %path.display(), "Loading explicit config");
        return fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        });
    }

    if let Some(default_path) = default_config_path(file_name) {
        if default_path.exists() {
            debug!(path = %default_path.display(), "Loading config override");
            return fs::read_to_string(&default_path)
                .map_err(|e| Error::Config(format!("Failed to read config: {}", e)));
        }
    }

    Ok(embedded.to_string())
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    detection: Option<RawDetection>,
    forecast: Option<RawForecast>,
}

#[derive(Debug, Deserialize)]
struct RawDetection {
    unusual_lookback_days: Option<i64>,
    unusual_min_samples: Option<usize>,
    unusual_z_threshold: Option<f64>,
    spike_lookback_days: Option<i64>,
    spike_threshold_percent: Option<f64>,
    pattern_lookback_days: Option<i64>,
    pattern_min_samples: Option<usize>,
    small_amount: Option<f64>,
    small_transaction_ratio: Option<f64>,
    late_night_ratio: Option<f64>,
    weekend_ratio: Option<f64>,
    duplicate_window_hours: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    smoothing_alpha: Option<f64>,
    seasonal_step: Option<f64>,
    lookback_days: Option<i64>,
    min_samples: Option<usize>,
}
