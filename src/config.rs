// =============================================================================
// Screener Configuration
// =============================================================================
//
// Every detector parameter in one serde-friendly struct.  Each field has a
// default mirroring the detector constants, so a partial (or absent) config
// file always yields a complete parameter set.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

fn default_min_base_months() -> usize {
    crate::indicators::green_line::DEFAULT_MIN_BASE_MONTHS
}

fn default_lookback_days() -> usize {
    crate::indicators::darvas::DEFAULT_LOOKBACK_DAYS
}

fn default_max_volatility() -> f64 {
    crate::indicators::darvas::DEFAULT_MAX_VOLATILITY
}

fn default_breakout_buffer() -> f64 {
    crate::indicators::darvas::DEFAULT_BREAKOUT_BUFFER
}

fn default_volume_window() -> usize {
    crate::signals::checklist::DEFAULT_VOLUME_WINDOW
}

fn default_breakout_volume_multiple() -> f64 {
    crate::signals::checklist::DEFAULT_VOLUME_MULTIPLE
}

fn default_period() -> String {
    "2y".to_string()
}

fn default_interval() -> String {
    "1d".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenerConfig {
    /// Minimum whole months of basing below the prior high (green line).
    #[serde(default = "default_min_base_months")]
    pub min_base_months: usize,

    /// Trailing window for the Darvas box, in daily bars.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: usize,

    /// Maximum box height relative to the box floor.
    #[serde(default = "default_max_volatility")]
    pub max_volatility: f64,

    /// Margin above the box ceiling a close must clear.
    #[serde(default = "default_breakout_buffer")]
    pub breakout_buffer: f64,

    /// Trailing window for the checklist's average volume, in bars.
    #[serde(default = "default_volume_window")]
    pub volume_window: usize,

    /// Last-volume-to-average ratio the checklist requires.
    #[serde(default = "default_breakout_volume_multiple")]
    pub breakout_volume_multiple: f64,

    /// Relative fetch range sent upstream (e.g. "2y", "6mo").
    #[serde(default = "default_period")]
    pub period: String,

    /// Bar interval sent upstream (e.g. "1d").
    #[serde(default = "default_interval")]
    pub interval: String,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            min_base_months: default_min_base_months(),
            lookback_days: default_lookback_days(),
            max_volatility: default_max_volatility(),
            breakout_buffer: default_breakout_buffer(),
            volume_window: default_volume_window(),
            breakout_volume_multiple: default_breakout_volume_multiple(),
            period: default_period(),
            interval: default_interval(),
        }
    }
}

impl ScreenerConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read screener config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse screener config from {}", path.display()))?;

        info!(
            path = %path.display(),
            period = %config.period,
            lookback_days = config.lookback_days,
            "screener config loaded"
        );

        Ok(config)
    }
}
