// =============================================================================
// Red White Blue Ribbon Detector
// =============================================================================
//
// Trend alignment over two EMA banks: six fast spans and six slow spans.
// The ribbon is "stacked" when every fast EMA sits above every slow EMA and
// the last close leads the whole ribbon.  The spread (mean fast minus mean
// slow) gives a signed measure of how far apart the banks are.

use serde::Serialize;

use crate::indicators::ma::ema;
use crate::indicators::{ensure_min_observations, IndicatorError};
use crate::market_data::PriceHistory;

pub const SHORT_SPANS: [usize; 6] = [3, 5, 8, 10, 12, 15];
pub const LONG_SPANS: [usize; 6] = [30, 35, 40, 45, 50, 60];

/// Longest span plus a few observations of headroom for the smoothing to
/// settle.
pub const MIN_OBSERVATIONS: usize = LONG_SPANS[5] + 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RibbonOutcome {
    pub stacked: bool,
    /// Mean of the fast bank minus mean of the slow bank.
    pub ribbon_spread: f64,
}

// Input is non-empty and spans are non-zero, so the smoothed series is too.
fn latest_ema(values: &[f64], span: usize) -> f64 {
    let smoothed = ema(values, span);
    smoothed[smoothed.len() - 1]
}

pub fn detect_rwb_ribbon(history: &PriceHistory) -> Result<RibbonOutcome, IndicatorError> {
    let closes = history.closes();
    let values = closes.values();
    ensure_min_observations("rwb ribbon", MIN_OBSERVATIONS, values.len())?;

    let fast: Vec<f64> = SHORT_SPANS.iter().map(|&s| latest_ema(values, s)).collect();
    let slow: Vec<f64> = LONG_SPANS.iter().map(|&s| latest_ema(values, s)).collect();

    let fast_min = fast.iter().copied().fold(f64::INFINITY, f64::min);
    let fast_max = fast.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let slow_max = slow.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let last_close = values[values.len() - 1];
    let stacked = fast_min > slow_max && last_close > fast_max;

    let fast_mean = fast.iter().sum::<f64>() / fast.len() as f64;
    let slow_mean = slow.iter().sum::<f64>() / slow.len() as f64;

    Ok(RibbonOutcome {
        stacked,
        ribbon_spread: fast_mean - slow_mean,
    })
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::testing::weekday_history;
    use chrono::NaiveDate;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn steady_uptrend_stacks_the_ribbon() {
        let closes: Vec<f64> = (1..=120).map(|i| i as f64).collect();
        let history = weekday_history(start(), &closes);

        let outcome = detect_rwb_ribbon(&history).unwrap();
        assert!(outcome.stacked);
        assert!(outcome.ribbon_spread > 0.0);
    }

    #[test]
    fn steady_downtrend_inverts_the_ribbon() {
        let closes: Vec<f64> = (1..=120).rev().map(|i| i as f64).collect();
        let history = weekday_history(start(), &closes);

        let outcome = detect_rwb_ribbon(&history).unwrap();
        assert!(!outcome.stacked);
        assert!(outcome.ribbon_spread < 0.0);
    }

    #[test]
    fn flat_series_is_not_stacked() {
        // Every EMA equals the price, and the ordering checks are strict.
        let history = weekday_history(start(), &[50.0; 100]);

        let outcome = detect_rwb_ribbon(&history).unwrap();
        assert!(!outcome.stacked);
        assert_eq!(outcome.ribbon_spread, 0.0);
    }

    #[test]
    fn one_observation_short_is_an_error() {
        let closes: Vec<f64> = (1..=64).map(|i| i as f64).collect();
        let history = weekday_history(start(), &closes);

        let err = detect_rwb_ribbon(&history).unwrap_err();
        assert_eq!(
            err,
            IndicatorError::InsufficientData {
                indicator: "rwb ribbon",
                required: 65,
                actual: 64,
            }
        );
    }
}
