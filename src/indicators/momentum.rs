// =============================================================================
// Momentum Detector — MACD crossover plus trend slope
// =============================================================================
//
// Classic 12/26/9 MACD evaluated on either daily closes or weekly resampled
// closes, cross-checked against the slope of a 10-period SMA.  Bullish means
// the MACD line is above its signal line AND the trend slope is positive.
// Weekly mode resamples FIRST, so the length requirement applies to weekly
// observations.

use serde::Serialize;

use crate::indicators::ma::{ema, sma};
use crate::indicators::{ensure_min_observations, IndicatorError};
use crate::market_data::PriceHistory;
use crate::types::Timeframe;

pub const FAST_SPAN: usize = 12;
pub const SLOW_SPAN: usize = 26;
pub const SIGNAL_SPAN: usize = 9;
pub const TREND_WINDOW: usize = 10;
pub const MIN_OBSERVATIONS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MomentumOutcome {
    pub timeframe: Timeframe,
    pub bullish: bool,
    pub macd: f64,
    pub signal: f64,
    pub slope_positive: bool,
}

pub fn detect_momentum(
    history: &PriceHistory,
    timeframe: Timeframe,
) -> Result<MomentumOutcome, IndicatorError> {
    let (closes, indicator) = match timeframe {
        Timeframe::Daily => (history.closes(), "momentum (daily)"),
        Timeframe::Weekly => (history.closes().resample_weekly(), "momentum (weekly)"),
    };
    ensure_min_observations(indicator, MIN_OBSERVATIONS, closes.len())?;
    let values = closes.values();

    // --- Step 1: MACD line and its signal ---
    let fast = ema(values, FAST_SPAN);
    let slow = ema(values, SLOW_SPAN);
    let macd_line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal_line = ema(&macd_line, SIGNAL_SPAN);

    let macd = macd_line[macd_line.len() - 1];
    let signal = signal_line[signal_line.len() - 1];

    // --- Step 2: slope of the 10-period trend line ---
    let trend = sma(values, TREND_WINDOW);
    let slope = trend[trend.len() - 1] - trend[trend.len() - 3];
    let slope_positive = slope > 0.0;

    Ok(MomentumOutcome {
        timeframe,
        bullish: macd > signal && slope_positive,
        macd,
        signal,
        slope_positive,
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

    fn ascending(n: usize) -> Vec<f64> {
        (1..=n).map(|i| i as f64).collect()
    }

    #[test]
    fn daily_uptrend_is_bullish() {
        let history = weekday_history(start(), &ascending(120));

        let outcome = detect_momentum(&history, Timeframe::Daily).unwrap();
        assert!(outcome.bullish);
        assert!(outcome.macd > outcome.signal);
        assert!(outcome.slope_positive);
    }

    #[test]
    fn daily_downtrend_is_not_bullish() {
        let closes: Vec<f64> = (1..=120).rev().map(|i| i as f64).collect();
        let history = weekday_history(start(), &closes);

        let outcome = detect_momentum(&history, Timeframe::Daily).unwrap();
        assert!(!outcome.bullish);
        assert!(outcome.macd < outcome.signal);
        assert!(!outcome.slope_positive);
    }

    #[test]
    fn daily_length_guard() {
        let history = weekday_history(start(), &ascending(30));
        let err = detect_momentum(&history, Timeframe::Daily).unwrap_err();
        assert_eq!(
            err,
            IndicatorError::InsufficientData {
                indicator: "momentum (daily)",
                required: 50,
                actual: 30,
            }
        );
    }

    #[test]
    fn weekly_length_guard_counts_weeks_not_days() {
        // 120 weekdays collapse into 24 weekly observations.
        let history = weekday_history(start(), &ascending(120));
        let err = detect_momentum(&history, Timeframe::Weekly).unwrap_err();
        assert_eq!(
            err,
            IndicatorError::InsufficientData {
                indicator: "momentum (weekly)",
                required: 50,
                actual: 24,
            }
        );
    }

    #[test]
    fn weekly_uptrend_is_bullish() {
        let history = weekday_history(start(), &ascending(300));

        let outcome = detect_momentum(&history, Timeframe::Weekly).unwrap();
        assert_eq!(outcome.timeframe, Timeframe::Weekly);
        assert!(outcome.bullish);
    }
}
