// =============================================================================
// Darvas Box Breakout Detector
// =============================================================================
//
// A Darvas box is a tight trading range: over the trailing lookback window
// the closes stay within a band whose height, relative to the box floor, is
// at most `max_volatility`.  The box is drawn from every close EXCEPT the
// most recent one, which is the breakout candidate; it fires when that close
// clears the box ceiling by at least `breakout_buffer`.

use serde::Serialize;

use crate::indicators::{ensure_min_observations, IndicatorError};
use crate::market_data::PriceHistory;

pub const DEFAULT_LOOKBACK_DAYS: usize = 65;
pub const DEFAULT_MAX_VOLATILITY: f64 = 0.25;
pub const DEFAULT_BREAKOUT_BUFFER: f64 = 0.02;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DarvasOutcome {
    pub breakout: bool,
    pub box_high: f64,
    pub box_low: f64,
    /// Last close relative to the box ceiling (`last / high - 1`).
    pub breakout_margin: f64,
}

/// Evaluate the box setup over the trailing `lookback_days` closes.
///
/// # Errors
/// `InvalidParameter` when `lookback_days < 2` (the window must hold a box
/// plus the candidate close), `InsufficientData` when the history is shorter
/// than the window.
pub fn detect_darvas_box(
    history: &PriceHistory,
    lookback_days: usize,
    max_volatility: f64,
    breakout_buffer: f64,
) -> Result<DarvasOutcome, IndicatorError> {
    if lookback_days < 2 {
        return Err(IndicatorError::InvalidParameter {
            name: "lookback_days",
            reason: "must be at least 2".into(),
        });
    }

    let closes = history.closes();
    let values = closes.values();
    ensure_min_observations("darvas box", lookback_days, values.len())?;

    let window = &values[values.len() - lookback_days..];
    let last_close = window[window.len() - 1];
    let box_window = &window[..window.len() - 1];

    let mut box_high = f64::NEG_INFINITY;
    let mut box_low = f64::INFINITY;
    for &close in box_window {
        if close > box_high {
            box_high = close;
        }
        if close < box_low {
            box_low = close;
        }
    }

    let volatility = if box_low > 0.0 {
        (box_high - box_low) / box_low
    } else {
        f64::INFINITY
    };

    let breakout =
        volatility <= max_volatility && last_close >= box_high * (1.0 + breakout_buffer);

    Ok(DarvasOutcome {
        breakout,
        box_high,
        box_low,
        breakout_margin: last_close / box_high - 1.0,
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
    fn tight_box_with_clearing_close_fires() {
        let mut closes = vec![10.0; 60];
        closes.extend([10.1, 10.15, 10.2, 10.3, 10.5]);
        let history = weekday_history(start(), &closes);

        let outcome = detect_darvas_box(&history, 55, DEFAULT_MAX_VOLATILITY, 0.01).unwrap();
        assert!(outcome.breakout);
        assert_eq!(outcome.box_high, 10.3);
        assert_eq!(outcome.box_low, 10.0);
        assert!((outcome.breakout_margin - (10.5 / 10.3 - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn flat_series_sits_inside_its_box() {
        let history = weekday_history(start(), &[10.0; 80]);

        let outcome = detect_darvas_box(
            &history,
            DEFAULT_LOOKBACK_DAYS,
            DEFAULT_MAX_VOLATILITY,
            DEFAULT_BREAKOUT_BUFFER,
        )
        .unwrap();
        assert!(!outcome.breakout);
        assert_eq!(outcome.breakout_margin, 0.0);
    }

    #[test]
    fn wide_box_is_rejected_even_when_price_clears_it() {
        let mut closes = vec![10.0; 60];
        closes.extend([12.0, 12.2, 12.4, 12.8, 13.0]);
        let history = weekday_history(start(), &closes);

        let outcome = detect_darvas_box(&history, 55, DEFAULT_MAX_VOLATILITY, 0.01).unwrap();
        // (12.8 - 10.0) / 10.0 = 0.28 of range, above the 0.25 ceiling.
        assert!(!outcome.breakout);
        assert!(outcome.breakout_margin > 0.01);
    }

    #[test]
    fn short_history_is_an_error() {
        let history = weekday_history(start(), &[10.0; 50]);
        let err = detect_darvas_box(
            &history,
            DEFAULT_LOOKBACK_DAYS,
            DEFAULT_MAX_VOLATILITY,
            DEFAULT_BREAKOUT_BUFFER,
        )
        .unwrap_err();

        assert_eq!(
            err,
            IndicatorError::InsufficientData {
                indicator: "darvas box",
                required: 65,
                actual: 50,
            }
        );
    }

    #[test]
    fn lookback_below_two_is_rejected() {
        let history = weekday_history(start(), &[10.0; 10]);
        let err = detect_darvas_box(&history, 1, DEFAULT_MAX_VOLATILITY, DEFAULT_BREAKOUT_BUFFER)
            .unwrap_err();
        assert!(matches!(err, IndicatorError::InvalidParameter { name, .. } if name == "lookback_days"));
    }

    #[test]
    fn zero_floor_makes_the_box_unbounded() {
        let history = weekday_history(start(), &[0.0, 5.0, 5.0, 6.0]);

        let outcome = detect_darvas_box(&history, 4, DEFAULT_MAX_VOLATILITY, 0.01).unwrap();
        assert!(!outcome.breakout);
        assert_eq!(outcome.box_low, 0.0);
    }
}
