// =============================================================================
// Breakout Checklist
// =============================================================================
//
// The composite gate a candidate must clear before it is worth a closer
// look: green-line breakout, stacked ribbon, bullish momentum on BOTH
// timeframes, and a volume surge on the latest bar.  Detector outcomes the
// caller has already computed are reused verbatim; anything missing is
// computed here with default parameters.

use serde::Serialize;

use crate::indicators::green_line::DEFAULT_MIN_BASE_MONTHS;
use crate::indicators::{
    detect_green_line, detect_momentum, detect_rwb_ribbon, GreenLineOutcome, IndicatorError,
    MomentumOutcome, RibbonOutcome,
};
use crate::market_data::PriceHistory;
use crate::types::Timeframe;

pub const DEFAULT_VOLUME_WINDOW: usize = 50;
pub const DEFAULT_VOLUME_MULTIPLE: f64 = 1.5;

/// Detector outcomes already computed by the caller, so the checklist does
/// not evaluate the same setups twice.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedOutcomes {
    pub green_line: Option<GreenLineOutcome>,
    pub ribbon: Option<RibbonOutcome>,
    pub momentum_daily: Option<MomentumOutcome>,
    pub momentum_weekly: Option<MomentumOutcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistOutcome {
    pub qualifies: bool,
    pub green_line: bool,
    pub ribbon: bool,
    pub momentum_daily: bool,
    pub momentum_weekly: bool,
    pub last_volume: Option<f64>,
    /// Mean volume over the trailing window, final bar included.
    pub average_volume: Option<f64>,
    pub volume_ratio: Option<f64>,
    pub volume_multiple: f64,
    pub volume_ok: bool,
}

/// Last volume, trailing average, and their ratio.  The ratio is absent when
/// there is no meaningful average to compare against.
fn volume_stats(values: &[f64], window: usize) -> (Option<f64>, Option<f64>, Option<f64>) {
    if values.len() < window {
        return (values.last().copied(), None, None);
    }

    let tail = &values[values.len() - window..];
    let last = tail[tail.len() - 1];
    let average = tail.iter().sum::<f64>() / window as f64;

    let ratio = if average > 0.0 {
        Some(last / average)
    } else if last > 0.0 {
        Some(f64::INFINITY)
    } else {
        None
    };
    (Some(last), Some(average), ratio)
}

pub fn evaluate_checklist(
    history: &PriceHistory,
    volume_window: usize,
    volume_multiple: f64,
    precomputed: PrecomputedOutcomes,
) -> Result<ChecklistOutcome, IndicatorError> {
    if volume_window == 0 {
        return Err(IndicatorError::InvalidParameter {
            name: "volume_window",
            reason: "must be positive".into(),
        });
    }

    // ── 1. Price setups, reusing whatever the caller already evaluated ──
    let green_line = match precomputed.green_line {
        Some(outcome) => outcome.breakout,
        None => detect_green_line(history, DEFAULT_MIN_BASE_MONTHS)?.breakout,
    };
    let ribbon = match precomputed.ribbon {
        Some(outcome) => outcome.stacked,
        None => detect_rwb_ribbon(history)?.stacked,
    };
    let momentum_daily = match precomputed.momentum_daily {
        Some(outcome) => outcome.bullish,
        None => detect_momentum(history, Timeframe::Daily)?.bullish,
    };
    let momentum_weekly = match precomputed.momentum_weekly {
        Some(outcome) => outcome.bullish,
        None => detect_momentum(history, Timeframe::Weekly)?.bullish,
    };

    // ── 2. Volume surge on the latest bar ──
    let volumes = history.volumes();
    let (last_volume, average_volume, volume_ratio) =
        volume_stats(volumes.values(), volume_window);
    let volume_ok = matches!(volume_ratio, Some(ratio) if ratio >= volume_multiple);

    // ── 3. Verdict ──
    let qualifies = green_line && ribbon && momentum_daily && momentum_weekly && volume_ok;

    Ok(ChecklistOutcome {
        qualifies,
        green_line,
        ribbon,
        momentum_daily,
        momentum_weekly,
        last_volume,
        average_volume,
        volume_ratio,
        volume_multiple,
        volume_ok,
    })
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::Bar;
    use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

    /// Two years of weekday bars in three phases: a six-month ramp up to a
    /// 49.2 high (June 2022 monthly close), seventeen flat months at 40, and
    /// a December 2023 thrust from 41 to 61.  Every volume is 1000 except
    /// the final bar, so the volume verdict is controlled by `final_volume`.
    fn staged_history(final_volume: f64) -> PriceHistory {
        let ramp_end = NaiveDate::from_ymd_opt(2022, 7, 1).unwrap();
        let base_end = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2023, 12, 30).unwrap();

        let mut bars = Vec::new();
        let mut day = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        let mut ramp = 0u32;
        let mut thrust = 0u32;
        while day < end {
            if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
                let close = if day < ramp_end {
                    let c = 30.0 + 0.15 * ramp as f64;
                    ramp += 1;
                    c
                } else if day < base_end {
                    40.0
                } else {
                    thrust += 1;
                    40.0 + thrust as f64
                };
                bars.push(Bar {
                    timestamp: day.and_time(NaiveTime::MIN).and_utc(),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    adj_close: close,
                    volume: Some(1000.0),
                });
            }
            day = day.succ_opt().unwrap();
        }
        bars.last_mut().unwrap().volume = Some(final_volume);
        PriceHistory::new(bars).unwrap()
    }

    #[test]
    fn surging_volume_completes_the_checklist() {
        let history = staged_history(2000.0);

        let outcome =
            evaluate_checklist(&history, 50, 1.5, PrecomputedOutcomes::default()).unwrap();
        assert!(outcome.green_line);
        assert!(outcome.ribbon);
        assert!(outcome.momentum_daily);
        assert!(outcome.momentum_weekly);
        assert!(outcome.volume_ok);
        assert!(outcome.qualifies);

        // avg = (49 * 1000 + 2000) / 50 = 1020
        let ratio = outcome.volume_ratio.unwrap();
        assert!((ratio - 2000.0 / 1020.0).abs() < 1e-9);
    }

    #[test]
    fn quiet_volume_blocks_an_otherwise_perfect_setup() {
        let history = staged_history(1200.0);

        let outcome =
            evaluate_checklist(&history, 50, 1.5, PrecomputedOutcomes::default()).unwrap();
        assert!(outcome.green_line);
        assert!(outcome.ribbon);
        assert!(outcome.momentum_daily);
        assert!(outcome.momentum_weekly);
        assert!(!outcome.volume_ok);
        assert!(!outcome.qualifies);

        let ratio = outcome.volume_ratio.unwrap();
        assert!((ratio - 1200.0 / 1004.0).abs() < 1e-9);
    }

    #[test]
    fn precomputed_outcomes_are_trusted_verbatim() {
        let history = staged_history(2000.0);
        let stale = PrecomputedOutcomes {
            green_line: Some(crate::indicators::GreenLineOutcome {
                breakout: false,
                prior_high: Some(100.0),
                last_close: 61.0,
                months_since_prior_high: Some(2.0),
                base_months: 1,
            }),
            ..PrecomputedOutcomes::default()
        };

        let outcome = evaluate_checklist(&history, 50, 1.5, stale).unwrap();
        assert!(!outcome.green_line);
        assert!(!outcome.qualifies);
    }

    #[test]
    fn missing_volumes_fail_the_volume_check_only() {
        let mut history = staged_history(2000.0);
        let bars: Vec<Bar> = history
            .bars()
            .iter()
            .map(|b| Bar {
                volume: None,
                ..b.clone()
            })
            .collect();
        history = PriceHistory::new(bars).unwrap();

        let outcome =
            evaluate_checklist(&history, 50, 1.5, PrecomputedOutcomes::default()).unwrap();
        assert!(outcome.green_line);
        assert_eq!(outcome.last_volume, None);
        assert_eq!(outcome.average_volume, None);
        assert_eq!(outcome.volume_ratio, None);
        assert!(!outcome.volume_ok);
        assert!(!outcome.qualifies);
    }

    #[test]
    fn short_volume_tail_has_no_average() {
        let history = staged_history(2000.0);
        let bars: Vec<Bar> = history
            .bars()
            .iter()
            .enumerate()
            .map(|(i, b)| Bar {
                volume: if i + 30 >= history.len() {
                    b.volume
                } else {
                    None
                },
                ..b.clone()
            })
            .collect();
        let history = PriceHistory::new(bars).unwrap();

        let outcome =
            evaluate_checklist(&history, 50, 1.5, PrecomputedOutcomes::default()).unwrap();
        assert_eq!(outcome.last_volume, Some(2000.0));
        assert_eq!(outcome.average_volume, None);
        assert_eq!(outcome.volume_ratio, None);
        assert!(!outcome.volume_ok);
    }

    #[test]
    fn zero_window_is_rejected() {
        let history = staged_history(2000.0);
        let err =
            evaluate_checklist(&history, 0, 1.5, PrecomputedOutcomes::default()).unwrap_err();
        assert!(matches!(err, IndicatorError::InvalidParameter { name, .. } if name == "volume_window"));
    }

    // ---- volume_stats ----------------------------------------------------

    #[test]
    fn zero_average_with_positive_last_is_infinite() {
        let (last, average, ratio) = volume_stats(&[-500.0, 500.0], 2);
        assert_eq!(last, Some(500.0));
        assert_eq!(average, Some(0.0));
        assert_eq!(ratio, Some(f64::INFINITY));
    }

    #[test]
    fn zero_average_with_zero_last_has_no_ratio() {
        let (_, _, ratio) = volume_stats(&[0.0, 0.0], 2);
        assert_eq!(ratio, None);
    }
}
