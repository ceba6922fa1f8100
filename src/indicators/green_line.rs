// =============================================================================
// Green Line Breakout Detector
// =============================================================================
//
// Works on MONTHLY closes.  The "green line" is the highest monthly close
// seen before the current month; a breakout requires the stock to have based
// below that line for a minimum number of whole months and then to close
// above it.  When the all-time-high month repeats, the LATEST occurrence is
// taken as the line, so the base is counted from the most recent visit to
// the high.

use serde::Serialize;

use crate::indicators::{ensure_min_observations, IndicatorError};
use crate::market_data::{month_ordinal, PriceHistory};

/// Minimum number of whole months the price must spend below the prior high.
pub const DEFAULT_MIN_BASE_MONTHS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GreenLineOutcome {
    pub breakout: bool,
    /// Highest monthly close before the current month, when one exists.
    pub prior_high: Option<f64>,
    /// Close the verdict was taken against (latest weekly close).
    pub last_close: f64,
    pub months_since_prior_high: Option<f64>,
    /// Whole months strictly between the prior-high month and the current one.
    pub base_months: usize,
}

/// Evaluate the green-line setup on `history`.
///
/// # Arguments
/// * `history`         - daily bars, oldest first
/// * `min_base_months` - required base length in whole months
///
/// # Errors
/// `InsufficientData` when the history spans fewer than
/// `min_base_months + 2` calendar months.
pub fn detect_green_line(
    history: &PriceHistory,
    min_base_months: usize,
) -> Result<GreenLineOutcome, IndicatorError> {
    let monthly = history.closes().resample_monthly();
    ensure_min_observations("green line breakout", min_base_months + 2, monthly.len())?;

    let values = monthly.values();
    let last_idx = values.len() - 1;

    // --- Step 1: prior high over every month before the current one ---
    let prior = &values[..last_idx];
    if prior.is_empty() {
        return Ok(GreenLineOutcome {
            breakout: false,
            prior_high: None,
            last_close: values[last_idx],
            months_since_prior_high: None,
            base_months: 0,
        });
    }

    let mut high_idx = 0;
    for (i, &value) in prior.iter().enumerate() {
        // `>=` keeps the latest occurrence when the high repeats.
        if value >= prior[high_idx] {
            high_idx = i;
        }
    }
    let prior_high = prior[high_idx];

    // --- Step 2: base between the high month and the current month ---
    let base = &values[high_idx + 1..last_idx];
    let base_months = base.len();
    let base_below = base.iter().all(|&v| v < prior_high);

    // --- Step 3: confirm against the latest weekly close ---
    let last_close = history
        .closes()
        .resample_weekly()
        .last_value()
        .unwrap_or_else(|| history.last_close());

    let months_since = month_ordinal(monthly.stamps()[last_idx])
        - month_ordinal(monthly.stamps()[high_idx]);

    let breakout = last_close > prior_high && base_months >= min_base_months && base_below;

    Ok(GreenLineOutcome {
        breakout,
        prior_high: Some(prior_high),
        last_close,
        months_since_prior_high: Some(months_since as f64),
        base_months,
    })
}
