// =============================================================================
// Screening Pipeline
// =============================================================================
//
// Runs every detector against one price history and flattens the outcomes
// into report rows.  Row order is fixed:
//
//   1. Green Line Breakout
//   2. Darvas Box Breakout
//   3. RWB Ribbon
//   4. Momentum Daily
//   5. Momentum Weekly
//   6. Breakout Checklist  (reuses the outcomes computed above)

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::ScreenerConfig;
use crate::data::{HistoryRequest, HistorySource};
use crate::indicators::{
    detect_darvas_box, detect_green_line, detect_momentum, detect_rwb_ribbon, IndicatorError,
    MomentumOutcome,
};
use crate::market_data::PriceHistory;
use crate::signals::{evaluate_checklist, PrecomputedOutcomes};
use crate::types::{Details, IndicatorReport, ScreeningReport, Timeframe};

fn momentum_row(name: &'static str, outcome: &MomentumOutcome) -> IndicatorReport {
    let mut details = Details::new();
    details.push_number("macd", outcome.macd);
    details.push_number("signal", outcome.signal);
    details.push_flag("slope_positive", outcome.slope_positive);
    IndicatorReport::new(name, outcome.bullish, details)
}

/// Evaluate every indicator on `history` and return the report rows.
pub fn evaluate_indicators(
    history: &PriceHistory,
    config: &ScreenerConfig,
) -> Result<Vec<IndicatorReport>, IndicatorError> {
    // ── 1. Individual detectors ──
    let green_line = detect_green_line(history, config.min_base_months)?;
    let darvas = detect_darvas_box(
        history,
        config.lookback_days,
        config.max_volatility,
        config.breakout_buffer,
    )?;
    let ribbon = detect_rwb_ribbon(history)?;
    let momentum_daily = detect_momentum(history, Timeframe::Daily)?;
    let momentum_weekly = detect_momentum(history, Timeframe::Weekly)?;

    // ── 2. Composite checklist, reusing the outcomes above ──
    let checklist = evaluate_checklist(
        history,
        config.volume_window,
        config.breakout_volume_multiple,
        PrecomputedOutcomes {
            green_line: Some(green_line.clone()),
            ribbon: Some(ribbon.clone()),
            momentum_daily: Some(momentum_daily.clone()),
            momentum_weekly: Some(momentum_weekly.clone()),
        },
    )?;

    // ── 3. Flatten into report rows ──
    let mut rows = Vec::with_capacity(6);

    let mut details = Details::new();
    details.push_optional("prior_high", green_line.prior_high);
    details.push_number("last_close", green_line.last_close);
    details.push_optional("months_since_prior_high", green_line.months_since_prior_high);
    details.push_count("base_months", green_line.base_months);
    rows.push(IndicatorReport::new(
        "Green Line Breakout",
        green_line.breakout,
        details,
    ));

    let mut details = Details::new();
    details.push_number("box_high", darvas.box_high);
    details.push_number("box_low", darvas.box_low);
    details.push_number("breakout_margin", darvas.breakout_margin);
    rows.push(IndicatorReport::new(
        "Darvas Box Breakout",
        darvas.breakout,
        details,
    ));

    let mut details = Details::new();
    details.push_number("ribbon_spread", ribbon.ribbon_spread);
    rows.push(IndicatorReport::new("RWB Ribbon", ribbon.stacked, details));

    rows.push(momentum_row("Momentum Daily", &momentum_daily));
    rows.push(momentum_row("Momentum Weekly", &momentum_weekly));

    let mut details = Details::new();
    details.push_flag("green_line", checklist.green_line);
    details.push_flag("ribbon", checklist.ribbon);
    details.push_flag("momentum_daily", checklist.momentum_daily);
    details.push_flag("momentum_weekly", checklist.momentum_weekly);
    details.push_optional("last_volume", checklist.last_volume);
    details.push_optional("average_volume", checklist.average_volume);
    details.push_optional("volume_ratio", checklist.volume_ratio);
    details.push_number("volume_multiple", checklist.volume_multiple);
    details.push_flag("volume_ok", checklist.volume_ok);
    rows.push(IndicatorReport::new(
        "Breakout Checklist",
        checklist.qualifies,
        details,
    ));

    Ok(rows)
}

/// Ties a history source and a parameter set together, producing one
/// `ScreeningReport` per ticker.
pub struct Screener<S> {
    source: S,
    config: ScreenerConfig,
}

impl<S: HistorySource> Screener<S> {
    pub fn new(source: S, config: ScreenerConfig) -> Self {
        Self { source, config }
    }

    pub async fn screen(&self, ticker: &str, request: &HistoryRequest) -> Result<ScreeningReport> {
        let history = self
            .source
            .fetch_history(ticker, request)
            .await
            .with_context(|| format!("failed to fetch price history for {ticker}"))?;
        debug!(ticker = %ticker, bars = history.len(), "price history loaded");

        let indicators = evaluate_indicators(&history, &self.config)
            .with_context(|| format!("failed to evaluate indicators for {ticker}"))?;

        let passed = indicators.iter().filter(|r| r.passed).count();
        info!(
            ticker = %ticker,
            passed,
            total = indicators.len(),
            "screening complete"
        );

        Ok(ScreeningReport {
            ticker: ticker.to_string(),
            as_of: history.as_of(),
            indicators,
        })
    }
}
