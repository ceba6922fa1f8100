// =============================================================================
// Price History — daily OHLCV bars for one security
// =============================================================================
//
// The container every detector reads from. Construction sorts out-of-order
// input and rejects an empty series, so downstream code can rely on a
// non-empty, chronologically ordered history.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::market_data::TimeSeries;

/// A single daily OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Close adjusted for splits and dividends, when the source provides one.
    pub adj_close: f64,
    /// Traded volume; `None` when the source omitted the observation.
    pub volume: Option<f64>,
}

/// Ordered price history for one security, oldest bar first.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceHistory {
    bars: Vec<Bar>,
}

impl PriceHistory {
    /// Build a history from raw bars. Bars are sorted by timestamp when the
    /// input arrives out of order; an empty input is rejected.
    pub fn new(mut bars: Vec<Bar>) -> Result<Self> {
        if bars.is_empty() {
            bail!("price history requires at least one bar");
        }
        if !bars.windows(2).all(|w| w[0].timestamp <= w[1].timestamp) {
            bars.sort_by_key(|b| b.timestamp);
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Timestamp of the most recent bar. The constructor guarantees at least
    /// one bar, so this never fails.
    pub fn as_of(&self) -> DateTime<Utc> {
        self.bars[self.bars.len() - 1].timestamp
    }

    /// Close of the most recent bar.
    pub fn last_close(&self) -> f64 {
        self.bars[self.bars.len() - 1].close
    }

    /// Close prices as a timestamped series.
    pub fn closes(&self) -> TimeSeries {
        self.bars
            .iter()
            .map(|b| (b.timestamp, b.close))
            .collect()
    }

    /// Volume observations with missing or non-finite entries dropped.
    pub fn volumes(&self) -> TimeSeries {
        self.bars
            .iter()
            .filter_map(|b| {
                b.volume
                    .filter(|v| v.is_finite())
                    .map(|v| (b.timestamp, v))
            })
            .collect()
    }
}
