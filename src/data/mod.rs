// =============================================================================
// Data Sources Module
// =============================================================================
//
// Where price history comes from: the Yahoo Finance chart API over HTTP, or
// a local CSV export.  Everything downstream consumes the `HistorySource`
// trait, so the screener never knows which one it is talking to.

pub mod csv_file;
pub mod yahoo;

pub use csv_file::CsvSource;
pub use yahoo::YahooSource;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::market_data::PriceHistory;

/// Time range for a history fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRequest {
    /// Explicit range start; when set it takes precedence over `period`.
    pub start: Option<DateTime<Utc>>,
    /// Explicit range end; defaults to now when only `start` is given.
    pub end: Option<DateTime<Utc>>,
    /// Relative range understood by the upstream API (e.g. "2y", "6mo").
    pub period: String,
    /// Bar interval (e.g. "1d", "1wk").
    pub interval: String,
}

impl Default for HistoryRequest {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            period: "2y".to_string(),
            interval: "1d".to_string(),
        }
    }
}

#[async_trait]
pub trait HistorySource: Send + Sync {
    async fn fetch_history(&self, ticker: &str, request: &HistoryRequest) -> Result<PriceHistory>;
}
