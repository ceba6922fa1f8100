// =============================================================================
// Yahoo Finance Chart Source
// =============================================================================
//
// Pulls daily bars from the public v8 chart endpoint.  The endpoint returns
// parallel arrays keyed by timestamp, with nulls wherever the exchange had a
// halt or the feed dropped a field; rows missing any OHLC value are skipped,
// a missing volume is kept as `None`.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::data::{HistoryRequest, HistorySource};
use crate::market_data::{Bar, PriceHistory};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

// The endpoint rejects the default reqwest UA.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub struct YahooSource {
    base_url: String,
    client: Client,
}

impl YahooSource {
    /// Source pointed at the public endpoint, unless `GREENLINE_BASE_URL`
    /// redirects it (useful against a local fixture server).
    pub fn new() -> Self {
        let base_url = std::env::var("GREENLINE_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build reqwest client");
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    fn chart_url(&self, ticker: &str, request: &HistoryRequest) -> String {
        let base = format!("{}/v8/finance/chart/{}", self.base_url, ticker);
        match request.start {
            Some(start) => {
                let end = request.end.unwrap_or_else(Utc::now);
                format!(
                    "{base}?period1={}&period2={}&interval={}",
                    start.timestamp(),
                    end.timestamp(),
                    request.interval
                )
            }
            None => format!(
                "{base}?range={}&interval={}",
                request.period, request.interval
            ),
        }
    }
}

impl Default for YahooSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistorySource for YahooSource {
    #[instrument(skip(self, request), name = "yahoo::fetch_history")]
    async fn fetch_history(&self, ticker: &str, request: &HistoryRequest) -> Result<PriceHistory> {
        let url = self.chart_url(ticker, request);
        debug!(url = %url, "requesting chart data");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("chart request for {ticker} failed"))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read chart response for {ticker}"))?;
        if !status.is_success() {
            bail!("chart request for {ticker} returned {status}: {body}");
        }

        parse_chart(ticker, &body)
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<QuoteBlock>,
    adjclose: Option<Vec<AdjCloseBlock>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteBlock {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseBlock {
    adjclose: Vec<Option<f64>>,
}

fn value_at(series: &[Option<f64>], index: usize) -> Option<f64> {
    series
        .get(index)
        .copied()
        .flatten()
        .filter(|v| v.is_finite())
}

/// Decode one chart response body into a `PriceHistory`.
fn parse_chart(ticker: &str, body: &str) -> Result<PriceHistory> {
    let response: ChartResponse = serde_json::from_str(body)
        .with_context(|| format!("failed to decode chart response for {ticker}"))?;

    if let Some(error) = response.chart.error {
        bail!(
            "chart API error for {ticker}: {} ({})",
            error.description,
            error.code
        );
    }
    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .with_context(|| format!("chart response for {ticker} contains no result"))?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .unwrap_or_default();
    let adjclose = result
        .indicators
        .adjclose
        .and_then(|blocks| blocks.into_iter().next());

    let mut bars = Vec::with_capacity(timestamps.len());
    let mut skipped = 0usize;
    for (i, &ts) in timestamps.iter().enumerate() {
        let row = (
            DateTime::<Utc>::from_timestamp(ts, 0),
            value_at(&quote.open, i),
            value_at(&quote.high, i),
            value_at(&quote.low, i),
            value_at(&quote.close, i),
        );
        let (Some(timestamp), Some(open), Some(high), Some(low), Some(close)) = row else {
            skipped += 1;
            continue;
        };

        let adj_close = adjclose
            .as_ref()
            .and_then(|block| value_at(&block.adjclose, i))
            .unwrap_or(close);

        bars.push(Bar {
            timestamp,
            open,
            high,
            low,
            close,
            adj_close,
            volume: value_at(&quote.volume, i),
        });
    }

    if skipped > 0 {
        warn!(ticker = %ticker, skipped, "dropped rows with missing quote data");
    }
    if bars.is_empty() {
        bail!("chart response for {ticker} contains no usable bars");
    }
    PriceHistory::new(bars)
}
