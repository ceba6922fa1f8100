// =============================================================================
// CSV File Source
// =============================================================================
//
// Reads a daily-bar export in the common broker layout (Date, Open, High,
// Low, Close, Adj Close, Volume).  Columns are located by header name, rows
// without a close are dropped, and blank or "null" numeric fields become
// absent values rather than parse errors.

use std::path::Path;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use tracing::{info, warn};

use crate::data::{HistoryRequest, HistorySource};
use crate::market_data::{Bar, PriceHistory};

const REQUIRED_COLUMNS: [&str; 7] = [
    "Date",
    "Open",
    "High",
    "Low",
    "Close",
    "Adj Close",
    "Volume",
];

/// History source backed by a file on disk.  The file defines the available
/// range, so fetch requests ignore their range parameters.
pub struct CsvSource {
    history: PriceHistory,
}

impl CsvSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read CSV file {}", path.display()))?;
        let history = parse_csv(&contents)
            .with_context(|| format!("failed to parse CSV file {}", path.display()))?;

        info!(path = %path.display(), bars = history.len(), "CSV history loaded");
        Ok(Self { history })
    }

    pub fn history(&self) -> &PriceHistory {
        &self.history
    }
}

#[async_trait]
impl HistorySource for CsvSource {
    async fn fetch_history(&self, _ticker: &str, _request: &HistoryRequest) -> Result<PriceHistory> {
        Ok(self.history.clone())
    }
}

struct ColumnIndices {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    adj_close: usize,
    volume: usize,
}

fn column_indices(headers: &[&str]) -> Result<ColumnIndices> {
    let mut found = [None; 7];
    let mut missing = Vec::new();
    for (slot, name) in REQUIRED_COLUMNS.iter().enumerate() {
        match headers.iter().position(|h| h == name) {
            Some(index) => found[slot] = Some(index),
            None => missing.push(*name),
        }
    }
    if !missing.is_empty() {
        bail!("CSV is missing required columns: {}", missing.join(", "));
    }

    // Every slot is populated once the check above passes.
    let slot = |i: usize| found[i].unwrap_or_default();
    Ok(ColumnIndices {
        date: slot(0),
        open: slot(1),
        high: slot(2),
        low: slot(3),
        close: slot(4),
        adj_close: slot(5),
        volume: slot(6),
    })
}

/// Blank, "null" and "nan" cells are treated as absent.
fn numeric_field(fields: &[&str], index: usize) -> Option<f64> {
    let raw = fields.get(index)?.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("null") || raw.eq_ignore_ascii_case("nan") {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_csv(contents: &str) -> Result<PriceHistory> {
    let mut lines = contents.lines();
    let header = lines.next().context("CSV file is empty")?;
    let headers: Vec<&str> = header.split(',').map(str::trim).collect();
    let columns = column_indices(&headers)?;

    let mut bars = Vec::new();
    let mut skipped = 0usize;
    for (i, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_number = i + 2;
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();

        let raw_date = fields.get(columns.date).copied().unwrap_or_default();
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
            .with_context(|| format!("invalid date {raw_date:?} on line {line_number}"))?;

        let Some(close) = numeric_field(&fields, columns.close) else {
            skipped += 1;
            continue;
        };

        bars.push(Bar {
            timestamp: date.and_time(NaiveTime::MIN).and_utc(),
            open: numeric_field(&fields, columns.open).unwrap_or(close),
            high: numeric_field(&fields, columns.high).unwrap_or(close),
            low: numeric_field(&fields, columns.low).unwrap_or(close),
            close,
            adj_close: numeric_field(&fields, columns.adj_close).unwrap_or(close),
            volume: numeric_field(&fields, columns.volume),
        });
    }

    if skipped > 0 {
        warn!(skipped, "dropped CSV rows without a close");
    }
    if bars.is_empty() {
        bail!("CSV contains no usable rows");
    }
    PriceHistory::new(bars)
}
