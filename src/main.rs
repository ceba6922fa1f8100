// =============================================================================
// Greenline Screener — Main Entry Point
// =============================================================================
//
// Screens a list of tickers for long-term breakout setups: green line,
// Darvas box, RWB ribbon, momentum on two timeframes, and the combined
// breakout checklist. History comes from Yahoo Finance or a local CSV.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod config;
mod data;
mod indicators;
mod market_data;
mod report;
mod screener;
mod signals;
mod types;

use std::path::PathBuf;

use anyhow::bail;
use chrono::{NaiveDate, NaiveTime};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::ScreenerConfig;
use crate::data::{CsvSource, HistoryRequest, HistorySource, YahooSource};
use crate::screener::Screener;
use crate::types::ScreeningReport;

#[derive(Debug, Parser)]
#[command(
    name = "greenline",
    about = "Screens stocks for green-line and breakout setups",
    version
)]
struct Cli {
    /// Ticker symbols to screen (e.g. AAPL MSFT)
    tickers: Vec<String>,

    /// Screen a local CSV export instead of fetching from Yahoo; the file
    /// stem is used as the ticker when none is given
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// JSON config file with detector parameters
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Relative fetch range (e.g. 1y, 2y, 6mo); overrides the config
    #[arg(long)]
    period: Option<String>,

    /// Bar interval (e.g. 1d); overrides the config
    #[arg(long)]
    interval: Option<String>,

    /// Range start date (YYYY-MM-DD); takes precedence over the period
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Range end date (YYYY-MM-DD); defaults to today when --start is given
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Emit JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & logging ─────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        Greenline Screener — Starting Up                  ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    // ── 2. Configuration ─────────────────────────────────────────────────
    let config = match &cli.config {
        Some(path) => ScreenerConfig::load(path)?,
        None => ScreenerConfig::load("screener_config.json").unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load config, using defaults");
            ScreenerConfig::default()
        }),
    };

    // ── 3. Tickers ───────────────────────────────────────────────────────
    let mut tickers: Vec<String> = cli
        .tickers
        .iter()
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect();
    if tickers.is_empty() {
        if let Some(stem) = cli
            .csv
            .as_ref()
            .and_then(|p| p.file_stem())
            .and_then(|s| s.to_str())
        {
            tickers.push(stem.to_uppercase());
        }
    }
    if tickers.is_empty() {
        bail!("no tickers given; pass symbols or --csv <PATH>");
    }
    info!(tickers = ?tickers, "Configured tickers");

    // ── 4. Fetch range ───────────────────────────────────────────────────
    let request = HistoryRequest {
        start: cli.start.map(|d| d.and_time(NaiveTime::MIN).and_utc()),
        end: cli.end.map(|d| d.and_time(NaiveTime::MIN).and_utc()),
        period: cli.period.clone().unwrap_or_else(|| config.period.clone()),
        interval: cli
            .interval
            .clone()
            .unwrap_or_else(|| config.interval.clone()),
    };

    // ── 5. Screen ────────────────────────────────────────────────────────
    let reports = match &cli.csv {
        Some(path) => {
            let screener = Screener::new(CsvSource::open(path)?, config);
            run_batch(&screener, &tickers, &request).await
        }
        None => {
            let screener = Screener::new(YahooSource::new(), config);
            run_batch(&screener, &tickers, &request).await
        }
    };
    if reports.is_empty() {
        bail!("screening failed for every requested ticker");
    }

    // ── 6. Output ────────────────────────────────────────────────────────
    if cli.json {
        println!("{}", report::render_json(&reports)?);
    } else {
        print!("{}", report::render_table(&reports));
    }

    info!(screened = reports.len(), "Screening run complete");
    Ok(())
}

/// Screen each ticker in turn, dropping the ones that fail so one bad symbol
/// does not sink the whole run.
async fn run_batch<S: HistorySource>(
    screener: &Screener<S>,
    tickers: &[String],
    request: &HistoryRequest,
) -> Vec<ScreeningReport> {
    let mut reports = Vec::with_capacity(tickers.len());
    for ticker in tickers {
        match screener.screen(ticker, request).await {
            Ok(report) => reports.push(report),
            Err(e) => error!(ticker = %ticker, error = %e, "screening failed, skipping ticker"),
        }
    }
    reports
}
