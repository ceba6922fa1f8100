// =============================================================================
// Report Rendering
// =============================================================================
//
// Two output shapes for the same data: a fixed-width table for the terminal
// and pretty JSON for piping into other tools.

use anyhow::{Context, Result};

use crate::types::ScreeningReport;

pub fn render_table(reports: &[ScreeningReport]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<8} {:<10} {:<21} {:<6} {}\n",
        "Ticker", "As Of", "Indicator", "Status", "Details"
    ));
    out.push_str(&format!("{}\n", "-".repeat(100)));

    for report in reports {
        let as_of = report.as_of.format("%Y-%m-%d").to_string();
        for row in &report.indicators {
            let details = row
                .details
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!(
                "{:<8} {:<10} {:<21} {:<6} {}\n",
                report.ticker,
                as_of,
                row.name,
                if row.passed { "PASS" } else { "FAIL" },
                details
            ));
        }
    }
    out
}

pub fn render_json(reports: &[ScreeningReport]) -> Result<String> {
    serde_json::to_string_pretty(reports).context("failed to serialise screening reports")
}
