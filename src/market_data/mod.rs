pub mod history;
pub mod series;

// Re-export the core containers for convenient access (e.g. `use crate::market_data::PriceHistory`).
pub use history::{Bar, PriceHistory};
pub use series::{month_ordinal, TimeSeries};

/// Fixture builders shared by detector and screener tests. Real feeds only
/// produce weekday bars, so the helpers lay closes onto consecutive weekdays.
#[cfg(test)]
pub(crate) mod testing {
    use super::{Bar, PriceHistory};
    use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

    pub fn weekday_bars(start: NaiveDate, closes: &[f64]) -> Vec<Bar> {
        let mut day = start;
        let mut bars = Vec::with_capacity(closes.len());
        for &close in closes {
            while matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
                day = day.succ_opt().unwrap();
            }
            bars.push(Bar {
                timestamp: day.and_time(NaiveTime::MIN).and_utc(),
                open: close,
                high: close,
                low: close,
                close,
                adj_close: close,
                volume: Some(1000.0),
            });
            day = day.succ_opt().unwrap();
        }
        bars
    }

    pub fn weekday_history(start: NaiveDate, closes: &[f64]) -> PriceHistory {
        PriceHistory::new(weekday_bars(start, closes)).unwrap()
    }
}
