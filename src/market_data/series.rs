// =============================================================================
// Time Series — timestamped values with calendar resampling
// =============================================================================
//
// The detectors work on close (and volume) series extracted from a
// `PriceHistory`, downsampled to monthly or weekly cadence where the setup
// calls for it. Resampling keeps the LAST observation of each period and
// drops periods with no observations; nothing is ever forward-filled.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// Calendar-month ordinal (`year * 12 + month0`), used to count whole months
/// between two observations.
pub fn month_ordinal(at: DateTime<Utc>) -> i64 {
    i64::from(at.year()) * 12 + i64::from(at.month0())
}

/// The Friday that closes the week containing `date` (the date itself when it
/// already is a Friday).
fn week_ending_friday(date: NaiveDate) -> NaiveDate {
    let days_ahead = (4 - i64::from(date.weekday().num_days_from_monday())).rem_euclid(7);
    date + Duration::days(days_ahead)
}

/// Chronologically ordered scalar series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries {
    stamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl TimeSeries {
    pub fn push(&mut self, at: DateTime<Utc>, value: f64) {
        self.stamps.push(at);
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn stamps(&self) -> &[DateTime<Utc>] {
        &self.stamps
    }

    pub fn last_value(&self) -> Option<f64> {
        self.values.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.stamps.iter().copied().zip(self.values.iter().copied())
    }

    /// Last observation of each calendar month; months with no observations
    /// are dropped. Points keep the timestamp of the observation itself.
    pub fn resample_monthly(&self) -> TimeSeries {
        self.resample_by(month_ordinal)
    }

    /// Last observation of each Friday-ending week; empty weeks are dropped.
    pub fn resample_weekly(&self) -> TimeSeries {
        self.resample_by(|at| i64::from(week_ending_friday(at.date_naive()).num_days_from_ce()))
    }

    /// Shared grouping pass: the series is chronological, so each period is a
    /// contiguous run and a single scan keeps the last observation per key.
    fn resample_by<F>(&self, key_of: F) -> TimeSeries
    where
        F: Fn(DateTime<Utc>) -> i64,
    {
        let mut out = TimeSeries::default();
        let mut current: Option<(i64, DateTime<Utc>, f64)> = None;

        for (at, value) in self.iter() {
            let key = key_of(at);
            match current {
                Some((prev_key, _, _)) if prev_key == key => {
                    current = Some((key, at, value));
                }
                Some((_, prev_at, prev_value)) => {
                    out.push(prev_at, prev_value);
                    current = Some((key, at, value));
                }
                None => current = Some((key, at, value)),
            }
        }
        if let Some((_, at, value)) = current {
            out.push(at, value);
        }
        out
    }
}

impl FromIterator<(DateTime<Utc>, f64)> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = (DateTime<Utc>, f64)>>(iter: I) -> Self {
        let mut series = TimeSeries::default();
        for (at, value) in iter {
            series.push(at, value);
        }
        series
    }
}
