// =============================================================================
// Shared types used across the Greenline screener
// =============================================================================

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::indicators::IndicatorError;

/// Bar cadence an oscillator is evaluated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Daily,
    Weekly,
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
        }
    }
}

impl std::str::FromStr for Timeframe {
    type Err = IndicatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "d" | "daily" => Ok(Self::Daily),
            "w" | "weekly" => Ok(Self::Weekly),
            other => Err(IndicatorError::InvalidParameter {
                name: "timeframe",
                reason: format!("unsupported timeframe '{other}', expected daily or weekly"),
            }),
        }
    }
}

/// A single diagnostic value attached to an indicator report row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Detail {
    /// Numeric metric; `None` when the value is not available for this input.
    Number(Option<f64>),
    /// Integer count (e.g. number of base months).
    Count(usize),
    /// Boolean sub-verdict.
    Flag(bool),
}

impl std::fmt::Display for Detail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(Some(v)) if v.is_infinite() && *v > 0.0 => write!(f, "inf"),
            Self::Number(Some(v)) => write!(f, "{v:.2}"),
            Self::Number(None) => write!(f, "n/a"),
            Self::Count(n) => write!(f, "{n}"),
            Self::Flag(b) => write!(f, "{b}"),
        }
    }
}

/// Ordered diagnostic mapping for one indicator report row.
///
/// Keys keep their insertion order so table and JSON output stay stable; the
/// order carries no meaning beyond presentation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Details {
    entries: Vec<(&'static str, Detail)>,
}

impl Details {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_number(&mut self, key: &'static str, value: f64) {
        self.entries.push((key, Detail::Number(Some(value))));
    }

    pub fn push_optional(&mut self, key: &'static str, value: Option<f64>) {
        self.entries.push((key, Detail::Number(value)));
    }

    pub fn push_count(&mut self, key: &'static str, value: usize) {
        self.entries.push((key, Detail::Count(value)));
    }

    pub fn push_flag(&mut self, key: &'static str, value: bool) {
        self.entries.push((key, Detail::Flag(value)));
    }

    pub fn get(&self, key: &str) -> Option<&Detail> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Detail)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Details {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// One row of the screening report: an indicator's verdict plus the numbers
/// behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorReport {
    pub name: String,
    pub passed: bool,
    pub details: Details,
}

impl IndicatorReport {
    pub fn new(name: impl Into<String>, passed: bool, details: Details) -> Self {
        Self {
            name: name.into(),
            passed,
            details,
        }
    }
}

/// Full screening result for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningReport {
    pub ticker: String,
    /// Timestamp of the most recent bar the verdicts were computed from.
    pub as_of: DateTime<Utc>,
    pub indicators: Vec<IndicatorReport>,
}

impl ScreeningReport {
    /// Rows whose verdict passed.
    pub fn passed(&self) -> Vec<&IndicatorReport> {
        self.indicators.iter().filter(|r| r.passed).collect()
    }

    /// Rows whose verdict failed.
    pub fn failed(&self) -> Vec<&IndicatorReport> {
        self.indicators.iter().filter(|r| !r.passed).collect()
    }

    /// Look up a row by indicator name.
    pub fn indicator(&self, name: &str) -> Option<&IndicatorReport> {
        self.indicators.iter().find(|r| r.name == name)
    }
}
