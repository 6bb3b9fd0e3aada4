use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named relative date range used to bound price queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "month")]
    Month,
    #[serde(rename = "3months")]
    ThreeMonths,
    #[serde(rename = "6months")]
    SixMonths,
    #[serde(rename = "year")]
    Year,
    #[serde(rename = "all")]
    All,
}

impl Period {
    pub const ALL: [Period; 5] = [
        Period::Month,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::Year,
        Period::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Month => "month",
            Period::ThreeMonths => "3months",
            Period::SixMonths => "6months",
            Period::Year => "year",
            Period::All => "all",
        }
    }

    /// Strict parse; the error lists every valid token
    pub fn parse(token: &str) -> Result<Self, String> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == token)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|p| p.as_str()).collect();
                format!("Invalid period. Must be one of: {}", valid.join(", "))
            })
    }

    /// Unknown tokens fall back to `month`
    pub fn parse_lenient(token: &str) -> Self {
        Self::parse(token).unwrap_or(Period::Month)
    }

    /// Days back from today, `None` for no lower bound
    pub fn days_back(&self) -> Option<i64> {
        match self {
            Period::Month => Some(30),
            Period::ThreeMonths => Some(90),
            Period::SixMonths => Some(180),
            Period::Year => Some(365),
            Period::All => None,
        }
    }

    /// Inclusive lower bound relative to `today`
    pub fn start_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        self.days_back().map(|days| today - Duration::days(days))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
