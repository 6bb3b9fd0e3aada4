use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Gold purity grade tracked for price changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Carat {
    #[default]
    #[serde(rename = "22")]
    K22,
    #[serde(rename = "24")]
    K24,
}

impl Carat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Carat::K22 => "22",
            Carat::K24 => "24",
        }
    }

    /// The 1-gram price of this grade in a stored record
    pub fn price_of(&self, record: &GoldPrice) -> f64 {
        match self {
            Carat::K22 => record.carat_22_1gram,
            Carat::K24 => record.carat_24_1gram,
        }
    }
}

impl FromStr for Carat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "22" => Ok(Carat::K22),
            "24" => Ok(Carat::K24),
            _ => Err(format!("Invalid carat: {}. Must be one of: 22, 24", s)),
        }
    }
}

impl fmt::Display for Carat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored daily gold price, unique per date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct GoldPrice {
    pub id: i64,
    pub date: NaiveDate,
    pub gold_ounce: f64,
    pub carat_24_1gram: f64,
    pub carat_22_1gram: f64,
    pub carat_22_8grams: f64,
    pub carat_21_1gram: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A price row parsed from the source page, not yet persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGoldPrice {
    pub date: NaiveDate,
    pub gold_ounce: f64,
    pub carat_24_1gram: f64,
    pub carat_22_1gram: f64,
    pub carat_22_8grams: f64,
    /// Zero when the source row has no 21 carat column
    pub carat_21_1gram: f64,
}

impl NewGoldPrice {
    /// Check that every price is finite and non-negative
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("gold_ounce", self.gold_ounce),
            ("carat_24_1gram", self.carat_24_1gram),
            ("carat_22_1gram", self.carat_22_1gram),
            ("carat_22_8grams", self.carat_22_8grams),
            ("carat_21_1gram", self.carat_21_1gram),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number, got {}", name, value));
            }
        }
        Ok(())
    }
}
