use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::period::Period;

/// Averages over one group of daily records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateValues {
    pub avg_gold_ounce: f64,
    pub avg_carat_24_1gram: f64,
    pub avg_carat_22_1gram: f64,
    pub avg_carat_22_8grams: f64,
    pub avg_carat_21_1gram: f64,
    /// Min/max of the 22 carat 1 gram price
    pub min_price: f64,
    pub max_price: f64,
    pub data_points: usize,
}

/// Group of records sharing a `YYYY-MM` or `YYYY` key
#[derive(Debug, Clone, PartialEq)]
pub struct PriceAggregate {
    pub key: String,
    pub values: AggregateValues,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    pub month: String,
    #[serde(flatten)]
    pub values: AggregateValues,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyAggregate {
    pub year: String,
    #[serde(flatten)]
    pub values: AggregateValues,
}

impl From<PriceAggregate> for MonthlyAggregate {
    fn from(agg: PriceAggregate) -> Self {
        Self {
            month: agg.key,
            values: agg.values,
        }
    }
}

impl From<PriceAggregate> for YearlyAggregate {
    fn from(agg: PriceAggregate) -> Self {
        Self {
            year: agg.key,
            values: agg.values,
        }
    }
}

/// Summary of the 22 carat 1 gram price over a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceStatistics {
    pub period: Period,
    pub count: usize,
    pub start_price: f64,
    pub current_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub avg_price: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price_change: f64,
    pub price_change_percentage: f64,
}
