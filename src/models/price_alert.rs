use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Direction of a tracked price change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertDirection {
    Increase,
    Decrease,
}

impl AlertDirection {
    /// Convert from database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "increase" => Ok(AlertDirection::Increase),
            "decrease" => Ok(AlertDirection::Decrease),
            _ => Err(format!("Invalid alert type: {}", s)),
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertDirection::Increase => "increase",
            AlertDirection::Decrease => "decrease",
        }
    }
}

/// Tracking window an alert was raised for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Week,
    Month,
}

impl PeriodType {
    /// Convert from database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "week" => Ok(PeriodType::Week),
            "month" => Ok(PeriodType::Month),
            _ => Err(format!("Invalid period type: {}", s)),
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Week => "week",
            PeriodType::Month => "month",
        }
    }

    /// Days between the reference price and today
    pub fn offset_days(&self) -> i64 {
        match self {
            PeriodType::Week => 7,
            PeriodType::Month => 30,
        }
    }

    /// Label used in alert messages ("week" / "month")
    pub fn label(&self) -> &'static str {
        self.as_str()
    }
}

/// Persisted critical price-change alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PriceAlert {
    pub id: i64,
    pub alert_type: String, // Stored as TEXT, use AlertDirection for type safety
    pub percentage: f64,
    pub base_price: f64,
    pub current_price: f64,
    pub date_triggered: NaiveDate,
    pub period_type: String, // Stored as TEXT, use PeriodType for type safety
    pub is_critical: bool,
    pub created_at: NaiveDateTime,
}

impl PriceAlert {
    /// Get direction as an enum
    pub fn direction(&self) -> AlertDirection {
        AlertDirection::from_str(&self.alert_type).unwrap_or(AlertDirection::Decrease)
    }

    /// Get period type as an enum
    pub fn period_type_enum(&self) -> PeriodType {
        PeriodType::from_str(&self.period_type).unwrap_or(PeriodType::Week)
    }
}

/// Alert values to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewPriceAlert {
    pub direction: AlertDirection,
    pub percentage: f64,
    pub base_price: f64,
    pub current_price: f64,
    pub date_triggered: NaiveDate,
    pub period_type: PeriodType,
    pub is_critical: bool,
}
