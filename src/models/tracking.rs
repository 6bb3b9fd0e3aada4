use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};

use super::gold_price::Carat;
use super::price_alert::{AlertDirection, NewPriceAlert, PeriodType};

/// Change between a reference price and the latest price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTracking {
    pub period_type: PeriodType,
    pub base_date: NaiveDate,
    pub current_date: NaiveDate,
    pub base_price: f64,
    pub current_price: f64,
    pub price_change: f64,
    /// Rounded to two decimals
    pub percentage_change: f64,
    pub alert_type: AlertDirection,
    pub is_critical: bool,
    pub days_tracked: i64,
    pub carat: Carat,
}

impl PriceTracking {
    /// Alert row for this change, stamped with the current record's date
    pub fn to_new_alert(&self) -> NewPriceAlert {
        NewPriceAlert {
            direction: self.alert_type,
            percentage: self.percentage_change,
            base_price: self.base_price,
            current_price: self.current_price,
            date_triggered: self.current_date,
            period_type: self.period_type,
            is_critical: self.is_critical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Info,
}

/// Human-readable alert generated from a tracking result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingAlert {
    pub severity: Severity,
    pub message: String,
    pub data: PriceTracking,
}

/// Weekly and monthly tracking for one carat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaratTracking {
    pub weekly_tracking: Option<PriceTracking>,
    pub monthly_tracking: Option<PriceTracking>,
    pub alerts: Vec<TrackingAlert>,
    pub has_critical_alerts: bool,
}

/// Tracking for both carats.
///
/// On the wire the 22 carat fields are repeated at the root so older
/// consumers reading `weekly_tracking`/`alerts` directly keep working.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingReport {
    pub carat_22: CaratTracking,
    pub carat_24: CaratTracking,
}

impl TrackingReport {
    pub fn for_carat(&self, carat: Carat) -> &CaratTracking {
        match carat {
            Carat::K22 => &self.carat_22,
            Carat::K24 => &self.carat_24,
        }
    }

    pub fn has_critical_alerts(&self) -> bool {
        self.carat_22.has_critical_alerts
    }
}

impl Serialize for TrackingReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wire<'a> {
            carat_22: &'a CaratTracking,
            carat_24: &'a CaratTracking,
            #[serde(flatten)]
            root: &'a CaratTracking,
        }

        Wire {
            carat_22: &self.carat_22,
            carat_24: &self.carat_24,
            root: &self.carat_22,
        }
        .serialize(serializer)
    }
}
