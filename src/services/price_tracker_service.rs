use crate::error::AppResult;
use crate::models::{
    AlertDirection, Carat, CaratTracking, GoldPrice, PeriodType, PriceAlert, PriceTracking,
    Severity, TrackingAlert, TrackingReport,
};
use crate::repositories::{GoldPriceRepository, PriceAlertRepository};
use chrono::{Duration, Local, NaiveDate};
use std::sync::Arc;
use tracing::{debug, info};

/// A drop of this many percent or more is critical
pub const CRITICAL_DECREASE_THRESHOLD: f64 = 5.0;

/// A rise of this many percent or more is critical
pub const CRITICAL_INCREASE_THRESHOLD: f64 = 10.0;

/// Service tracking week/month price changes and raising alerts
pub struct PriceTrackerService {
    price_repo: Arc<GoldPriceRepository>,
    alert_repo: Arc<PriceAlertRepository>,
    today: Option<NaiveDate>,
}

impl PriceTrackerService {
    pub fn new(price_repo: Arc<GoldPriceRepository>, alert_repo: Arc<PriceAlertRepository>) -> Self {
        Self {
            price_repo,
            alert_repo,
            today: None,
        }
    }

    /// Pin "today" instead of reading the local clock
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Compare the latest price against the closest record on or before
    /// `today - period.offset_days()`.
    ///
    /// `None` when the store is empty or has no record that old.
    pub async fn get_price_change(
        &self,
        carat: Carat,
        period: PeriodType,
    ) -> AppResult<Option<PriceTracking>> {
        let current = match self.price_repo.find_latest().await? {
            Some(record) => record,
            None => return Ok(None),
        };

        let reference_date = self.today() - Duration::days(period.offset_days());
        let base = match self.price_repo.find_latest_on_or_before(reference_date).await? {
            Some(record) => record,
            None => {
                debug!(
                    "No {} carat record on or before {} for {} tracking",
                    carat,
                    reference_date,
                    period.as_str()
                );
                return Ok(None);
            }
        };

        Ok(Some(build_tracking(period, carat, &base, &current)))
    }

    /// Change over the past 7 days
    pub async fn get_price_change_weekly(&self, carat: Carat) -> AppResult<Option<PriceTracking>> {
        self.get_price_change(carat, PeriodType::Week).await
    }

    /// Change over the past 30 days
    pub async fn get_price_change_monthly(&self, carat: Carat) -> AppResult<Option<PriceTracking>> {
        self.get_price_change(carat, PeriodType::Month).await
    }

    /// Weekly and monthly tracking for one carat, with alert messages
    pub async fn get_carat_tracking(&self, carat: Carat) -> AppResult<CaratTracking> {
        let weekly = self.get_price_change_weekly(carat).await?;
        let monthly = self.get_price_change_monthly(carat).await?;
        Ok(carat_tracking(carat, weekly, monthly))
    }

    /// Tracking for both carats
    pub async fn get_all_price_tracking(&self) -> AppResult<TrackingReport> {
        Ok(TrackingReport {
            carat_22: self.get_carat_tracking(Carat::K22).await?,
            carat_24: self.get_carat_tracking(Carat::K24).await?,
        })
    }

    /// Build the full report and persist critical 22 carat changes
    pub async fn check_and_generate_alerts(&self) -> AppResult<TrackingReport> {
        let report = self.get_all_price_tracking().await?;

        let candidates = [
            report.carat_22.weekly_tracking.as_ref(),
            report.carat_22.monthly_tracking.as_ref(),
        ];
        for tracking in candidates.into_iter().flatten() {
            if tracking.is_critical {
                let alert = self.alert_repo.create(&tracking.to_new_alert()).await?;
                info!(
                    "Saved critical {} {} alert {}: {}%",
                    alert.period_type,
                    alert.direction().as_str(),
                    alert.id,
                    alert.percentage
                );
            }
        }

        info!(
            "Alert check complete. Critical alerts: {}",
            report.has_critical_alerts()
        );

        Ok(report)
    }

    /// Most recent persisted alerts, newest first
    pub async fn get_recent_alerts(&self, limit: i64) -> AppResult<Vec<PriceAlert>> {
        Ok(self.alert_repo.find_recent(limit).await?)
    }
}

/// Percentage change from `old_price` to `new_price`; 0 when `old_price` is 0
pub fn percentage_change(old_price: f64, new_price: f64) -> f64 {
    if old_price == 0.0 {
        return 0.0;
    }
    (new_price - old_price) / old_price * 100.0
}

/// Round to two decimals, folding negative zero into zero
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Direction from the sign, criticality from the thresholds (inclusive)
pub fn classify_change(percentage: f64) -> (AlertDirection, bool) {
    let direction = if percentage > 0.0 {
        AlertDirection::Increase
    } else {
        AlertDirection::Decrease
    };
    let is_critical = percentage <= -CRITICAL_DECREASE_THRESHOLD
        || percentage >= CRITICAL_INCREASE_THRESHOLD;
    (direction, is_critical)
}

/// Tracking result between a reference record and the current one
pub fn build_tracking(
    period: PeriodType,
    carat: Carat,
    base: &GoldPrice,
    current: &GoldPrice,
) -> PriceTracking {
    let base_price = carat.price_of(base);
    let current_price = carat.price_of(current);
    // Thresholds apply to the unrounded change; only the reported value is rounded
    let raw = percentage_change(base_price, current_price);
    let (alert_type, is_critical) = classify_change(raw);

    PriceTracking {
        period_type: period,
        base_date: base.date,
        current_date: current.date,
        base_price,
        current_price,
        price_change: current_price - base_price,
        percentage_change: round2(raw),
        alert_type,
        is_critical,
        days_tracked: (current.date - base.date).num_days(),
        carat,
    }
}

/// Message for one tracking result
pub fn tracking_alert(tracking: &PriceTracking) -> TrackingAlert {
    let pct = tracking.percentage_change;
    let window = tracking.period_type.label();

    let (severity, message) = match (tracking.is_critical, tracking.alert_type) {
        (true, AlertDirection::Decrease) => (
            Severity::Critical,
            format!(
                "⚠️ CRITICAL ALERT: {} Carat gold price decreased by {:.2}% in the past {}!",
                tracking.carat,
                pct.abs(),
                window
            ),
        ),
        (true, AlertDirection::Increase) => (
            Severity::Critical,
            format!(
                "🚀 CRITICAL ALERT: {} Carat gold price increased by {:.2}% in the past {}!",
                tracking.carat, pct, window
            ),
        ),
        (false, _) => {
            let label = match tracking.period_type {
                PeriodType::Week => "Weekly",
                PeriodType::Month => "Monthly",
            };
            let sign = if pct > 0.0 { "+" } else { "" };
            (
                Severity::Info,
                format!("{} change: {}{:.2}%", label, sign, pct),
            )
        }
    };

    TrackingAlert {
        severity,
        message,
        data: tracking.clone(),
    }
}

/// Bundle weekly and monthly results for one carat
pub fn carat_tracking(
    carat: Carat,
    weekly: Option<PriceTracking>,
    monthly: Option<PriceTracking>,
) -> CaratTracking {
    let alerts: Vec<TrackingAlert> = weekly
        .iter()
        .chain(monthly.iter())
        .map(tracking_alert)
        .collect();

    let has_critical_alerts = alerts.iter().any(|a| a.severity == Severity::Critical);
    debug!(
        "{} carat tracking: {} alerts, critical={}",
        carat,
        alerts.len(),
        has_critical_alerts
    );

    CaratTracking {
        weekly_tracking: weekly,
        monthly_tracking: monthly,
        alerts,
        has_critical_alerts,
    }
}
