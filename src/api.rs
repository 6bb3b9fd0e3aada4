//! Caller-facing operations.
//!
//! Each method corresponds to one endpoint of the price service and returns
//! a serializable envelope. Transport (HTTP routing, CORS) is left to the
//! embedding application; errors carry a status code via
//! [`AppError::status_code`].

use crate::error::{option_to_result, AppError, AppResult};
use crate::models::{
    Carat, GoldPrice, MonthlyAggregate, Period, PriceAlert, PriceStatistics, PriceTracking,
    TrackingReport, YearlyAggregate,
};
use crate::repositories::UpsertSummary;
use crate::services::ScrapeStatus;
use crate::AppState;
use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

pub const SERVICE_NAME: &str = "Gold Price Tracker";
pub const DEFAULT_ALERT_LIMIT: i64 = 10;
const MAX_ALERT_LIMIT: i64 = 1000;

/// `{status, data}` envelope
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            message: None,
            data,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// `{status, count, data}` envelope for lists
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn success(data: Vec<T>) -> Self {
        Self {
            status: "success",
            period: None,
            count: data.len(),
            data,
        }
    }

    pub fn for_period(period: Period, data: Vec<T>) -> Self {
        Self {
            period: Some(period),
            ..Self::success(data)
        }
    }
}

/// Error body returned to callers
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub code: u16,
    pub detail: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        let code = err.status_code();
        // Internal details stay in the logs
        let detail = match err {
            AppError::NotFound(msg) | AppError::Validation(msg) => msg.clone(),
            AppError::Network(msg) => msg.clone(),
            _ => {
                error!("Internal error: {:?}", err);
                "Internal server error".to_string()
            }
        };
        Self {
            status: "error",
            code,
            detail,
        }
    }
}

/// Statistics, or `{}` when the period has no data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatisticsData {
    Summary(PriceStatistics),
    Empty {},
}

impl From<Option<PriceStatistics>> for StatisticsData {
    fn from(stats: Option<PriceStatistics>) -> Self {
        match stats {
            Some(stats) => StatisticsData::Summary(stats),
            None => StatisticsData::Empty {},
        }
    }
}

impl StatisticsData {
    pub fn is_empty(&self) -> bool {
        matches!(self, StatisticsData::Empty {})
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: NaiveDateTime,
}

/// Everything the dashboard shows in one payload
#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub latest_price: Option<GoldPrice>,
    pub statistics: StatisticsData,
    pub tracking: TrackingReport,
    pub total_records: i64,
    pub last_updated: NaiveDateTime,
}

/// Facade over the scraper, provider and tracker services
#[derive(Clone)]
pub struct GoldPriceApi {
    state: Arc<AppState>,
}

impl GoldPriceApi {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "running",
            service: SERVICE_NAME,
            version: env!("CARGO_PKG_VERSION"),
            timestamp: Utc::now().naive_utc(),
        }
    }

    /// Scrape the source page and upsert its rows
    pub async fn trigger_sync(&self) -> AppResult<ApiResponse<UpsertSummary>> {
        info!("Sync requested");
        let summary = self.state.scraper_service.sync().await?;
        Ok(ApiResponse::success(summary).with_message("Data synchronization completed"))
    }

    pub async fn scrape_status(&self) -> AppResult<ScrapeStatus> {
        self.state.scraper_service.status().await
    }

    pub async fn latest_price(&self) -> AppResult<ApiResponse<GoldPrice>> {
        let price = self.state.provider_service.get_latest_price().await?;
        let price = option_to_result(price, "No price data available")?;
        Ok(ApiResponse::success(price))
    }

    /// Prices for a period token; unknown tokens are rejected
    pub async fn prices_by_period(&self, token: &str) -> AppResult<ListResponse<GoldPrice>> {
        let period = Period::parse(token).map_err(AppError::Validation)?;
        let prices = self.state.provider_service.get_prices_by_period(period).await?;
        Ok(ListResponse::for_period(period, prices))
    }

    pub async fn monthly_aggregate(&self) -> AppResult<ListResponse<MonthlyAggregate>> {
        let data = self.state.provider_service.get_monthly_aggregated_data().await?;
        Ok(ListResponse::success(data))
    }

    pub async fn yearly_aggregate(&self) -> AppResult<ListResponse<YearlyAggregate>> {
        let data = self.state.provider_service.get_yearly_aggregated_data().await?;
        Ok(ListResponse::success(data))
    }

    /// Statistics for a period token; unknown tokens fall back to `month`
    pub async fn statistics(&self, token: &str) -> AppResult<ApiResponse<StatisticsData>> {
        let period = Period::parse_lenient(token);
        let stats = self.state.provider_service.get_price_statistics(period).await?;
        Ok(ApiResponse::success(stats.into()))
    }

    pub async fn weekly_tracking(&self, carat: Option<&str>) -> AppResult<ApiResponse<PriceTracking>> {
        let carat = parse_carat(carat)?;
        let tracking = self.state.tracker_service.get_price_change_weekly(carat).await?;
        let tracking = option_to_result(tracking, "Insufficient data for weekly tracking")?;
        Ok(ApiResponse::success(tracking))
    }

    pub async fn monthly_tracking(&self, carat: Option<&str>) -> AppResult<ApiResponse<PriceTracking>> {
        let carat = parse_carat(carat)?;
        let tracking = self.state.tracker_service.get_price_change_monthly(carat).await?;
        let tracking = option_to_result(tracking, "Insufficient data for monthly tracking")?;
        Ok(ApiResponse::success(tracking))
    }

    pub async fn all_tracking(&self) -> AppResult<ApiResponse<TrackingReport>> {
        let report = self.state.tracker_service.get_all_price_tracking().await?;
        Ok(ApiResponse::success(report))
    }

    /// Newest persisted alerts, `limit` defaulting to 10
    pub async fn recent_alerts(&self, limit: Option<i64>) -> AppResult<ListResponse<PriceAlert>> {
        let limit = limit.unwrap_or(DEFAULT_ALERT_LIMIT);
        if !(1..=MAX_ALERT_LIMIT).contains(&limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_ALERT_LIMIT
            )));
        }
        let alerts = self.state.tracker_service.get_recent_alerts(limit).await?;
        Ok(ListResponse::success(alerts))
    }

    /// Evaluate tracking and persist critical alerts
    pub async fn check_alerts(&self) -> AppResult<ApiResponse<TrackingReport>> {
        let report = self.state.tracker_service.check_and_generate_alerts().await?;
        Ok(ApiResponse::success(report))
    }

    pub async fn dashboard(&self) -> AppResult<ApiResponse<DashboardData>> {
        let latest_price = self.state.provider_service.get_latest_price().await?;
        let statistics = self
            .state
            .provider_service
            .get_price_statistics(Period::Month)
            .await?;
        let tracking = self.state.tracker_service.get_all_price_tracking().await?;
        let total_records = self.state.price_repo.count().await?;

        Ok(ApiResponse::success(DashboardData {
            latest_price,
            statistics: statistics.into(),
            tracking,
            total_records,
            last_updated: Utc::now().naive_utc(),
        }))
    }
}

fn parse_carat(token: Option<&str>) -> AppResult<Carat> {
    match token {
        Some(token) => token.parse().map_err(AppError::Validation),
        None => Ok(Carat::default()),
    }
}
