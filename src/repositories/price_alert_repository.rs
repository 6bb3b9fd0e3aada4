use crate::models::{NewPriceAlert, PriceAlert};
use chrono::Utc;
use sqlx::{Result as SqlxResult, SqlitePool};

/// Repository for persisted price alerts
pub struct PriceAlertRepository {
    pool: SqlitePool,
}

impl PriceAlertRepository {
    /// Create a new PriceAlertRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new alert
    pub async fn create(&self, alert: &NewPriceAlert) -> SqlxResult<PriceAlert> {
        sqlx::query_as::<_, PriceAlert>(
            r#"
            INSERT INTO price_alerts
                (alert_type, percentage, base_price, current_price,
                 date_triggered, period_type, is_critical, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                id,
                alert_type,
                percentage,
                base_price,
                current_price,
                date_triggered,
                period_type,
                is_critical,
                created_at
            "#,
        )
        .bind(alert.direction.as_str())
        .bind(alert.percentage)
        .bind(alert.base_price)
        .bind(alert.current_price)
        .bind(alert.date_triggered)
        .bind(alert.period_type.as_str())
        .bind(alert.is_critical)
        .bind(Utc::now().naive_utc())
        .fetch_one(&self.pool)
        .await
    }

    /// Newest alerts first
    pub async fn find_recent(&self, limit: i64) -> SqlxResult<Vec<PriceAlert>> {
        sqlx::query_as::<_, PriceAlert>(
            r#"
            SELECT
                id,
                alert_type,
                percentage,
                base_price,
                current_price,
                date_triggered,
                period_type,
                is_critical,
                created_at
            FROM price_alerts
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Total number of alerts
    pub async fn count(&self) -> SqlxResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM price_alerts")
            .fetch_one(&self.pool)
            .await
    }
}
