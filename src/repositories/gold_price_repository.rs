use crate::models::{GoldPrice, NewGoldPrice};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Result as SqlxResult, SqlitePool};
use std::collections::HashSet;

const SELECT_COLUMNS: &str = r#"
    SELECT
        id,
        date,
        gold_ounce,
        carat_24_1gram,
        carat_22_1gram,
        carat_22_8grams,
        carat_21_1gram,
        created_at,
        updated_at
    FROM gold_prices
"#;

/// Counts produced by one upsert run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpsertSummary {
    pub new_records: u64,
    pub updated_records: u64,
    pub total_records: i64,
}

/// Repository for daily gold price data access
pub struct GoldPriceRepository {
    pool: SqlitePool,
}

impl GoldPriceRepository {
    /// Create a new GoldPriceRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All records with `start <= date <= end`, oldest first
    pub async fn find_in_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> SqlxResult<Vec<GoldPrice>> {
        let sql = format!(
            "{} WHERE (? IS NULL OR date >= ?) AND (? IS NULL OR date <= ?) ORDER BY date ASC",
            SELECT_COLUMNS
        );
        sqlx::query_as::<_, GoldPrice>(&sql)
            .bind(start)
            .bind(start)
            .bind(end)
            .bind(end)
            .fetch_all(&self.pool)
            .await
    }

    /// Every record, oldest first
    pub async fn find_all(&self) -> SqlxResult<Vec<GoldPrice>> {
        self.find_in_range(None, None).await
    }

    /// Find the record for a specific date
    pub async fn find_by_date(&self, date: NaiveDate) -> SqlxResult<Option<GoldPrice>> {
        let sql = format!("{} WHERE date = ?", SELECT_COLUMNS);
        sqlx::query_as::<_, GoldPrice>(&sql)
            .bind(date)
            .fetch_optional(&self.pool)
            .await
    }

    /// Most recent record
    pub async fn find_latest(&self) -> SqlxResult<Option<GoldPrice>> {
        let sql = format!("{} ORDER BY date DESC LIMIT 1", SELECT_COLUMNS);
        sqlx::query_as::<_, GoldPrice>(&sql)
            .fetch_optional(&self.pool)
            .await
    }

    /// Most recent record dated on or before `date`
    pub async fn find_latest_on_or_before(&self, date: NaiveDate) -> SqlxResult<Option<GoldPrice>> {
        let sql = format!(
            "{} WHERE date <= ? ORDER BY date DESC LIMIT 1",
            SELECT_COLUMNS
        );
        sqlx::query_as::<_, GoldPrice>(&sql)
            .bind(date)
            .fetch_optional(&self.pool)
            .await
    }

    /// Dates that already have a record
    pub async fn existing_dates(&self) -> SqlxResult<HashSet<NaiveDate>> {
        let dates: Vec<NaiveDate> = sqlx::query_scalar("SELECT date FROM gold_prices")
            .fetch_all(&self.pool)
            .await?;
        Ok(dates.into_iter().collect())
    }

    /// Total number of records
    pub async fn count(&self) -> SqlxResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM gold_prices")
            .fetch_one(&self.pool)
            .await
    }

    /// Insert new dates and overwrite prices for known ones in a single
    /// transaction. A date repeated within `prices` is inserted once and then
    /// updated.
    pub async fn upsert_many(&self, prices: &[NewGoldPrice]) -> SqlxResult<UpsertSummary> {
        let mut tx = self.pool.begin().await?;

        let known: Vec<NaiveDate> = sqlx::query_scalar("SELECT date FROM gold_prices")
            .fetch_all(&mut *tx)
            .await?;
        let mut known: HashSet<NaiveDate> = known.into_iter().collect();

        let now = Utc::now().naive_utc();
        let mut summary = UpsertSummary::default();

        for price in prices {
            if known.contains(&price.date) {
                sqlx::query(
                    r#"
                    UPDATE gold_prices
                    SET gold_ounce = ?,
                        carat_24_1gram = ?,
                        carat_22_1gram = ?,
                        carat_22_8grams = ?,
                        carat_21_1gram = ?,
                        updated_at = ?
                    WHERE date = ?
                    "#,
                )
                .bind(price.gold_ounce)
                .bind(price.carat_24_1gram)
                .bind(price.carat_22_1gram)
                .bind(price.carat_22_8grams)
                .bind(price.carat_21_1gram)
                .bind(now)
                .bind(price.date)
                .execute(&mut *tx)
                .await?;
                summary.updated_records += 1;
            } else {
                sqlx::query(
                    r#"
                    INSERT INTO gold_prices
                        (date, gold_ounce, carat_24_1gram, carat_22_1gram,
                         carat_22_8grams, carat_21_1gram, created_at, updated_at)
                    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(price.date)
                .bind(price.gold_ounce)
                .bind(price.carat_24_1gram)
                .bind(price.carat_22_1gram)
                .bind(price.carat_22_8grams)
                .bind(price.carat_21_1gram)
                .bind(now)
                .bind(now)
                .execute(&mut *tx)
                .await?;
                known.insert(price.date);
                summary.new_records += 1;
            }
        }

        summary.total_records = sqlx::query_scalar("SELECT COUNT(*) FROM gold_prices")
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(summary)
    }
}
