#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use gold_tracker::api::GoldPriceApi;
use gold_tracker::config::ScraperConfig;
use gold_tracker::database::run_migrations;
use gold_tracker::models::*;
use gold_tracker::repositories::*;
use gold_tracker::AppState;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

/// "Today" used by every date-relative test
pub fn today() -> NaiveDate {
    date(2024, 12, 31)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// Test database backed by a private in-memory SQLite store
pub struct TestDatabase {
    pub pool: SqlitePool,
    pub price_repo: Arc<GoldPriceRepository>,
    pub alert_repo: Arc<PriceAlertRepository>,
}

impl TestDatabase {
    /// Create a fresh, migrated in-memory database
    pub async fn new() -> Self {
        // A single connection that never expires keeps the in-memory
        // database alive for the whole test
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<std::time::Duration>)
            .max_lifetime(None::<std::time::Duration>)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test database pool");

        run_migrations(&pool, None)
            .await
            .expect("Failed to run migrations");

        Self::from_pool(pool)
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool: pool.clone(),
            price_repo: Arc::new(GoldPriceRepository::new(pool.clone())),
            alert_repo: Arc::new(PriceAlertRepository::new(pool)),
        }
    }

    /// Insert one record per `(date, carat_22, carat_24)` entry
    pub async fn seed(&self, rows: &[(NaiveDate, f64, f64)]) -> UpsertSummary {
        let prices: Vec<NewGoldPrice> = rows
            .iter()
            .map(|(d, c22, c24)| price_on(*d, *c22, *c24))
            .collect();
        self.price_repo
            .upsert_many(&prices)
            .await
            .expect("Failed to seed prices")
    }

    /// One record per day from `start` for `days` days, 22 carat price
    /// produced by `price_at(day_index)`
    pub async fn seed_daily<F>(&self, start: NaiveDate, days: i64, price_at: F)
    where
        F: Fn(i64) -> f64,
    {
        let rows: Vec<(NaiveDate, f64, f64)> = (0..days)
            .map(|i| {
                let c22 = price_at(i);
                (start + Duration::days(i), c22, c22 * 1.09)
            })
            .collect();
        self.seed(&rows).await;
    }

    /// Application state wired to this database with `today()` pinned
    pub fn state(&self) -> Arc<AppState> {
        Arc::new(
            AppState::with_today(self.pool.clone(), &unreachable_scraper(), today())
                .expect("Failed to build app state"),
        )
    }

    /// Application state scraping `scraper` instead of the unreachable default
    pub fn state_with_scraper(&self, scraper: &ScraperConfig) -> Arc<AppState> {
        Arc::new(
            AppState::with_today(self.pool.clone(), scraper, today())
                .expect("Failed to build app state"),
        )
    }

    pub fn api(&self) -> GoldPriceApi {
        GoldPriceApi::new(self.state())
    }
}

/// A parsed price row with derived ounce/8 gram/21 carat values
pub fn price_on(date: NaiveDate, carat_22: f64, carat_24: f64) -> NewGoldPrice {
    NewGoldPrice {
        date,
        gold_ounce: carat_24 * 31.1035,
        carat_24_1gram: carat_24,
        carat_22_1gram: carat_22,
        carat_22_8grams: carat_22 * 8.0,
        carat_21_1gram: 0.0,
    }
}

/// Scraper pointed at a port nothing listens on
pub fn unreachable_scraper() -> ScraperConfig {
    ScraperConfig {
        url: "http://127.0.0.1:1/goldprice".to_string(),
        user_agent: "gold-tracker-tests".to_string(),
        timeout_secs: 2,
    }
}

/// Assert two floats are equal within 1e-6
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {}, got {}",
        expected,
        actual
    );
}
