//! Gold Tracker Library
//!
//! Scrapes the daily gold price table, stores it in SQLite and serves
//! aggregated views and price-change alerts. This module exposes the
//! components for use by the binary and by tests.

pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod price_page;
pub mod repositories;
pub mod services;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};

use chrono::NaiveDate;
use config::ScraperConfig;
use database::Database;
use price_page::PricePageClient;
use repositories::*;
use services::{PriceProviderService, PriceTrackerService, ScraperService};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application state containing all repositories and services
pub struct AppState {
    pub database: Database,
    pub price_repo: Arc<GoldPriceRepository>,
    pub alert_repo: Arc<PriceAlertRepository>,
    pub scraper_service: Arc<ScraperService>,
    pub provider_service: Arc<PriceProviderService>,
    pub tracker_service: Arc<PriceTrackerService>,
}

impl AppState {
    /// Create a new AppState with initialized repositories and services
    pub fn new(pool: SqlitePool, scraper: &ScraperConfig) -> AppResult<Self> {
        Self::build(pool, scraper, None)
    }

    /// Same as `new` but with "today" pinned for date-relative queries
    pub fn with_today(pool: SqlitePool, scraper: &ScraperConfig, today: NaiveDate) -> AppResult<Self> {
        Self::build(pool, scraper, Some(today))
    }

    fn build(pool: SqlitePool, scraper: &ScraperConfig, today: Option<NaiveDate>) -> AppResult<Self> {
        let database = Database::new(pool.clone());
        let price_repo = Arc::new(GoldPriceRepository::new(pool.clone()));
        let alert_repo = Arc::new(PriceAlertRepository::new(pool));

        let client = PricePageClient::new(scraper)?;
        let scraper_service = ScraperService::new(client, price_repo.clone());

        let mut provider_service = PriceProviderService::new(price_repo.clone());
        let mut tracker_service = PriceTrackerService::new(price_repo.clone(), alert_repo.clone());
        if let Some(today) = today {
            provider_service = provider_service.with_today(today);
            tracker_service = tracker_service.with_today(today);
        }

        Ok(Self {
            database,
            price_repo,
            alert_repo,
            scraper_service: Arc::new(scraper_service),
            provider_service: Arc::new(provider_service),
            tracker_service: Arc::new(tracker_service),
        })
    }
}
