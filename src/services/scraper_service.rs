use crate::error::{AppError, AppResult, RepositoryError};
use crate::models::{GoldPrice, NewGoldPrice};
use crate::price_page::PricePageClient;
use crate::repositories::{GoldPriceRepository, UpsertSummary};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Snapshot of what has been scraped so far
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeStatus {
    pub total_records: i64,
    pub latest_record: Option<GoldPrice>,
    pub last_updated: Option<NaiveDateTime>,
}

/// Service that scrapes the price page and keeps the store in sync
pub struct ScraperService {
    client: PricePageClient,
    price_repo: Arc<GoldPriceRepository>,
}

impl ScraperService {
    pub fn new(client: PricePageClient, price_repo: Arc<GoldPriceRepository>) -> Self {
        Self { client, price_repo }
    }

    /// Fetch the page and parse its rows.
    ///
    /// Network failures are logged and reported as an empty scrape.
    pub async fn scrape_prices(&self) -> Vec<NewGoldPrice> {
        match self.client.fetch_prices().await {
            Ok(prices) => prices,
            Err(e) => {
                error!("Error scraping {}: {}", self.client.url(), e);
                Vec::new()
            }
        }
    }

    /// Store scraped prices, inserting new dates and updating known ones
    pub async fn store_prices(&self, prices: &[NewGoldPrice]) -> AppResult<UpsertSummary> {
        for price in prices {
            price.validate().map_err(AppError::Validation)?;
        }

        let summary = self
            .price_repo
            .upsert_many(prices)
            .await
            .map_err(RepositoryError::from)?;

        info!(
            "Database update: {} new records, {} updated records",
            summary.new_records, summary.updated_records
        );

        Ok(summary)
    }

    /// Scrape then upsert. An empty scrape skips the upsert.
    pub async fn sync(&self) -> AppResult<UpsertSummary> {
        info!("Starting data synchronization...");

        let prices = self.scrape_prices().await;

        if prices.is_empty() {
            warn!("No data scraped from website");
            return Ok(UpsertSummary {
                new_records: 0,
                updated_records: 0,
                total_records: self.price_repo.count().await?,
            });
        }

        let summary = self.store_prices(&prices).await?;
        info!("Data synchronization complete: {:?}", summary);
        Ok(summary)
    }

    /// Total records plus the latest one
    pub async fn status(&self) -> AppResult<ScrapeStatus> {
        let latest = self.price_repo.find_latest().await?;
        let total_records = self.price_repo.count().await?;

        Ok(ScrapeStatus {
            total_records,
            last_updated: latest.as_ref().map(|r| r.updated_at),
            latest_record: latest,
        })
    }
}
