use crate::error::AppResult;
use crate::models::Carat;
use crate::services::{PriceTrackerService, ScraperService};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info};

/// Background task that syncs prices and checks alerts on a fixed interval
pub struct SyncJob {
    scraper: Arc<ScraperService>,
    tracker: Arc<PriceTrackerService>,
    sync_interval: Duration,
}

impl SyncJob {
    /// Create a new sync job
    ///
    /// # Arguments
    /// * `scraper` - Scraper service used for each sync
    /// * `tracker` - Tracker service used for the alert check after each sync
    pub fn new(scraper: Arc<ScraperService>, tracker: Arc<PriceTrackerService>) -> Self {
        Self {
            scraper,
            tracker,
            sync_interval: Duration::from_secs(6 * 60 * 60),
        }
    }

    /// Set sync interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.sync_interval = interval;
        self
    }

    /// Run forever, syncing immediately and then every interval
    pub async fn start(self) {
        let mut interval = time::interval(self.sync_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("Sync job started, will sync every {:?}", self.sync_interval);

        loop {
            interval.tick().await;

            if let Err(e) = self.run_once().await {
                error!("Error in scheduled sync: {}", e);
            }
        }
    }

    /// One sync followed by one alert check
    pub async fn run_once(&self) -> AppResult<()> {
        let summary = self.scraper.sync().await?;
        info!(
            "Scheduled sync: {} new, {} updated, {} total",
            summary.new_records, summary.updated_records, summary.total_records
        );

        let report = self.tracker.check_and_generate_alerts().await?;
        for alert in &report.for_carat(Carat::K22).alerts {
            info!("{}", alert.message);
        }

        Ok(())
    }
}
