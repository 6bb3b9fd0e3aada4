pub mod price_provider_service;
pub mod price_tracker_service;
pub mod scraper_service;
pub mod sync_job;

pub use price_provider_service::PriceProviderService;
pub use price_tracker_service::PriceTrackerService;
pub use scraper_service::{ScrapeStatus, ScraperService};
pub use sync_job::SyncJob;
