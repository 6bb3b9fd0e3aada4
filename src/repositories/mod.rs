pub mod gold_price_repository;
pub mod price_alert_repository;

// Re-export all repositories for convenient access
pub use gold_price_repository::{GoldPriceRepository, UpsertSummary};
pub use price_alert_repository::PriceAlertRepository;
