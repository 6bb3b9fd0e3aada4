//! Domain models for the gold price tracker.
//!
//! Database-backed records (`GoldPrice`, `PriceAlert`) plus the derived
//! views produced by the provider and tracker services.

pub mod aggregate;
pub mod gold_price;
pub mod period;
pub mod price_alert;
pub mod tracking;

// Re-export all models for convenient access
pub use aggregate::{AggregateValues, MonthlyAggregate, PriceAggregate, PriceStatistics, YearlyAggregate};
pub use gold_price::{Carat, GoldPrice, NewGoldPrice};
pub use period::Period;
pub use price_alert::{AlertDirection, NewPriceAlert, PeriodType, PriceAlert};
pub use tracking::{CaratTracking, PriceTracking, Severity, TrackingAlert, TrackingReport};
