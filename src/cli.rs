//! Command-line interface definitions.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `run` | Sync on a fixed interval until Ctrl+C |
//! | `sync` | Scrape the price page once and upsert |
//! | `status` | Record count and latest record |
//! | `latest` | Most recent price |
//! | `prices <period>` | Prices for `month`, `3months`, `6months`, `year` or `all` |
//! | `monthly` / `yearly` | Aggregated averages |
//! | `stats [period]` | Summary statistics |
//! | `tracking [weekly\|monthly\|all]` | Price change tracking |
//! | `alerts` | Recently persisted alerts |
//! | `check-alerts` | Evaluate and persist critical alerts |
//! | `dashboard` | Combined dashboard payload |

use crate::api::GoldPriceApi;
use crate::error::{AppError, AppResult};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;

#[derive(Debug, Parser)]
#[command(
    name = "gold-tracker",
    author,
    version,
    about = "Scrape, store and track daily gold prices"
)]
pub struct Cli {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TrackingScope {
    Weekly,
    Monthly,
    All,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the periodic sync job and wait for Ctrl+C
    Run,
    /// Service name, version and timestamp
    Health,
    /// Scrape the price page and store new rows
    Sync,
    /// Total records and the latest record
    Status,
    /// Most recent price
    Latest,
    /// Prices for a period
    Prices {
        /// month, 3months, 6months, year or all
        period: String,
    },
    /// Monthly averages
    Monthly,
    /// Yearly averages
    Yearly,
    /// Summary statistics for a period
    Stats {
        #[arg(default_value = "3months")]
        period: String,
    },
    /// Week/month price change tracking
    Tracking {
        #[arg(value_enum, default_value_t = TrackingScope::All)]
        scope: TrackingScope,
        /// 22 or 24 (weekly/monthly scopes only)
        #[arg(long)]
        carat: Option<String>,
    },
    /// Recently persisted alerts
    Alerts {
        #[arg(long, default_value_t = crate::api::DEFAULT_ALERT_LIMIT)]
        limit: i64,
    },
    /// Evaluate tracking and persist critical alerts
    CheckAlerts,
    /// Latest price, month statistics, tracking and record count
    Dashboard,
}

/// Execute a one-shot command and return its JSON payload.
///
/// `Command::Run` is long-running and handled by the binary.
pub async fn execute(api: &GoldPriceApi, command: &Command) -> AppResult<Value> {
    let value = match command {
        Command::Run | Command::Health => serde_json::to_value(api.health())?,
        Command::Sync => serde_json::to_value(api.trigger_sync().await?)?,
        Command::Status => serde_json::to_value(api.scrape_status().await?)?,
        Command::Latest => serde_json::to_value(api.latest_price().await?)?,
        Command::Prices { period } => serde_json::to_value(api.prices_by_period(period).await?)?,
        Command::Monthly => serde_json::to_value(api.monthly_aggregate().await?)?,
        Command::Yearly => serde_json::to_value(api.yearly_aggregate().await?)?,
        Command::Stats { period } => serde_json::to_value(api.statistics(period).await?)?,
        Command::Tracking { scope, carat } => match scope {
            TrackingScope::Weekly => {
                serde_json::to_value(api.weekly_tracking(carat.as_deref()).await?)?
            }
            TrackingScope::Monthly => {
                serde_json::to_value(api.monthly_tracking(carat.as_deref()).await?)?
            }
            TrackingScope::All => {
                if carat.is_some() {
                    return Err(AppError::Validation(
                        "--carat applies only to weekly or monthly tracking".to_string(),
                    ));
                }
                serde_json::to_value(api.all_tracking().await?)?
            }
        },
        Command::Alerts { limit } => serde_json::to_value(api.recent_alerts(Some(*limit)).await?)?,
        Command::CheckAlerts => serde_json::to_value(api.check_alerts().await?)?,
        Command::Dashboard => serde_json::to_value(api.dashboard().await?)?,
    };

    Ok(value)
}
