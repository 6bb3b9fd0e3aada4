//! Gold Tracker
//!
//! Main entry point. One-shot subcommands print a JSON payload; `run`
//! starts the periodic sync job and waits for Ctrl+C.

use anyhow::Context;
use clap::Parser;
use gold_tracker::api::{ErrorResponse, GoldPriceApi};
use gold_tracker::cli::{self, Cli, Command};
use gold_tracker::config::AppConfig;
use gold_tracker::database::{create_pool, run_migrations};
use gold_tracker::services::SyncJob;
use gold_tracker::{AppError, AppState};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables first
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::from_env().map_err(AppError::Config)?;

    // Initialize tracing/logging with config; JSON lines in production
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("gold_tracker={},sqlx=warn", config.log_level).into()
    });
    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    info!("Environment: {}", config.environment);
    info!("Database: {}", config.database_url());

    // =========================================================================
    // DATABASE SETUP
    // =========================================================================
    let pool = create_pool(&config.database)
        .await
        .context("Failed to create database pool")?;

    run_migrations(&pool, None)
        .await
        .context("Database migration failed")?;

    info!("Database ready");

    let state = Arc::new(AppState::new(pool, &config.scraper)?);
    let api = GoldPriceApi::new(state.clone());

    let exit_code = match &cli.command {
        Command::Run => {
            let job = SyncJob::new(state.scraper_service.clone(), state.tracker_service.clone())
                .with_interval(config.sync_interval());

            let job_handle = tokio::spawn(async move {
                job.start().await;
            });
            info!("✓ Sync job started (every {:?})", config.sync_interval());
            info!("Press Ctrl+C to shutdown gracefully");

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received, shutting down gracefully...");
                }
                _ = job_handle => {
                    error!("Sync job exited unexpectedly");
                }
            }
            0
        }
        command => match cli::execute(&api, command).await {
            Ok(value) => {
                let rendered = if cli.pretty {
                    serde_json::to_string_pretty(&value)?
                } else {
                    serde_json::to_string(&value)?
                };
                println!("{}", rendered);
                0
            }
            Err(e) => {
                let body = ErrorResponse::from(&e);
                eprintln!("{}", serde_json::to_string(&body)?);
                if body.code == 404 { 2 } else { 1 }
            }
        },
    };

    state.database.close().await;
    info!("Shutdown complete");

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
