use crate::config::DatabaseConfig;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use thiserror::Error;

/// Migrations embedded at compile time from `./migrations`
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur when working with the database
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to create database pool: {0}")]
    PoolCreation(sqlx::Error),

    #[error("Database query error: {0}")]
    QueryError(sqlx::Error),

    #[error("Database connection timeout")]
    ConnectionTimeout,

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => DatabaseError::ConnectionTimeout,
            other => DatabaseError::QueryError(other),
        }
    }
}

/// Database wrapper that holds the connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new Database instance with the given pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Close every connection in the pool. Call once at shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Create a SQLite connection pool, creating the database file if missing
///
/// # Arguments
/// * `config` - Database configuration
///
/// # Returns
/// * `Ok(SqlitePool)` - Successfully created connection pool
/// * `Err(DatabaseError)` - Error creating the pool
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| DatabaseError::Config(format!("Invalid DATABASE_URL: {}", e)))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect_with(options)
        .await
        .map_err(DatabaseError::PoolCreation)?;

    // Test the connection
    sqlx::query("SELECT 1").execute(&pool).await?;

    Ok(pool)
}

/// Run database migrations
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `migrations_path` - Directory to read migrations from at runtime;
///   `None` uses the set embedded in the binary
///
/// # Returns
/// * `Ok(())` - Migrations completed successfully
/// * `Err(DatabaseError)` - Migration error
pub async fn run_migrations(
    pool: &SqlitePool,
    migrations_path: Option<&str>,
) -> Result<(), DatabaseError> {
    match migrations_path {
        Some(path) => {
            let migrator = Migrator::new(std::path::Path::new(path))
                .await
                .map_err(DatabaseError::Migration)?;
            migrator.run(pool).await.map_err(DatabaseError::Migration)?;
        }
        None => {
            MIGRATOR.run(pool).await.map_err(DatabaseError::Migration)?;
        }
    }

    Ok(())
}
