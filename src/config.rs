use std::env;
use std::time::Duration;

/// Default page holding the historical gold price table
pub const DEFAULT_SCRAPER_URL: &str = "https://www.ideabeam.com/finance/rates/goldprice.php";

/// Browser-like user agent sent with every scrape request
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Scraper configuration
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub scraper: ScraperConfig,
    pub log_level: String,
    pub sync_interval_secs: u64,
    pub environment: String,
}

impl DatabaseConfig {
    /// Create database config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://gold_prices.db".to_string());

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(5);

        let acquire_timeout_secs = env::var("DATABASE_ACQUIRE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        let idle_timeout_secs = env::var("DATABASE_IDLE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(600); // 10 minutes

        let max_lifetime_secs = env::var("DATABASE_MAX_LIFETIME_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1800); // 30 minutes

        if !url.starts_with("sqlite:") {
            return Err(format!(
                "DATABASE_URL must be a sqlite URL (sqlite://path or sqlite::memory:), got: {}",
                url
            ));
        }

        if max_connections == 0 {
            return Err("DATABASE_MAX_CONNECTIONS must be greater than 0".to_string());
        }

        if acquire_timeout_secs == 0 {
            return Err("DATABASE_ACQUIRE_TIMEOUT_SECS must be greater than 0".to_string());
        }

        Ok(Self {
            url,
            max_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }

    /// Get acquire timeout as Duration
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Get idle timeout as Duration
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Get max lifetime as Duration
    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://gold_prices.db".to_string(),
            max_connections: 5,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
        }
    }
}

impl ScraperConfig {
    /// Create scraper config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let url = env::var("SCRAPER_URL").unwrap_or_else(|_| DEFAULT_SCRAPER_URL.to_string());

        let user_agent =
            env::var("SCRAPER_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());

        let timeout_secs = env::var("SCRAPER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(format!("SCRAPER_URL must be an http(s) URL, got: {}", url));
        }

        if timeout_secs == 0 {
            return Err("SCRAPER_TIMEOUT_SECS must be greater than 0".to_string());
        }

        Ok(Self {
            url,
            user_agent,
            timeout_secs,
        })
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SCRAPER_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Create application config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let database = DatabaseConfig::from_env()?;
        let scraper = ScraperConfig::from_env()?;

        let log_level = env::var("LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string());

        let sync_interval_secs = env::var("SYNC_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(21600); // 6 hours

        let environment = env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string());

        // Validate log level
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid LOG_LEVEL: {}. Must be one of: {:?}",
                log_level, valid_log_levels
            ));
        }

        if sync_interval_secs == 0 {
            return Err("SYNC_INTERVAL_SECS must be greater than 0".to_string());
        }

        // Validate environment
        let valid_environments = ["development", "staging", "production"];
        if !valid_environments.contains(&environment.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid ENVIRONMENT: {}. Must be one of: {:?}",
                environment, valid_environments
            ));
        }

        Ok(Self {
            database,
            scraper,
            log_level: log_level.to_lowercase(),
            sync_interval_secs,
            environment: environment.to_lowercase(),
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Interval between scheduled syncs
    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs)
    }

    /// Get database URL (convenience method)
    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            scraper: ScraperConfig::default(),
            log_level: "info".to_string(),
            sync_interval_secs: 21600,
            environment: "development".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.acquire_timeout_secs, 30);
        assert!(config.url.starts_with("sqlite:"));
    }

    #[test]
    fn test_scraper_config_default() {
        let config = ScraperConfig::default();
        assert_eq!(config.url, DEFAULT_SCRAPER_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.sync_interval(), Duration::from_secs(21600));
        assert_eq!(config.environment, "development");
        assert!(!config.is_production());
    }
}
