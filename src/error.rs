use crate::database::DatabaseError;
use crate::price_page::ScrapeError;
use sqlx::Error as SqlxError;
use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// SQLx database errors
    #[error("SQL error: {0}")]
    Sqlx(#[from] SqlxError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Fetching the price page failed
    #[error("Network error: {0}")]
    Network(String),

    /// Scraped content could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Check if error is a database connection error
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            AppError::Database(DatabaseError::PoolCreation(_))
                | AppError::Database(DatabaseError::ConnectionTimeout)
        )
    }

    /// Check if error is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// Get HTTP status code for the error
    pub fn status_code(&self) -> u16 {
        if self.is_connection_error() {
            return 503;
        }
        match self {
            AppError::NotFound(_) => 404,
            AppError::Validation(_) => 400,
            AppError::Network(_) => 502,
            AppError::Config(_) => 500,
            AppError::Database(_) | AppError::Sqlx(_) => 500,
            _ => 500,
        }
    }
}

/// Repository-specific error types
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Database query error
    #[error("Query error: {0}")]
    Query(SqlxError),

    /// Record not found
    #[error("Record not found")]
    NotFound(String),

    /// Duplicate record
    #[error("Duplicate record: {0}")]
    Duplicate(String),

    /// Constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => AppError::NotFound(msg),
            RepositoryError::Query(e) => AppError::Sqlx(e),
            RepositoryError::Duplicate(msg) => AppError::Validation(format!("Duplicate: {}", msg)),
            RepositoryError::ConstraintViolation(msg) => AppError::Validation(msg),
        }
    }
}

impl From<SqlxError> for RepositoryError {
    fn from(err: SqlxError) -> Self {
        match &err {
            SqlxError::RowNotFound => RepositoryError::NotFound("Record not found".to_string()),
            SqlxError::Database(db_err) => {
                // SQLite extended result codes
                let code = db_err.code().map(|c| c.to_string());
                match code.as_deref() {
                    // SQLITE_CONSTRAINT_UNIQUE / SQLITE_CONSTRAINT_PRIMARYKEY
                    Some("2067") | Some("1555") => {
                        RepositoryError::Duplicate(db_err.message().to_string())
                    }
                    // SQLITE_CONSTRAINT_CHECK / SQLITE_CONSTRAINT_NOTNULL
                    Some("275") | Some("1299") => {
                        RepositoryError::ConstraintViolation(db_err.message().to_string())
                    }
                    _ => RepositoryError::Query(err),
                }
            }
            _ => RepositoryError::Query(err),
        }
    }
}

impl From<ScrapeError> for AppError {
    fn from(err: ScrapeError) -> Self {
        match err {
            ScrapeError::Network(e) => AppError::Network(e.to_string()),
            ScrapeError::Status(status) => {
                AppError::Network(format!("Price page returned HTTP {}", status))
            }
            ScrapeError::Parse(msg) => AppError::Parse(msg),
        }
    }
}

/// Convenience function to convert Option<T> to Result<T, AppError>
pub fn option_to_result<T>(opt: Option<T>, error_msg: &str) -> AppResult<T> {
    opt.ok_or_else(|| AppError::NotFound(error_msg.to_string()))
}
