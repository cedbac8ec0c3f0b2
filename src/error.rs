use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for '{parameter}': {message}")]
    InvalidParameter {
        parameter: &'static str,
        message: String,
    },

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid coordinate format: {0}")]
    InvalidCoordinate(String),

    #[error("Bad user name or password for database user '{user}'")]
    AccessDenied { user: String },

    #[error("Database does not exist: {database}")]
    DatabaseMissing { database: String },

    #[error("Database error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("No pressure data between {start} and {stop}")]
    NoData { start: i64, stop: i64 },

    #[error("Curve fit error: {0}")]
    Fit(String),

    #[error("Chart rendering error: {0}")]
    Render(String),
}
