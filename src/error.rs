use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Missing required column '{column}' in {}", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("Invalid value '{value}' for column '{column}' at {}:{line}", path.display())]
    InvalidField {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
    },

    #[error("Unparseable timestamp '{value}' at {}:{line}", path.display())]
    InvalidTimestamp {
        path: PathBuf,
        line: u64,
        value: String,
    },

    #[error("Unknown metric '{0}'")]
    UnknownMetric(String),

    #[error("Unknown season '{0}'")]
    UnknownSeason(String),

    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),

    #[error("Invalid year range: {min} > {max}")]
    InvalidYearRange { min: i32, max: i32 },

    #[error("Unknown output format '{0}' (expected 'text' or 'json')")]
    UnknownFormat(String),

    #[error("No city named '{0}' in the dataset")]
    UnknownCity(String),

    #[error("Insufficient data for {context}: {points} distinct point(s)")]
    InsufficientData { context: String, points: usize },

    #[error("Regression input mismatch: {years} years but {values} values")]
    LengthMismatch { years: usize, values: usize },

    #[error("Non-finite value in {context}")]
    NonFinite { context: String },
}
