use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Feed '{feed}' is missing required column '{column}'")]
    MissingColumn { feed: String, column: String },

    #[error("No sales data available: {0}")]
    NoSalesData(String),

    #[error("Access denied: session has not entered the team password")]
    AccessDenied,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
