use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::error::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Scraping run {run_id} ended with status {status}: {message}")]
    JobFailed {
        run_id: String,
        status: String,
        message: String,
    },

    #[error("Scraping run {run_id} timed out after {}s", waited.as_secs())]
    JobTimeout { run_id: String, waited: Duration },

    #[error("Scraping run {0} has no default dataset")]
    MissingDataset(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
