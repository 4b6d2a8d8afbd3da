use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur during recipe import operations
#[derive(Error, Debug)]
pub enum ImportError {
    /// Transport-level failure while fetching a page
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The upstream page answered with a non-success status
    #[error("Fetching {url} returned HTTP {status}")]
    HttpStatus { url: String, status: StatusCode },

    /// Required external credential or setting is missing
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The language-model backend returned something unusable
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// Failed to load settings
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}
