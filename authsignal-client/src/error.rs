//! Error types for Authsignal API calls

use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while calling the Authsignal API
#[derive(Error, Debug)]
pub enum ClientError {
    /// Client configuration is incomplete or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// The API answered with a non-success status
    #[error(
        "An unexpected API error occurred status: {status}, error: {}, description: {}",
        .error_code.as_deref().unwrap_or("unknown"),
        .error_description.as_deref().unwrap_or("none")
    )]
    Api {
        /// HTTP status code
        status: u16,
        /// Machine-readable error code from the response body
        error_code: Option<String>,
        /// Human-readable description from the response body
        error_description: Option<String>,
    },

    /// Underlying HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid base URL or path
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Request or response body could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Check if this error is worth retrying
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Get the HTTP status code if the API answered
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
