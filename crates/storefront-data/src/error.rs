//! Remote API error types.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when talking to the commerce API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Could not reach the server.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Failed to send the request.
    #[error("Request failed: {0}")]
    Request(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        status: u16,
        url: String,
        message: String,
    },

    /// Failed to parse the response body.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Request timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

impl ApiError {
    /// Classify a transport error from the HTTP client.
    pub(crate) fn from_transport(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            ApiError::Timeout(timeout)
        } else if error.is_connect() {
            ApiError::Connect(error.to_string())
        } else if error.is_decode() {
            ApiError::Parse(error.to_string())
        } else {
            ApiError::Request(error.to_string())
        }
    }

    /// HTTP status of the failure, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if the server answered with a 5xx status.
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Parse(e.to_string())
    }
}
