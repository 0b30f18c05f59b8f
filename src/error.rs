use thiserror::Error;

/// Failures talking to the Quiz&Poll backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Transport failure, timeout or a non-2xx response.
    #[error("network error: {0}")]
    Network(String),
    /// The body was not JSON, or not the JSON we expected.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ApiError {
    pub fn status(path: &str, status: reqwest::StatusCode) -> Self {
        ApiError::Network(format!("{} returned {}", path, status))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Parse(e.to_string())
    }
}
