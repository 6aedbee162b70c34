//! Error types for data feed requests.

use thiserror::Error;

/// Errors that can occur while fetching a snapshot.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Request timeout
    #[error("request timeout after {0}s")]
    Timeout(u64),

    /// Connection failed
    #[error("connection failed: {0}")]
    Connection(String),

    /// Non-success HTTP status
    #[error("HTTP error: {0}")]
    Http(u16),

    /// Body was not the expected JSON
    #[error("invalid response: {0}")]
    Decode(String),

    /// HTTP client could not be constructed
    #[error("client setup failed: {0}")]
    Client(String),
}

impl FetchError {
    /// Classify a reqwest error.
    pub(crate) fn from_reqwest(e: reqwest::Error, timeout_seconds: u64) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(timeout_seconds)
        } else if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            FetchError::Http(status.as_u16())
        } else {
            FetchError::Connection(e.to_string())
        }
    }

    /// Short label used for log fields and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Timeout(_) => "timeout",
            FetchError::Connection(_) => "connection",
            FetchError::Http(_) => "http",
            FetchError::Decode(_) => "decode",
            FetchError::Client(_) => "client",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            FetchError::Timeout(5).to_string(),
            "request timeout after 5s"
        );
        assert_eq!(FetchError::Http(503).to_string(), "HTTP error: 503");
        assert_eq!(
            FetchError::Decode("expected value".to_string()).to_string(),
            "invalid response: expected value"
        );
    }

    #[test]
    fn test_error_kind_labels() {
        assert_eq!(FetchError::Connection("refused".into()).kind(), "connection");
        assert_eq!(FetchError::Http(404).kind(), "http");
    }
}
