//! Geolocation error types

use thiserror::Error;

/// Why a geolocation lookup failed
///
/// Callers decide the fallback; the lookup never fabricates a record.
#[derive(Error, Debug)]
pub enum GeoLookupError {
    /// The service did not answer within the configured timeout
    #[error("Geolocation lookup timed out")]
    Timeout,

    /// Could not connect to the service
    #[error("Geolocation service unavailable: {0}")]
    Unavailable(String),

    /// The service answered with a non-success status
    #[error("Geolocation service returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not the expected JSON
    #[error("Malformed geolocation response: {0}")]
    Decode(String),

    /// Any other transport failure
    #[error("Geolocation request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl GeoLookupError {
    /// Short machine-readable label for logs and API payloads
    pub fn kind(&self) -> &'static str {
        match self {
            GeoLookupError::Timeout => "timeout",
            GeoLookupError::Unavailable(_) => "unavailable",
            GeoLookupError::Status { .. } => "status",
            GeoLookupError::Decode(_) => "decode",
            GeoLookupError::Request(_) => "request",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GeoLookupError::Status {
            status: 429,
            message: "rate limit".to_string(),
        };
        assert_eq!(err.to_string(), "Geolocation service returned 429: rate limit");
        assert_eq!(err.kind(), "status");
        assert_eq!(GeoLookupError::Timeout.kind(), "timeout");
    }
}
