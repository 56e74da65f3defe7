//! Missevan API client error types.

use std::sync::Arc;

use jidanjia_core::Error;

/// Errors from the Missevan API client.
#[derive(Debug, thiserror::Error)]
pub enum MissevanError {
    /// Configured API base is not a usable URL.
    #[error("invalid API base: {0}")]
    InvalidBase(String),

    /// Search keyword was blank.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Rate limited by the platform.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for MissevanError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { MissevanError::Timeout } else { MissevanError::Network(Arc::new(err)) }
    }
}

impl From<MissevanError> for Error {
    fn from(err: MissevanError) -> Self {
        match err {
            MissevanError::InvalidBase(msg) => Error::InvalidUrl(msg),
            MissevanError::InvalidQuery(msg) => Error::InvalidInput(msg),
            MissevanError::Timeout => Error::FetchTimeout(err.to_string()),
            MissevanError::Parse(msg) => Error::ParseFailed(msg),
            MissevanError::RateLimited | MissevanError::HttpError { .. } | MissevanError::Network(_) => {
                Error::HttpError(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MissevanError::HttpError { status: 502 };
        assert_eq!(err.to_string(), "HTTP error: 502");

        let err = MissevanError::InvalidQuery("empty keyword".to_string());
        assert!(err.to_string().contains("invalid query"));
    }

    #[test]
    fn test_into_core_error() {
        let err: Error = MissevanError::Timeout.into();
        assert_eq!(err.code(), "FETCH_TIMEOUT");

        let err: Error = MissevanError::RateLimited.into();
        assert_eq!(err.code(), "HTTP_ERROR");

        let err: Error = MissevanError::Parse("bad json".into()).into();
        assert_eq!(err.to_string(), "PARSE_FAILED: bad json");
    }
}
