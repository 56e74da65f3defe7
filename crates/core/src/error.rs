//! Unified error types for jidanjia.
//!
//! The extraction engine itself never fails: unknown values are modeled as `None`.
//! These errors only surface at the edges (input validation, network, export).

/// Unified error types for the jidanjia crates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty listing name).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Listing has no price, so per-episode pricing is undefined.
    #[error("FREE_LISTING: {0}")]
    FreeListing(String),

    /// HTTP error response or transport failure.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Upstream payload could not be decoded.
    #[error("PARSE_FAILED: {0}")]
    ParseFailed(String),

    /// Writing an export file failed.
    #[error("EXPORT_FAILED: {0}")]
    ExportFailed(String),
}

impl Error {
    /// Stable upper-case code used as the `Display` prefix.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::FreeListing(_) => "FREE_LISTING",
            Error::HttpError(_) => "HTTP_ERROR",
            Error::FetchTimeout(_) => "FETCH_TIMEOUT",
            Error::InvalidUrl(_) => "INVALID_URL",
            Error::ParseFailed(_) => "PARSE_FAILED",
            Error::ExportFailed(_) => "EXPORT_FAILED",
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::ExportFailed(err.to_string())
    }
}
