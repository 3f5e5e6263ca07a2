//! Error types for KEF API operations

use http_client::TransportError;
use thiserror::Error;

use crate::value::EnvelopeError;

/// High-level API errors for KEF device operations
///
/// Transport failures keep their original meaning: `Network` means no
/// response was obtained, `Http` means the device refused the request,
/// `Parse` means the body was not JSON at all. `UnexpectedResponse`
/// covers a syntactically valid body whose shape violates the protocol
/// (empty getData array, non-array poll result, missing queue id).
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network communication error, surfaced unmodified; never retried here
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status returned by the device
    #[error("Device returned HTTP {0}")]
    Http(u16),

    /// Response body was not valid JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// Valid JSON with an unexpected protocol shape
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Network(msg) => ApiError::Network(msg),
            TransportError::Http(code) => ApiError::Http(code),
            TransportError::Parse(msg) => ApiError::Parse(msg),
        }
    }
}

impl From<EnvelopeError> for ApiError {
    fn from(err: EnvelopeError) -> Self {
        ApiError::UnexpectedResponse(err.to_string())
    }
}

/// Convenience type alias for Results using ApiError.
pub type Result<T> = std::result::Result<T, ApiError>;
