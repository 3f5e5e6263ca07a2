//! Error types for the HTTP client

use thiserror::Error;

/// Errors that can occur while talking to the device
///
/// `Network` means no usable response was obtained at all; `Http` means
/// the device answered with a non-success status; `Parse` means the body
/// was not valid JSON. Retrying is deliberately left to callers.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Device unreachable, connection failed, or the wait budget elapsed
    /// without any response
    #[error("Network error: {0}")]
    Network(String),

    /// Device answered with a non-2xx HTTP status
    #[error("Device returned HTTP {0}")]
    Http(u16),

    /// Response body could not be parsed as JSON
    #[error("Invalid JSON response: {0}")]
    Parse(String),
}
