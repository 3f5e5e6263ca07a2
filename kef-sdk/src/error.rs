use kef_api::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// `poll` calls on one connector are strictly sequential; a second
    /// call while one is in flight is rejected rather than interleaved.
    #[error("a poll is already in progress on this connector")]
    PollInProgress,

    #[error("unexpected value at {path}: {detail}")]
    UnexpectedValue { path: String, detail: String },
}

impl SdkError {
    pub(crate) fn unexpected_value(path: &str, detail: impl Into<String>) -> Self {
        SdkError::UnexpectedValue {
            path: path.to_string(),
            detail: detail.into(),
        }
    }
}

/// Convenience type alias for Results using SdkError.
pub type Result<T> = std::result::Result<T, SdkError>;
