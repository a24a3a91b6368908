use thiserror::Error;

use super::{ACCEPTED_MIME_TYPES, MAX_AUDIO_SIZE_BYTES};

/// Errors surfaced by the speech-to-text boundary. Each maps onto a stable
/// wire code.
#[derive(Debug, Error)]
pub enum SttError {
    #[error("Audio exceeds maximum size of {} bytes", MAX_AUDIO_SIZE_BYTES)]
    RequestTooLarge,

    #[error("Unsupported audio format: {0}. Accepted: {}", ACCEPTED_MIME_TYPES.join(", "))]
    UnsupportedFormat(String),

    #[error("{0}")]
    Validation(String),

    #[error("STT service timed out")]
    Timeout,

    #[error("STT service failed: {0}")]
    Failure(String),

    #[error("Too many requests, retry in {retry_after_seconds} seconds")]
    RateLimited { retry_after_seconds: u64 },
}

impl SttError {
    pub fn code(&self) -> &'static str {
        match self {
            SttError::RequestTooLarge => "REQUEST_TOO_LARGE",
            SttError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            SttError::Validation(_) => "VALIDATION_ERROR",
            SttError::Timeout => "STT_TIMEOUT",
            SttError::Failure(_) => "STT_FAILURE",
            SttError::RateLimited { .. } => "RATE_LIMITED",
        }
    }
}

impl From<reqwest::Error> for SttError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SttError::Timeout
        } else {
            SttError::Failure(err.to_string())
        }
    }
}
